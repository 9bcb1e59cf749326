// Composing and sending backend requests on behalf of authenticated callers
pub mod forward;
pub mod target;

pub use forward::Forwarder;
pub use target::{compose_target, ProxyTarget};
