// handlers/protected/mod.rs - Protected handlers
//
// Layered behind auth_middleware (identity claims) and authorize_middleware
// (access scope). Handlers may rely on both being present in extensions.
pub mod proxy;
pub mod whoami;

pub use proxy::proxy;
pub use whoami::whoami;
