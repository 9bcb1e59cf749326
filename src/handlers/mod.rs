// handlers/mod.rs - two security tiers
//
// Public (no token) → Protected (bearer token, then row-scope decision)
pub mod protected;
pub mod public;

pub use protected::{proxy, whoami};
pub use public::{health, login, not_found, root};
