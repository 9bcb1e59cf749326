pub mod directive;
pub mod types;

pub use directive::{check_nesting, FilterDirective, OWNERSHIP_FIELD};
pub use types::FilterOp;
