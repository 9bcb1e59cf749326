// Friendly table name resolution backed by the backend's metadata listing
pub mod cache;
pub mod refresher;
pub mod source;

pub use cache::{MetaCache, MetaSnapshot};
pub use refresher::{MetaRefresher, RefreshHandle};
pub use source::{BackendMetaSource, MetaSource, TableMeta};
