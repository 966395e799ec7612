pub mod countries;
pub mod types;

pub use countries::{is_allowed, ALLOW_LIST, HIGHLIGHT};
pub use types::{CleanRow, CleanTable, CompleteRow, CountryRecord, MergedRow, SourceKind};
