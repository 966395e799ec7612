// src/process/mod.rs

pub mod derive;
pub mod join;
pub mod normalize;
pub mod raw_table;
pub mod utils;

pub use derive::{derive, Derived, LinearFit};
pub use join::{complete_rows, join_sources, left_join, MergedTable};
pub use normalize::normalize;
pub use raw_table::RawTable;
