//! Small helpers shared by casts and backends.

pub mod cleaner;

pub use cleaner::clean_cell_string;
