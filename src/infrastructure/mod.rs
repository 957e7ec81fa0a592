//! Payment source adapters and mock data generation.

pub mod csv_source;
pub mod in_memory;
pub mod simulated;
