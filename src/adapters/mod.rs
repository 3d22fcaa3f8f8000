//! Concrete adapter implementations for ports.

pub mod console_report;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod stooq_adapter;
pub mod watchlist_file;
#[cfg(feature = "web")]
pub mod web;
