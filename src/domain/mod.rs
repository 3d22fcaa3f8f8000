//! Core domain types and logic.

pub mod bar;
pub mod config;
pub mod error;
pub mod indicator;
pub mod indicator_helpers;
pub mod risk;
pub mod signal;
pub mod simulator;
