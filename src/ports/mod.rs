//! Port traits separating domain logic from the outside world.

pub mod config_port;
pub mod data_port;
