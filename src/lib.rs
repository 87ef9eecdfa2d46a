pub mod campaign;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod report;
pub mod tournament;

pub use error::{Result, SimError};
