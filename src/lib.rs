pub mod boundary;
pub mod cli;
pub mod config;
pub mod error;
pub mod exec;
pub mod flags;
pub mod git;
pub mod ota;
pub mod ui;
pub mod version;

pub use error::{OtaError, Result};
