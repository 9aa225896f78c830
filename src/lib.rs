//! A small in-place terminal spinner for long-running operations.

pub mod config;
pub mod frames;
pub mod spinner;
pub mod terminal;

pub use config::SpinnerConfig;
pub use spinner::Spinner;
