//! Maitre core crate - shared error type and configuration.
//!
//! Everything other crates need to agree on lives here: the top-level
//! `MaitreError`, the `Result` alias, and the TOML-backed `MaitreConfig`.

pub mod config;
pub mod error;

pub use config::MaitreConfig;
pub use error::{MaitreError, Result};
