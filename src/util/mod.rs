//! Utility modules for lotus-agents

pub mod logging;

pub use logging::{init_from_env, init_logging, LoggingConfig};
