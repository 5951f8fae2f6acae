pub mod commands;
pub mod handlers;

pub use commands::{CliArgs, OutputFormatArg};
pub use handlers::{handle_run, load_descriptor, resolve_config, run_pipeline};
