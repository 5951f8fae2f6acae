use crate::config::parse_provider;
use clap::{ArgGroup, Parser, ValueEnum};
use genai::adapter::AdapterKind;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT_DIR: &str = "./generated";
pub const DEFAULT_PRESET: &str = "inventory";

/// Multi-agent code generation pipeline for microservices
#[derive(Parser, Debug)]
#[command(
    name = "lotus-agents",
    about = "Multi-agent code generation pipeline for microservices",
    version,
    long_about = "lotus-agents runs four generation stages (API design, backend & database, \
                  messaging & events, testing & security) against a service description and \
                  saves the code each stage produces.\n\n\
                  Examples:\n  \
                  lotus-agents\n  \
                  lotus-agents ./out --preset payments\n  \
                  lotus-agents --service orders.yaml --format json\n  \
                  lotus-agents --provider ollama --model qwen2.5-coder:14b --dry-run"
)]
#[command(group(ArgGroup::new("source").args(["service", "preset"])))]
pub struct CliArgs {
    #[arg(
        value_name = "OUTPUT_DIR",
        default_value = DEFAULT_OUTPUT_DIR,
        help = "Directory that receives <service>/ with generated files"
    )]
    pub output_dir: PathBuf,

    #[arg(
        short = 's',
        long,
        value_name = "FILE",
        help = "Service description file (.yaml, .yml, .toml or .json)"
    )]
    pub service: Option<PathBuf>,

    #[arg(
        short = 'p',
        long,
        value_name = "NAME",
        help = "Built-in service description: inventory, payments, notifications (default: inventory)"
    )]
    pub preset: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Report format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        long,
        value_parser = parse_adapter_kind,
        help = "Generation provider (overrides LOTUS_PROVIDER)"
    )]
    pub provider: Option<AdapterKind>,

    #[arg(
        short = 'm',
        long,
        value_name = "MODEL",
        help = "Model name (overrides LOTUS_MODEL)"
    )]
    pub model: Option<String>,

    #[arg(
        long,
        value_name = "TOKENS",
        help = "Maximum tokens per stage response (overrides LOTUS_MAX_TOKENS)"
    )]
    pub max_tokens: Option<u32>,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Timeout per generation call (overrides LOTUS_REQUEST_TIMEOUT)"
    )]
    pub timeout: Option<u64>,

    #[arg(
        long,
        help = "Print the service prompt and stage plan without calling the provider"
    )]
    pub dry_run: bool,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for crate::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => crate::output::OutputFormat::Json,
            OutputFormatArg::Yaml => crate::output::OutputFormat::Yaml,
            OutputFormatArg::Human => crate::output::OutputFormat::Human,
        }
    }
}

fn parse_adapter_kind(s: &str) -> Result<AdapterKind, String> {
    parse_provider(s).map_err(|e| e.to_string())
}
