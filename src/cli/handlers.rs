use super::commands::{CliArgs, OutputFormatArg, DEFAULT_PRESET};
use crate::config::{ConfigError, LotusConfig};
use crate::llm::{select_llm_client, LLMClient};
use crate::output::{ArtifactWriter, OutputFormat, OutputFormatter, RunReport};
use crate::pipeline::{Pipeline, PipelineError, StageKind};
use crate::progress::LoggingHandler;
use crate::service::{preset, DescriptorError, ServiceDescriptor};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CONFIG: i32 = 2;
pub const EXIT_CANCELLED: i32 = 130;

/// Resolves the service description from `--service` or `--preset`.
pub fn load_descriptor(args: &CliArgs) -> Result<ServiceDescriptor, DescriptorError> {
    let descriptor = match (&args.service, &args.preset) {
        (Some(path), _) => ServiceDescriptor::from_file(path)?,
        (None, Some(name)) => preset(name)?,
        (None, None) => preset(DEFAULT_PRESET)?,
    };
    descriptor.validate()?;
    Ok(descriptor)
}

/// Environment configuration with command-line overrides applied.
pub fn resolve_config(args: &CliArgs) -> Result<LotusConfig, ConfigError> {
    let mut config = LotusConfig::from_env()?;

    if let Some(provider) = args.provider {
        config.provider = provider;
    }
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(max_tokens) = args.max_tokens {
        config.max_tokens = max_tokens;
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = timeout;
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.to_lowercase();
    }

    config.validate()?;
    Ok(config)
}

pub async fn handle_run(args: &CliArgs) -> i32 {
    let descriptor = match load_descriptor(args) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            error!("Invalid service description: {}", e);
            eprintln!("Error: {}", e);
            return EXIT_CONFIG;
        }
    };

    let config = match resolve_config(args) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            eprintln!("Error: {}", e);
            return EXIT_CONFIG;
        }
    };
    debug!("{}", config);

    if args.dry_run {
        print!("{}", render_plan(&descriptor, &config));
        return EXIT_SUCCESS;
    }

    let selected = match select_llm_client(&config) {
        Ok(selected) => selected,
        Err(e) => {
            error!("Failed to set up generation client: {}", e);
            eprintln!("Error: {}", e);
            return EXIT_CONFIG;
        }
    };

    let show_banner = !args.quiet && args.format == OutputFormatArg::Human;
    if show_banner {
        println!("Microservice Agent Pipeline");
        println!("   Service:  {}", descriptor.name);
        println!("   Language: {}", descriptor.language);
        println!("   Model:    {}", selected.description);
        println!("   Output:   {}", args.output_dir.display());
        println!();
    }

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling pipeline");
            ctrl_c.cancel();
        }
    });

    run_pipeline(
        selected.client,
        &config,
        descriptor,
        &args.output_dir,
        args.format.into(),
        &cancel,
    )
    .await
}

/// Runs the standard pipeline, saves the result and prints the report.
/// Returns the process exit code.
pub async fn run_pipeline(
    client: Arc<dyn LLMClient>,
    config: &LotusConfig,
    descriptor: ServiceDescriptor,
    output_dir: &Path,
    format: OutputFormat,
    cancel: &CancellationToken,
) -> i32 {
    let pipeline = Pipeline::standard(client, config.pipeline_settings())
        .with_progress(Arc::new(LoggingHandler));

    let result = match pipeline.run(cancel, Arc::new(descriptor)).await {
        Ok(result) => result,
        Err(e @ PipelineError::Cancelled { .. }) => {
            eprintln!("Cancelled: {}", e);
            return EXIT_CANCELLED;
        }
        Err(e) => {
            error!("Pipeline failed: {}", e);
            eprintln!("Error: {}", e);
            return EXIT_FAILURE;
        }
    };

    let service_dir = match ArtifactWriter::save(&result, output_dir) {
        Ok(dir) => dir,
        Err(e) => {
            error!("Failed to save artifacts: {:#}", e);
            eprintln!("Error: {:#}", e);
            return EXIT_FAILURE;
        }
    };
    info!(
        dir = %service_dir.display(),
        artifacts = result.artifact_count(),
        "Artifacts saved"
    );

    let report = RunReport::new(&result, Some(&service_dir));
    match OutputFormatter::new(format).format(&report) {
        Ok(text) => {
            print!("{}", text);
            if !text.ends_with('\n') {
                println!();
            }
            EXIT_SUCCESS
        }
        Err(e) => {
            error!("Failed to format report: {:#}", e);
            eprintln!("Error: {:#}", e);
            EXIT_FAILURE
        }
    }
}

/// What a run would do, without contacting the provider.
pub fn render_plan(descriptor: &ServiceDescriptor, config: &LotusConfig) -> String {
    let mut out = String::new();
    out.push_str(&descriptor.render_prompt());
    out.push_str(&format!(
        "Provider: {} ({}), max {} tokens per stage, context cap {} chars\n\n",
        config.provider, config.model, config.max_tokens, config.context_cap
    ));
    out.push_str("Stages:\n");
    for (i, kind) in StageKind::ALL.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} - {}\n",
            i + 1,
            kind.name(),
            kind.description()
        ));
    }
    out
}
