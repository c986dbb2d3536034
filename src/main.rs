//! Image Workflow - Main Entry Point
//!
//! Reads one image processing instruction from stdin, runs it through the
//! supervisor workflow and prints the final artifact and execution path.

use clap::{Parser, Subcommand};
use image_workflow::agents::StepRunner;
use image_workflow::config::{ClassifierConfig, RoutingStrategy, WorkflowConfig};
use image_workflow::error::{sanitize_error_message, WorkflowFailure};
use image_workflow::llm::provider::LlmProvider;
use image_workflow::llm::providers::{OpenAiConfig, OpenAiProvider};
use image_workflow::observability::init_logging_with_verbosity;
use image_workflow::routing::{ClassifyingRouter, DeterministicRouter, Router};
use image_workflow::workflow::{Workflow, WorkflowOutcome};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Supervisor-routed image processing workflow
#[derive(Parser)]
#[command(name = "image-workflow")]
#[command(about = "Supervisor-routed image processing workflow")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Prompt for an instruction and run the workflow (default)
    Run,
    /// Validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging_with_verbosity(cli.verbose);

    info!("Starting image workflow v{}", env!("CARGO_PKG_VERSION"));

    let config = match load_configuration(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Failed to load configuration: {e}");
            process::exit(1);
        }
    };

    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_workflow(config).await,
        Commands::Config { show } => handle_config_command(&config, show),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        eprint!("{}", render_error(e.as_ref()));
        process::exit(1);
    }
}

fn load_configuration(
    config_path: &Option<PathBuf>,
) -> Result<WorkflowConfig, Box<dyn std::error::Error>> {
    match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Ok(WorkflowConfig::load_from_file(path)?)
        }
        None => {
            let default_paths = ["image-workflow.toml", "config/image-workflow.toml"];

            for path_str in default_paths {
                let path = PathBuf::from(path_str);
                if path.exists() {
                    info!("Loading configuration from: {}", path.display());
                    return Ok(WorkflowConfig::load_from_file(&path)?);
                }
            }

            info!("No configuration file found, using built-in defaults");
            Ok(WorkflowConfig::default())
        }
    }
}

/// Provider factory for creating LLM providers from configuration
struct LlmProviderFactory;

impl LlmProviderFactory {
    fn create_provider(
        config: &WorkflowConfig,
        classifier: &ClassifierConfig,
    ) -> Result<Arc<dyn LlmProvider>, Box<dyn std::error::Error>> {
        match classifier.provider.as_str() {
            "openai" => {
                let api_key = config.get_classifier_api_key()?;
                let mut openai_config = OpenAiConfig {
                    api_key,
                    timeout: classifier.timeout_secs.map(Duration::from_secs),
                    ..Default::default()
                };
                if let Some(base_url) = &classifier.base_url {
                    openai_config.base_url = base_url.trim_end_matches('/').to_string();
                }
                Ok(Arc::new(OpenAiProvider::new(openai_config)?))
            }
            provider => Err(format!("Unsupported LLM provider: {provider}").into()),
        }
    }
}

/// Build the supervisor selected by `[routing] strategy`
fn build_router(config: &WorkflowConfig) -> Result<Arc<dyn Router>, Box<dyn std::error::Error>> {
    match config.routing.strategy {
        RoutingStrategy::Deterministic => {
            let table = config.routing.routing_table()?;
            Ok(Arc::new(DeterministicRouter::new(table)))
        }
        RoutingStrategy::Classifier => {
            let classifier = config.routing.classifier.as_ref().ok_or(
                "Classifier routing strategy requires [routing.classifier] configuration",
            )?;
            let provider = LlmProviderFactory::create_provider(config, classifier)?;

            let mut router = ClassifyingRouter::new(provider, classifier.model.clone())
                .with_temperature(classifier.temperature as f32)
                .with_max_tokens(classifier.max_tokens);
            if let Some(prompt) = &classifier.system_prompt {
                router = router.with_system_prompt(prompt.clone());
            }
            Ok(Arc::new(router))
        }
    }
}

/// Read one instruction line from stdin
fn read_instruction() -> Result<String, Box<dyn std::error::Error>> {
    print!("Please enter your image processing instruction: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let instruction = line.trim().to_string();
    if instruction.is_empty() {
        return Err("No instruction given".into());
    }
    Ok(instruction)
}

async fn run_workflow(config: WorkflowConfig) -> Result<(), Box<dyn std::error::Error>> {
    let router = build_router(&config)?;
    let workflow = Workflow::from_config(&config, router, StepRunner::default());
    info!(
        router = workflow.router_name(),
        max_iterations = config.workflow.max_iterations,
        "Workflow ready"
    );

    let instruction = read_instruction()?;

    let outcome = workflow.execute(instruction).await?;
    print!("{}", render_outcome(&outcome));
    Ok(())
}

/// Console report for a finished run
fn render_outcome(outcome: &WorkflowOutcome) -> String {
    let mut report = String::from("\nProcessing completed!\n");
    report.push_str(&format!(
        "Final image URL: {}\n",
        outcome.final_artifact().unwrap_or("none")
    ));
    if outcome.forced_end {
        report.push_str(&format!(
            "(stopped after {} routing decisions)\n",
            outcome.decisions
        ));
    }
    report.push_str("\nExecution path:\n");
    for entry in outcome.state.history() {
        report.push_str(&format!("- {}\n", entry.text));
    }
    report
}

/// Console report for a failed command; aborted runs also name their last step
fn render_error(error: &(dyn std::error::Error + 'static)) -> String {
    if let Some(failure) = error.downcast_ref::<WorkflowFailure>() {
        let mut report = format!(
            "\nError during processing: {}\n",
            failure.source.sanitized()
        );
        if let Some(entry) = &failure.last_entry {
            report.push_str(&format!("Last step: {}\n", entry.text));
        }
        return report;
    }
    format!("Error: {}\n", sanitize_error_message(&error.to_string()))
}

fn handle_config_command(
    config: &WorkflowConfig,
    show: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if show {
        println!("Current configuration:");
        println!("{}", toml::to_string_pretty(config)?);
    }

    info!("Configuration validation complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_workflow::error::WorkflowError;
    use image_workflow::routing::DeterministicRouter;
    use image_workflow::state::LogEntry;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_outcome_report_lists_final_image_and_path() {
        let workflow = Workflow::new(
            Arc::new(DeterministicRouter::default()),
            StepRunner::default(),
        );
        let outcome = workflow.execute("sunset").await.unwrap();

        let report = render_outcome(&outcome);

        assert!(report.contains("Processing completed!"));
        assert!(report.contains("Final image URL: mock_bg_removed_image.jpg\n"));
        assert!(report.contains("- Supervisor: Routing to image_generation\n"));
        assert!(report.ends_with("- Supervisor: Routing to END\n"));
        assert!(!report.contains("stopped after"));
    }

    #[test]
    fn test_aborted_run_report_names_last_step() {
        let failure = WorkflowFailure {
            workflow_id: Uuid::new_v4(),
            source: WorkflowError::classification("API error: Bearer sk-live-123 rejected"),
            last_entry: Some(LogEntry::supervisor("Supervisor: Routing to text_overlay")),
        };
        let boxed: Box<dyn std::error::Error> = Box::new(failure);

        let report = render_error(boxed.as_ref());

        assert!(report.contains("Error during processing: Classification failed"));
        assert!(!report.contains("sk-live-123"));
        assert!(report.contains("Last step: Supervisor: Routing to text_overlay"));
    }

    #[test]
    fn test_other_errors_are_sanitized() {
        let boxed: Box<dyn std::error::Error> = "token=abc123 refused".into();
        let report = render_error(boxed.as_ref());
        assert_eq!(report, "Error: token=*** refused\n");
    }
}
