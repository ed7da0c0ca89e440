//! SmartCV: AI-powered resume and job description matching tool

mod cli;
mod config;
mod error;
mod input;
mod llm;
mod output;
mod processing;

use clap::Parser;
use cli::{Cli, Commands, ConfigAction, ModelAction};
use config::Config;
use error::{Result, SmartCvError};
use input::file_detector::{JOB_EXTENSIONS, RESUME_EXTENSIONS};
use input::manager::InputManager;
use llm::client::GroqClient;
use log::{error, warn};
use output::formatter::ConsoleFormatter;
use processing::analyzer::MatchEngine;
use processing::embedding_manager::EmbeddingModelManager;
use processing::embeddings::{Embedder, EmbeddingEngine};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Pick up GROQ_API_KEY and friends from a .env file when present.
    dotenvy::dotenv().ok();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            llm,
            embedding,
            output: output_path,
            json: json_path,
            detailed,
        } => {
            cli::validate_file_extension(&resume, RESUME_EXTENSIONS)
                .map_err(|e| SmartCvError::InvalidInput(format!("Resume file: {}", e)))?;
            cli::validate_file_extension(&job, JOB_EXTENSIONS)
                .map_err(|e| SmartCvError::InvalidInput(format!("Job description file: {}", e)))?;

            println!("🚀 SmartCV analysis");
            println!("📄 Resume: {}", resume.display());
            println!("💼 Job Description: {}", job.display());

            println!("\n📂 Extracting text from files...");
            let mut input_manager = InputManager::new();

            // Resume extraction degrades to a placeholder; the run continues.
            let resume_text = input_manager.extract_resume_text(&resume).await;
            if !resume_text.ok {
                println!("⚠️  Could not extract the resume text; continuing with placeholder");
            }

            let job_text = input_manager.extract_text(&job).await?;
            if job_text.trim().is_empty() {
                return Err(SmartCvError::InvalidInput(format!(
                    "Job description file is empty: {}",
                    job.display()
                )));
            }

            // Similarity is one of two independent branches; losing the
            // embedding model must not stop report generation.
            let embedding_model = embedding.unwrap_or_else(|| config.models.embedding_model.clone());
            let embedder: Option<Arc<dyn Embedder>> =
                match load_embedder(&config, &embedding_model).await {
                    Ok(engine) => Some(Arc::new(engine)),
                    Err(e) => {
                        println!("⚠️  Similarity scoring unavailable: {}", e);
                        None
                    }
                };

            let api_key = match config.api_key() {
                Ok(key) => key,
                Err(e) => {
                    // The API rejects the empty key with an auth error that
                    // lands in the report branch's failure slot.
                    println!("⚠️  {}", e);
                    String::new()
                }
            };

            let llm_model = llm.unwrap_or_else(|| config.llm.model.clone());
            let completer = Arc::new(GroqClient::new(
                config.llm.api_url.clone(),
                api_key,
                llm_model,
                Duration::from_secs(config.llm.timeout_secs),
            )?);

            let engine = MatchEngine::new(embedder, completer)?;

            println!("\n🔍 Generating scores...");
            let match_report = engine.analyze(&resume_text, &job_text).await;

            let formatter = ConsoleFormatter::new(config.output.color_output, detailed);
            print!("{}", formatter.format(&match_report));

            if let Some(report_text) = &match_report.report {
                let report_path =
                    output_path.unwrap_or_else(|| PathBuf::from(&config.output.report_filename));
                output::report::save_report_text(&report_path, report_text).await?;
                println!("\n💾 Report saved to {}", report_path.display());
            }

            if let Some(json_path) = json_path {
                output::report::save_json(&json_path, &match_report).await?;
                println!("💾 JSON summary saved to {}", json_path.display());
            }

            println!("⚡ Completed in {}ms", match_report.processing_time_ms);

            if match_report.is_empty() {
                return Err(SmartCvError::AnalysisFailed(
                    "no sub-result could be produced; see warnings above".to_string(),
                ));
            }
        }

        Commands::Models { action } => {
            let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;

            match action {
                ModelAction::List => {
                    println!("🧠 Embedding Models\n");
                    for model in manager.list_available_models() {
                        let model_id = manager
                            .resolve_model_id(&model.repo_id)
                            .unwrap_or_else(|| model.repo_id.clone());
                        let status = if manager.is_model_downloaded(&model_id) {
                            "✅ Downloaded"
                        } else {
                            "⬇️  Available"
                        };
                        println!(
                            "  • {} ({}) - {} MB, {} dims [{}]",
                            model.name, model.repo_id, model.size_mb, model.dimensions, status
                        );
                        println!("    {}", model.description);
                    }
                    println!("\n💡 Download with: smartcv models download <model>");
                }

                ModelAction::Download { model, force } => {
                    let model_id = resolve_or_fail(&manager, &model)?;

                    if manager.is_model_downloaded(&model_id) {
                        if !force {
                            println!("✅ Model '{}' is already downloaded!", model_id);
                            println!("💡 Use --force to re-download");
                            return Ok(());
                        }
                        manager.remove_model(&model_id).await?;
                    }

                    let model_path = manager.download_model(&model_id).await?;
                    println!("📁 Location: {}", model_path.display());
                }

                ModelAction::Remove { model } => {
                    let model_id = resolve_or_fail(&manager, &model)?;
                    let model_path = manager.remove_model(&model_id).await?;
                    println!("✅ Model '{}' removed successfully!", model_id);
                    println!("📁 Removed directory: {}", model_path.display());
                }

                ModelAction::Info { model } => {
                    let model_id = resolve_or_fail(&manager, &model)?;
                    let info = manager.get_model_info(&model_id).ok_or_else(|| {
                        SmartCvError::ModelError(format!("Unknown embedding model: {}", model_id))
                    })?;

                    println!("Name: {}", info.name);
                    println!("Repository: {}", info.repo_id);
                    println!("Size: {} MB", info.size_mb);
                    println!("Dimensions: {}", info.dimensions);
                    println!("Description: {}", info.description);

                    if let Some(path) = manager.get_model_path(&model_id) {
                        println!("Status: ✅ Downloaded");
                        println!("Location: {}", path.display());
                    } else {
                        println!("Status: ⬇️  Available for download");
                        println!("\n💡 To download this model, run:");
                        println!("   smartcv models download {}", model_id);
                    }
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Models Directory: {}", config.models_dir().display());
                println!("Embedding Model: {}", config.models.embedding_model);
                println!("LLM Model: {}", config.llm.model);
                println!("LLM Endpoint: {}", config.llm.api_url);
                println!("API Key Env Var: {}", config.llm.api_key_env);
                println!("LLM Timeout: {}s", config.llm.timeout_secs);
                println!("Report Filename: {}", config.output.report_filename);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                let default_config = Config::default();
                default_config.save()?;
                println!("✅ Configuration reset successfully!");
            }
        },
    }

    Ok(())
}

/// Ensure the configured embedding model is on disk and load it.
async fn load_embedder(config: &Config, model: &str) -> Result<EmbeddingEngine> {
    let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;

    let model_id = manager.resolve_model_id(model).ok_or_else(|| {
        SmartCvError::ModelError(format!("Unknown embedding model: {}", model))
    })?;

    if !manager.is_model_downloaded(&model_id) {
        warn!("Embedding model '{}' not found locally, downloading", model_id);
    }
    let model_path = manager.ensure_model_available(&model_id).await?;

    EmbeddingEngine::load(&model_path, &model_id)
}

fn resolve_or_fail(manager: &EmbeddingModelManager, model: &str) -> Result<String> {
    manager.resolve_model_id(model).ok_or_else(|| {
        SmartCvError::ModelError(format!(
            "Unknown embedding model: {}. Use 'smartcv models list' to see available models",
            model
        ))
    })
}
