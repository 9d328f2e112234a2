// Entry point for the garment-valuer CLI.
// The lib.rs file serves as the public API for external consumers.

use std::path::PathBuf;
use std::process::ExitCode;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use garment_valuer_lib::commands::{
    AnalysisReport,
    ImageInput,
    analyze_garment,
    check_health,
    convert_estimate,
    render_health,
    render_report,
};
use garment_valuer_lib::{
    AppConfig,
    BackendUrl,
    CommandCamera,
    PresetPrompt,
    WorkflowController,
    WorkflowState,
};

#[derive(Debug, Parser)]
#[command(name = "garment-valuer", version, about = "Photograph a garment and estimate its resale value")]
struct Cli {
    /// development or production
    #[arg(long, global = true, env = "GARMENT_ENV")]
    environment: Option<String>,

    /// Backend base URL for the active environment, e.g. http://127.0.0.1:5050
    #[arg(long, global = true)]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check whether the analysis backend is reachable
    Health,

    /// Capture or pick a garment photo and fetch its depreciation
    Analyze {
        /// Existing image to upload
        #[arg(long, conflicts_with = "camera", required_unless_present = "camera")]
        image: Option<PathBuf>,

        /// Take a picture with the configured camera command instead
        #[arg(long)]
        camera: bool,

        /// Use the front lens
        #[arg(long, requires = "camera")]
        front: bool,

        /// Capture quality between 0.0 and 1.0
        #[arg(long, default_value_t = 0.8, value_parser = parse_quality)]
        quality: f32,

        /// Also show the estimated value in this currency, e.g. EUR
        #[arg(long)]
        currency: Option<String>,

        /// Print the final state as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_file(false)         // Remove file path
        .with_line_number(false)  // Remove line numbers
        .with_thread_ids(false)   // Remove thread IDs
        .with_thread_names(false) // Remove thread names
        .with_target(false)       // Remove module path
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .compact();

    subscriber.init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    debug!("Configuration: {:?}", config);

    match cli.command {
        Command::Health => {
            let controller = WorkflowController::from_config(&config, build_camera(&config))?;
            let report = check_health(&controller).await;
            println!("{}", render_health(&report));
            Ok(if report.backend.reachable { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Analyze { image, camera, front, quality, currency, json } => {
            let controller = WorkflowController::from_config(&config, build_camera(&config))?;
            // Invoking the command is the user's consent.
            controller.request_permissions(&PresetPrompt::grant_all()).await;
            if front {
                controller.media().toggle_facing();
            }
            controller.media().set_quality(quality);

            let input = match image {
                Some(path) if !camera => ImageInput::Library(path),
                _ => ImageInput::Camera,
            };

            let state = analyze_garment(&controller, input)
                .await
                .context("workflow rejected the request")?;

            let converted_value = match (&state, currency.as_deref()) {
                (WorkflowState::Succeeded(appraisal), Some(code)) => {
                    convert_estimate(&config, appraisal, code).await
                }
                _ => None,
            };
            let succeeded = matches!(state, WorkflowState::Succeeded(_));
            let report = AnalysisReport { state, converted_value };
            controller.reset().await.context("discarding the capture")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", render_report(&report));
            }
            info!("Analysis finished");
            Ok(if succeeded { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}

fn build_camera(config: &AppConfig) -> CommandCamera {
    CommandCamera::fswebcam(config.camera_command.clone()).with_timeout(config.camera_timeout)
}

fn parse_quality(raw: &str) -> std::result::Result<f32, String> {
    let quality: f32 = raw.parse().map_err(|e| format!("{e}"))?;
    if quality.is_finite() && (0.0..=1.0).contains(&quality) {
        Ok(quality)
    } else {
        Err(format!("quality must be between 0.0 and 1.0, got {raw}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_must_be_a_finite_fraction() {
        assert_eq!(parse_quality("0.5"), Ok(0.5));
        for raw in ["NaN", "inf", "-0.1", "1.5", "high"] {
            assert!(parse_quality(raw).is_err(), "{raw} was accepted");
        }
    }

    #[test]
    fn environment_flag_reads_env_attribute() {
        let cli = Cli::try_parse_from(["garment-valuer", "--environment", "prod", "health"]).unwrap();
        assert_eq!(cli.environment.as_deref(), Some("prod"));
        assert!(Cli::try_parse_from(["garment-valuer", "analyze", "--camera", "--quality", "NaN"]).is_err());
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::from_env().context("reading GARMENT_* environment")?;
    if let Some(env) = &cli.environment {
        config.environment = env.parse()?;
    }
    if let Some(url) = &cli.backend_url {
        config.set_backend_url(BackendUrl::parse(url)?);
    }
    Ok(config)
}
