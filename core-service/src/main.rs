//! Attrition Predictor - command line entry point
//!
//! Scores one employee (from a JSON file or a bundled profile) and prints
//! the verdict.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;

use attrition_core::constants;
use attrition_core::logic::features::presets::{find_preset, preset_names, presets};
use attrition_core::{ArtifactPaths, InferenceOrchestrator, Prediction, RawAttributes, ReferenceProvider};

#[derive(Parser, Debug)]
#[command(name = "attrition-predict", version, about = "Predict employee attrition from HR attributes")]
struct Cli {
    /// Classifier artifact (Naive Bayes JSON)
    #[arg(long, env = "ATTRITION_MODEL_PATH")]
    model: Option<PathBuf>,

    /// Job role → average MonthlyRate table
    #[arg(long, env = "ATTRITION_ROLE_RATES_PATH")]
    role_rates: Option<PathBuf>,

    /// Expected SHA-256 of the model file
    #[arg(long, env = "ATTRITION_MODEL_SHA256")]
    model_sha256: Option<String>,

    /// JSON object of raw attributes (`-` for stdin)
    #[arg(long, short, conflicts_with_all = ["preset", "list_presets"])]
    input: Option<PathBuf>,

    /// Score one of the bundled sample employees
    #[arg(long, short, conflicts_with = "list_presets")]
    preset: Option<String>,

    /// List bundled sample employees and exit
    #[arg(long)]
    list_presets: bool,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    verdict: &'static str,
    attrition: bool,
    probability: f64,
    probability_percent: String,
    #[serde(flatten)]
    prediction: &'a Prediction,
}

impl Cli {
    fn artifact_paths(&self) -> ArtifactPaths {
        let mut paths = ArtifactPaths::from_env();
        if let Some(model) = &self.model {
            paths.model = model.clone();
        }
        if let Some(rates) = &self.role_rates {
            paths.role_rates = rates.clone();
        }
        if let Some(sha) = &self.model_sha256 {
            paths.model_sha256 = Some(sha.trim().to_lowercase());
        }
        paths
    }

    fn raw_attributes(&self) -> Result<RawAttributes> {
        if let Some(name) = &self.preset {
            return match find_preset(name) {
                Some(preset) => Ok(preset.attributes.clone()),
                None => bail!("unknown preset '{}', available: {}", name, preset_names().join(", ")),
            };
        }

        let json = match self.input.as_deref() {
            Some(path) if path.as_os_str() == "-" => {
                std::io::read_to_string(std::io::stdin()).context("failed to read stdin")?
            }
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
            None => bail!("nothing to score: pass --input FILE or --preset NAME"),
        };

        RawAttributes::from_json(&json).context("input is not a JSON object of attributes")
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if cli.list_presets {
        for preset in presets() {
            let role = preset
                .attributes
                .value("job_role")
                .map(|v| v.to_string())
                .unwrap_or_default();
            println!("{:<10} {}", preset.name, role);
        }
        return Ok(());
    }

    let raw = cli.raw_attributes()?;

    log::info!("{} v{}", constants::APP_NAME, constants::APP_VERSION);
    let provider = ReferenceProvider::new(cli.artifact_paths());
    let engine = InferenceOrchestrator::from_provider(&provider).context("startup failed")?;

    let prediction = engine.run(&raw)?;
    let result = &prediction.result;

    if cli.json {
        let report = Report {
            verdict: result.verdict(),
            attrition: result.is_attrition_likely(),
            probability: result.probability(),
            probability_percent: result.probability_percent(),
            prediction: &prediction,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Prediction: {}", result.verdict());
        println!("Probability of attrition: {}", result.probability_percent());
        if let Some(estimate) = prediction.monthly_rate {
            println!("MonthlyRate used: {:.2} ({:?})", estimate.value, estimate.tier);
        }
    }

    Ok(())
}
