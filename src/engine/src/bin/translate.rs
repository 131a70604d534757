//! # Translation command line
//!
//! Runs a translation profile against an input snapshot and prints the
//! result as JSON.
//!
//! ```text
//! fedpolicy-translate <profiles.json> <input.json> <profile-name>
//! ```
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG` - Log level (default: info), logs go to stderr
//! - `FEDPOLICY_MAX_INCLUSION_DEPTH`, `FEDPOLICY_SEED_RESULT`,
//!   `FEDPOLICY_CACHE_EXPRESSIONS` - see [`EngineConfig`]

use anyhow::{bail, Context, Result};
use fedpolicy_engine::{EngineConfig, InMemoryProfileRepository, TranslationEngine, TranslationInput};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [profiles_path, input_path, profile_name] = args.as_slice() else {
        bail!("usage: fedpolicy-translate <profiles.json> <input.json> <profile-name>");
    };

    info!("fedpolicy-translate v{}", fedpolicy_engine::VERSION);

    let repository = InMemoryProfileRepository::from_file(profiles_path)
        .with_context(|| format!("loading profiles from {}", profiles_path))?;

    let raw_input = std::fs::read_to_string(input_path)
        .with_context(|| format!("reading input from {}", input_path))?;
    let input: TranslationInput = serde_json::from_str(&raw_input)
        .with_context(|| format!("parsing input from {}", input_path))?;

    let engine = TranslationEngine::builder()
        .repository(Arc::new(repository))
        .config(EngineConfig::from_env())
        .build();

    let result = engine
        .translate_named(profile_name, &input)
        .with_context(|| format!("translating with profile '{}'", profile_name))?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
