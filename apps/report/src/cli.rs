//! Command-line surface for the report binary.
//!
//! The pipeline only ever sees plain text and/or structured JSON; producing
//! those (upload handling, PDF/DOCX extraction, parsing-service calls) is
//! upstream's job. The CLI takes their output as files and prints the
//! report (or the canonical list as JSON) to stdout.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde_json::{Map, Value};
use tracing::info;

use crate::errors::AppError;
use crate::pipeline::aggregate::aggregate;
use crate::report::format::format_report;

#[derive(Debug, Parser)]
#[command(name = "resume-report")]
#[command(about = "Distill parsed-resume output into a deduplicated work-experience report")]
#[command(version)]
pub struct Cli {
    /// Parsed-resume profile JSON, in whatever shape the upstream service emits.
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Plain text extracted from a PDF/DOCX, scanned alongside the profile.
    #[arg(long)]
    pub text: Option<PathBuf>,

    /// Print the canonical experience list as JSON instead of the report.
    #[arg(long)]
    pub experiences_json: bool,
}

pub fn run(cli: Cli) -> Result<(), AppError> {
    if cli.profile.is_none() && cli.text.is_none() {
        return Err(AppError::Validation(
            "provide --profile and/or --text".to_string(),
        ));
    }

    let mut profile: Value = match &cli.profile {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Value::Object(Map::new()),
    };

    if let Some(path) = &cli.text {
        let text = fs::read_to_string(path)?;
        merge_raw_text(&mut profile, text);
    }

    let experiences = aggregate(&profile)?;
    info!(count = experiences.len(), "aggregated experience entries");

    if cli.experiences_json {
        println!("{}", serde_json::to_string_pretty(&experiences)?);
    } else {
        println!("{}", format_report(&profile, &experiences)?);
    }

    Ok(())
}

/// Attaches extracted text to the profile under `raw_text`, inside the
/// `data` envelope when the profile carries one (the pipeline reads fields
/// from inside the envelope).
fn merge_raw_text(profile: &mut Value, text: String) {
    let target = if profile.get("data").map_or(false, Value::is_object) {
        &mut profile["data"]
    } else {
        profile
    };
    if let Some(obj) = target.as_object_mut() {
        obj.insert("raw_text".to_string(), Value::String(text));
    }
}
