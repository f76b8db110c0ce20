use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_report::cli::{run, Cli};

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // load .env if present; ignore if missing

    // Structured logging to stderr; stdout is reserved for the report.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    run(cli)?;
    Ok(())
}
