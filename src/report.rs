use std::fmt;

use crate::check::CheckOutcome;

/// How the outcome line is written to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Connected {
                database,
                host,
                port,
                ..
            } => write!(
                f,
                "✅ Successfully connected to database '{}' on {}:{}",
                database, host, port
            ),
            CheckOutcome::Failed { reason, .. } => {
                write!(f, "❌ Could not connect to the database: {}", reason)
            }
        }
    }
}

/// Render the single report line for an outcome
pub fn render(outcome: &CheckOutcome, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(outcome.to_string()),
        OutputFormat::Json => serde_json::to_string(outcome),
    }
}
