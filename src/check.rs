//! One-shot connectivity check

use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

use crate::db::error::Result;
use crate::db::{ConnectionParams, Connector, FailureKind};

/// Result of a single connectivity check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    Connected {
        database: String,
        host: String,
        port: u16,
        latency_ms: u64,
    },
    Failed {
        kind: FailureKind,
        reason: String,
    },
}

impl CheckOutcome {
    pub fn is_connected(&self) -> bool {
        matches!(self, CheckOutcome::Connected { .. })
    }
}

pub struct ConnectivityChecker {
    connector: Box<dyn Connector>,
}

impl ConnectivityChecker {
    pub fn new(connector: Box<dyn Connector>) -> Self {
        Self { connector }
    }

    /// Attempt one connection and release it again.
    ///
    /// Operational failures (network, authentication, missing database) come
    /// back as [`CheckOutcome::Failed`]. Anything else is returned as an error.
    pub async fn check_connection(&self, params: &ConnectionParams) -> Result<CheckOutcome> {
        let start = Instant::now();

        let session = match self.connector.connect(params).await {
            Ok(session) => session,
            Err(e) => {
                let Some(kind) = e.kind() else {
                    return Err(e);
                };
                warn!(endpoint = %params.endpoint(), ?kind, "connection attempt failed: {}", e);
                return Ok(CheckOutcome::Failed {
                    kind,
                    reason: single_line(&e.to_string()),
                });
            }
        };

        let latency_ms = start.elapsed().as_millis() as u64;
        info!(endpoint = %params.endpoint(), database = %params.database, latency_ms, "connected");

        // The check already succeeded; a failed shutdown is only worth a warning
        if let Err(e) = session.close().await {
            warn!("failed to close session cleanly: {}", e);
        }

        Ok(CheckOutcome::Connected {
            database: params.database.clone(),
            host: params.host.clone(),
            port: params.port,
            latency_ms,
        })
    }
}

/// Collapse multi-line driver messages so a report stays on one line
fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
