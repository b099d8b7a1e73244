use async_trait::async_trait;

use super::connection::ConnectionParams;
use super::error::Result;

/// An open, authenticated session. Dropping it without `close` still releases it.
#[async_trait]
pub trait DatabaseSession: Send {
    /// Release the session, waiting for the server side to shut down
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Core trait for opening sessions against a database server
#[async_trait]
pub trait Connector: Send + Sync {
    /// Make exactly one connection attempt with the given parameters
    async fn connect(&self, params: &ConnectionParams) -> Result<Box<dyn DatabaseSession>>;
}

/// Factory function - the PostgreSQL connector used by the CLI
pub fn create_connector() -> Box<dyn Connector> {
    Box::new(super::drivers::postgres::PostgresConnector)
}
