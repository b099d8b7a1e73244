//! PostgreSQL driver implementation

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinHandle;
use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, Config, Connection, NoTls};
use tracing::{debug, warn};

use crate::db::connection::{ConnectionParams, SslMode};
use crate::db::driver::{Connector, DatabaseSession};
use crate::db::error::{describe_error, ConnectionError, Result};

pub struct PostgresConnector;

impl PostgresConnector {
    fn config(params: &ConnectionParams) -> Config {
        let mut config = Config::new();
        config
            .user(&params.user)
            .host(&params.host)
            .port(params.port)
            .dbname(&params.database)
            .application_name(&params.application_name)
            .ssl_mode(match params.ssl_mode {
                SslMode::Disable => tokio_postgres::config::SslMode::Disable,
                SslMode::Prefer => tokio_postgres::config::SslMode::Prefer,
                SslMode::Require => tokio_postgres::config::SslMode::Require,
            });
        // libpq treats an empty password as "no password"
        if !params.password.is_empty() {
            config.password(&params.password);
        }
        config
    }
}

#[async_trait]
impl Connector for PostgresConnector {
    async fn connect(&self, params: &ConnectionParams) -> Result<Box<dyn DatabaseSession>> {
        let config = Self::config(params);
        debug!(
            endpoint = %params.endpoint(),
            database = %params.database,
            user = %params.user,
            ssl_mode = params.ssl_mode.name(),
            "opening PostgreSQL session"
        );

        let attempt = open(&config, params.ssl_mode);
        let (client, connection) = match params.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, attempt)
                .await
                .map_err(|_| ConnectionError::Timeout(limit))??,
            None => attempt.await?,
        };

        Ok(Box::new(PostgresSession {
            client: Some(client),
            connection: Some(connection),
        }))
    }
}

async fn open(config: &Config, ssl_mode: SslMode) -> Result<(Client, JoinHandle<()>)> {
    match ssl_mode {
        SslMode::Disable => {
            let (client, connection) = config.connect(NoTls).await.map_err(classify)?;
            Ok((client, spawn_connection(connection)))
        }
        SslMode::Prefer | SslMode::Require => open_tls(config).await,
    }
}

#[cfg(feature = "tls")]
async fn open_tls(config: &Config) -> Result<(Client, JoinHandle<()>)> {
    // prefer/require encrypt without verifying the server certificate, as libpq does
    let connector = native_tls::TlsConnector::builder()
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .build()
        .map_err(|e| ConnectionError::Tls(e.to_string()))?;
    let tls = postgres_native_tls::MakeTlsConnector::new(connector);

    let (client, connection) = config.connect(tls).await.map_err(classify)?;
    Ok((client, spawn_connection(connection)))
}

#[cfg(not(feature = "tls"))]
async fn open_tls(config: &Config) -> Result<(Client, JoinHandle<()>)> {
    if config.get_ssl_mode() == tokio_postgres::config::SslMode::Require {
        return Err(ConnectionError::Tls(
            "sslmode=require needs the `tls` feature (not compiled)".into(),
        ));
    }
    let (client, connection) = config.connect(NoTls).await.map_err(classify)?;
    Ok((client, spawn_connection(connection)))
}

// Drive the connection future (required by tokio-postgres)
fn spawn_connection<S, T>(connection: Connection<S, T>) -> JoinHandle<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            warn!("PostgreSQL connection error: {}", e);
        }
    })
}

/// Map a driver error onto the failure classes reported to the user
fn classify(err: tokio_postgres::Error) -> ConnectionError {
    let detail = describe_error(&err);

    if let Some(code) = err.code() {
        return if *code == SqlState::INVALID_PASSWORD
            || *code == SqlState::INVALID_AUTHORIZATION_SPECIFICATION
        {
            ConnectionError::AuthRejected(detail)
        } else if *code == SqlState::INVALID_CATALOG_NAME {
            ConnectionError::DatabaseNotFound(detail)
        } else {
            ConnectionError::Rejected(detail)
        };
    }

    let io_failure = std::error::Error::source(&err).is_some_and(|cause| cause.is::<std::io::Error>());
    if io_failure || err.is_closed() {
        ConnectionError::Unreachable(detail)
    } else {
        ConnectionError::Failed(detail)
    }
}

pub struct PostgresSession {
    client: Option<Client>,
    connection: Option<JoinHandle<()>>,
}

#[async_trait]
impl DatabaseSession for PostgresSession {
    async fn close(self: Box<Self>) -> Result<()> {
        let mut session = self;
        // Dropping the client makes the connection task send Terminate and finish
        drop(session.client.take());
        if let Some(connection) = session.connection.take() {
            connection
                .await
                .map_err(|e| ConnectionError::Failed(e.to_string()))?;
        }
        debug!("PostgreSQL session closed");
        Ok(())
    }
}

impl Drop for PostgresSession {
    fn drop(&mut self) {
        if self.client.take().is_some() {
            debug!("PostgreSQL session released without close");
        }
    }
}
