use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// TLS negotiation policy, following libpq's `sslmode`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SslMode {
    Disable,
    #[default]
    Prefer,
    Require,
}

impl SslMode {
    pub fn name(&self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
        }
    }
}

impl FromStr for SslMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disable" => Ok(SslMode::Disable),
            "prefer" => Ok(SslMode::Prefer),
            "require" => Ok(SslMode::Require),
            other => Err(format!(
                "unsupported sslmode '{}' (expected disable, prefer or require)",
                other
            )),
        }
    }
}

/// Parameters for a single connection attempt
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub ssl_mode: SslMode,
    /// Upper bound for the whole connect + authenticate step. `None` leaves it to the driver.
    pub connect_timeout: Option<Duration>,
    pub application_name: String,
}

impl ConnectionParams {
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            host: host.into(),
            port,
            database: database.into(),
            ssl_mode: SslMode::default(),
            connect_timeout: None,
            application_name: env!("CARGO_PKG_NAME").to_string(),
        }
    }

    /// `host:port`, as shown in reports and logs
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("ssl_mode", &self.ssl_mode)
            .field("connect_timeout", &self.connect_timeout)
            .field("application_name", &self.application_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_password() {
        let params = ConnectionParams::new("postgres", "s3cret", "localhost", 5432, "gamo");
        let rendered = format!("{:?}", params);
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("gamo"));
    }

    #[test]
    fn test_endpoint() {
        let params = ConnectionParams::new("postgres", "", "db.internal", 6432, "app");
        assert_eq!(params.endpoint(), "db.internal:6432");
    }

    #[test]
    fn test_ssl_mode_parsing() {
        assert_eq!("disable".parse::<SslMode>(), Ok(SslMode::Disable));
        assert_eq!(" Require ".parse::<SslMode>(), Ok(SslMode::Require));
        assert!("verify-full".parse::<SslMode>().is_err());
        assert_eq!(SslMode::default().name(), "prefer");
    }
}
