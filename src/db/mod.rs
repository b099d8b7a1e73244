pub mod connection;
pub mod driver;
pub mod drivers;
pub mod error;

pub use connection::{ConnectionParams, SslMode};
pub use driver::{create_connector, Connector, DatabaseSession};
pub use error::{describe_error, ConnectionError, FailureKind};
