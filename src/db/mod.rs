//! Database module: connection handling and the demo document model.
//!
//! Layout:
//! - `models.rs`: the document struct the CRUD sequence moves through MongoDB

pub mod models;

pub use models::Trainer;

use mongodb::{Client, bson::doc};
use tracing::info;

use crate::error::CastorError;

/// Turns a bare `host:port` endpoint into a MongoDB connection string.
///
/// The endpoint must not carry a scheme of its own; the driver gets
/// exactly one `mongodb://` prefix.
pub fn server_uri(addr: &str) -> Result<String, CastorError> {
    if addr.is_empty() || addr.contains("://") || addr.contains(char::is_whitespace) {
        return Err(CastorError::BadServerAddress {
            addr: addr.to_string(),
        });
    }
    Ok(format!("mongodb://{addr}"))
}

/// Connects to the server at `addr` and verifies the connection with a
/// ping against the `admin` database.
///
/// The driver connects lazily, so the ping is what actually reaches the
/// server; a bad endpoint surfaces here rather than on the first insert.
pub async fn connect(addr: &str) -> Result<Client, CastorError> {
    let uri = server_uri(addr)?;
    let client = Client::with_uri_str(&uri).await?;
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;
    info!(%addr, "connected to MongoDB");
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_uri_prefixes_the_scheme() {
        assert_eq!(
            server_uri("localhost:27017").expect("valid address"),
            "mongodb://localhost:27017"
        );
        assert_eq!(
            server_uri("db.internal:9999").expect("valid address"),
            "mongodb://db.internal:9999"
        );
    }

    #[test]
    fn server_uri_rejects_malformed_addresses() {
        assert!(matches!(
            server_uri(""),
            Err(CastorError::BadServerAddress { .. })
        ));
        assert!(matches!(
            server_uri("mongodb://localhost:27017"),
            Err(CastorError::BadServerAddress { .. })
        ));
        assert!(matches!(
            server_uri("local host:27017"),
            Err(CastorError::BadServerAddress { .. })
        ));
    }
}
