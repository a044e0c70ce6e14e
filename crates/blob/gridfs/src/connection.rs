use mongodb::bson::doc;
use mongodb::gridfs::GridFsBucket;
use mongodb::options::{ClientOptions, Credential, GridFsBucketOptions, ServerAddress};
use mongodb::{Client, Database};
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use stowage_blob::BlobError;

use crate::config::GridFsConfig;
use crate::error::{Operation, classify};

/// Lazily opened, cached database handle for one GridFS store.
///
/// No I/O happens at construction. The first call to [`database`] opens the
/// client, attaches credentials when both username and password are
/// configured, and pings the server so that unreachable hosts and rejected
/// credentials fail right away. A successful handle is kept for the lifetime
/// of the connection; a failed attempt is not cached.
///
/// [`database`]: GridFsConnection::database
pub struct GridFsConnection {
    config: GridFsConfig,
    database: OnceCell<Database>,
}

impl std::fmt::Debug for GridFsConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridFsConnection")
            .field("config", &self.config)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl GridFsConnection {
    /// Create a connection provider for the given configuration.
    pub fn new(config: GridFsConfig) -> Self {
        Self {
            config,
            database: OnceCell::new(),
        }
    }

    /// The configuration this connection was built from.
    pub fn config(&self) -> &GridFsConfig {
        &self.config
    }

    /// Returns `true` once a database handle has been established.
    pub fn is_connected(&self) -> bool {
        self.database.initialized()
    }

    /// Return the cached database handle, connecting on first use.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::Connection`] if the server cannot be reached and
    /// [`BlobError::Authentication`] if the configured credentials are
    /// rejected.
    pub async fn database(&self) -> Result<&Database, BlobError> {
        self.database.get_or_try_init(|| self.connect()).await
    }

    /// Return a GridFS bucket handle over the cached database.
    pub async fn bucket(&self) -> Result<GridFsBucket, BlobError> {
        let database = self.database().await?;
        Ok(database.gridfs_bucket(self.bucket_options()))
    }

    pub(crate) fn client_options(&self) -> ClientOptions {
        let credential = self.config.credentials().map(|(username, password)| {
            Credential::builder()
                .username(username.to_owned())
                .password(password.to_owned())
                .source(self.config.database.clone())
                .build()
        });

        ClientOptions::builder()
            .hosts(vec![ServerAddress::Tcp {
                host: self.config.host.clone(),
                port: Some(self.config.port),
            }])
            .app_name(self.config.app_name.clone())
            .connect_timeout(Some(self.config.connect_timeout()))
            .server_selection_timeout(Some(self.config.server_selection_timeout()))
            .credential(credential)
            .build()
    }

    pub(crate) fn bucket_options(&self) -> GridFsBucketOptions {
        GridFsBucketOptions::builder()
            .bucket_name(self.config.bucket.clone())
            .chunk_size_bytes(self.config.chunk_size_bytes)
            .build()
    }

    async fn connect(&self) -> Result<Database, BlobError> {
        let host = format!("{}:{}", self.config.host, self.config.port);
        let authenticated = self.config.credentials().is_some();
        debug!(host = %host, database = %self.config.database, authenticated, "connecting to MongoDB");

        let client = Client::with_options(self.client_options())
            .map_err(|e| classify(&e, Operation::Connect, ""))?;
        let database = client.database(&self.config.database);

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| {
                let err = classify(&e, Operation::Connect, "");
                error!(host = %host, error = %err, "MongoDB connection failed");
                err
            })?;

        info!(host = %host, database = %self.config.database, authenticated, "MongoDB connection established");
        Ok(database)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn construction_does_not_connect() {
        let conn = GridFsConnection::new(GridFsConfig::default());
        assert!(!conn.is_connected());
    }

    #[test]
    fn client_options_use_configured_host() {
        let conn = GridFsConnection::new(
            GridFsConfig::new("mongo.internal", 27018, "media")
                .with_app_name("stowage")
                .with_connect_timeout(Duration::from_millis(750)),
        );
        let options = conn.client_options();
        assert_eq!(
            options.hosts,
            vec![ServerAddress::Tcp {
                host: "mongo.internal".into(),
                port: Some(27018),
            }]
        );
        assert_eq!(options.app_name.as_deref(), Some("stowage"));
        assert_eq!(options.connect_timeout, Some(Duration::from_millis(750)));
    }

    #[test]
    fn no_credential_without_both_parts() {
        let mut config = GridFsConfig::default();
        config.username = Some("app".into());
        let conn = GridFsConnection::new(config);
        assert!(conn.client_options().credential.is_none());
    }

    #[test]
    fn credential_sourced_from_database() {
        let conn = GridFsConnection::new(
            GridFsConfig::new("localhost", 27017, "media").with_credentials("app", "secret"),
        );
        let credential = conn
            .client_options()
            .credential
            .expect("credential should be set");
        assert_eq!(credential.username.as_deref(), Some("app"));
        assert_eq!(credential.password.as_deref(), Some("secret"));
        assert_eq!(credential.source.as_deref(), Some("media"));
    }

    #[test]
    fn bucket_options_follow_config() {
        let conn = GridFsConnection::new(
            GridFsConfig::default()
                .with_bucket("uploads")
                .with_chunk_size_bytes(4096),
        );
        let options = conn.bucket_options();
        assert_eq!(options.bucket_name.as_deref(), Some("uploads"));
        assert_eq!(options.chunk_size_bytes, Some(4096));
    }

    #[tokio::test]
    async fn unreachable_server_is_connection_error() {
        // Port 1 on loopback refuses connections immediately.
        let conn = GridFsConnection::new(
            GridFsConfig::new("127.0.0.1", 1, "test")
                .with_connect_timeout(Duration::from_millis(200))
                .with_server_selection_timeout(Duration::from_millis(300)),
        );
        let err = conn
            .database()
            .await
            .expect_err("connecting to a closed port should fail");
        assert!(matches!(err, BlobError::Connection(_)), "got {err:?}");
        assert!(!conn.is_connected(), "failed attempts are not cached");
    }
}
