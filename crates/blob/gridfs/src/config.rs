use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the GridFS blob store backend.
///
/// Keys may be written either plainly (`host`) or with the uploader-style
/// `grid_fs_` prefix (`grid_fs_host`).
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridFsConfig {
    /// MongoDB server host name.
    #[serde(alias = "grid_fs_host")]
    pub host: String,

    /// MongoDB server port.
    #[serde(alias = "grid_fs_port")]
    pub port: u16,

    /// Database holding the GridFS bucket.
    #[serde(alias = "grid_fs_database")]
    pub database: String,

    /// Username for authentication. Only used together with `password`.
    #[serde(alias = "grid_fs_username")]
    pub username: Option<String>,

    /// Password for authentication. Redacted in `Debug`.
    #[serde(alias = "grid_fs_password")]
    pub password: Option<String>,

    /// GridFS bucket name (collection prefix).
    pub bucket: String,

    /// Chunk size for new uploads. `None` keeps the driver default (255 KiB).
    pub chunk_size_bytes: Option<u32>,

    /// Timeout for establishing a TCP connection, in milliseconds.
    pub connect_timeout_ms: u64,

    /// Timeout for selecting a usable server, in milliseconds.
    pub server_selection_timeout_ms: u64,

    /// Application name reported to the server.
    pub app_name: Option<String>,

    /// Remove older revisions of a path after each successful write.
    pub delete_old_revisions: bool,
}

impl Default for GridFsConfig {
    fn default() -> Self {
        Self {
            host: String::from("localhost"),
            port: 27017,
            database: String::from("stowage"),
            username: None,
            password: None,
            bucket: String::from("fs"),
            chunk_size_bytes: None,
            connect_timeout_ms: 5_000,
            server_selection_timeout_ms: 5_000,
            app_name: None,
            delete_old_revisions: false,
        }
    }
}

impl std::fmt::Debug for GridFsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridFsConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("bucket", &self.bucket)
            .field("chunk_size_bytes", &self.chunk_size_bytes)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field(
                "server_selection_timeout_ms",
                &self.server_selection_timeout_ms,
            )
            .field("app_name", &self.app_name)
            .field("delete_old_revisions", &self.delete_old_revisions)
            .finish()
    }
}

impl GridFsConfig {
    /// Create a new `GridFsConfig` for the given server and database.
    pub fn new(host: impl Into<String>, port: u16, database: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            database: database.into(),
            ..Self::default()
        }
    }

    /// Set the username and password used to authenticate.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the GridFS bucket name.
    #[must_use]
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Set the chunk size for new uploads.
    #[must_use]
    pub fn with_chunk_size_bytes(mut self, chunk_size_bytes: u32) -> Self {
        self.chunk_size_bytes = Some(chunk_size_bytes);
        self
    }

    /// Set the TCP connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = duration_to_ms(timeout);
        self
    }

    /// Set the server selection timeout.
    #[must_use]
    pub fn with_server_selection_timeout(mut self, timeout: Duration) -> Self {
        self.server_selection_timeout_ms = duration_to_ms(timeout);
        self
    }

    /// Set the application name reported to the server.
    #[must_use]
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    /// Remove older revisions of a path after each successful write.
    #[must_use]
    pub fn with_delete_old_revisions(mut self, enabled: bool) -> Self {
        self.delete_old_revisions = enabled;
        self
    }

    /// Credentials to authenticate with, if both username and password are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) => Some((username, password)),
            _ => None,
        }
    }

    /// TCP connect timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Server selection timeout as a [`Duration`].
    pub fn server_selection_timeout(&self) -> Duration {
        Duration::from_millis(self.server_selection_timeout_ms)
    }
}

fn duration_to_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
