use std::path::PathBuf;

/// Runtime configuration shared by the server binary and its modules.
///
/// The binary fills this from command-line flags or environment variables,
/// then passes it to storage initialization.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Record store connection string: `redb://PATH`, `file://PATH`, or a
    /// plain filesystem path to the redb database file.
    pub database_url: String,

    /// TCP port for the HTTP server.
    pub port: u16,

    /// Directory served as static assets.
    pub public_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            port: 3000,
            public_dir: PathBuf::from("public"),
        }
    }
}

impl ServiceConfig {
    /// Resolve the database file path from the connection string.
    ///
    /// Returns None when the connection string names no path.
    pub fn resolve_db_path(&self) -> Option<PathBuf> {
        let url = self.database_url.trim();
        let path = url
            .strip_prefix("redb://")
            .or_else(|| url.strip_prefix("file://"))
            .unwrap_or(url);
        if path.is_empty() {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }

    /// Listen address for the HTTP server (all interfaces).
    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
