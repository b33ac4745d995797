use std::env;
use std::path::PathBuf;

/// Runtime settings, read once at startup from environment variables.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub upload_dir: PathBuf,
    /// The synthetic load endpoints exist purely for infrastructure testing
    /// and are kept off the routing table unless explicitly enabled.
    pub enable_load_endpoints: bool,
}

impl Settings {
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .expect("PORT must be a valid number");
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let upload_dir =
            PathBuf::from(env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()));
        let enable_load_endpoints = env::var("ENABLE_LOAD_ENDPOINTS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Settings {
            host,
            port,
            database_url,
            upload_dir,
            enable_load_endpoints,
        }
    }
}
