//! Application state for the API server

use bti_ai::{AnalysisProvider, GeminiClient, GeminiConfig};
use bti_store::{
    CleanupService, ImageStore, LocalImageStore, ReportRepository, SqliteReportRepository,
};
use std::path::PathBuf;
use std::sync::Arc;

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// Report repository
    pub repo: Arc<dyn ReportRepository>,
    /// Image blob store
    pub images: Arc<dyn ImageStore>,
    /// Analysis / image generation provider
    pub ai: Arc<dyn AnalysisProvider>,
    /// Retention and sync service
    pub cleanup: Arc<CleanupService>,
    /// Server configuration
    pub config: Arc<ApiConfig>,
    /// API version
    pub version: String,
}

impl AppState {
    /// Create app state from configuration: file-backed SQLite, local
    /// filesystem image store, real Gemini client.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let data_dir = PathBuf::from(&config.data_dir);
        tokio::fs::create_dir_all(&data_dir).await?;

        let repo: Arc<dyn ReportRepository> =
            Arc::new(SqliteReportRepository::open(data_dir.join("reports.db"))?);
        let images: Arc<dyn ImageStore> = Arc::new(
            LocalImageStore::new(
                data_dir.join("images"),
                format!("{}/images", config.public_base_url.trim_end_matches('/')),
            )
            .await?,
        );
        let ai: Arc<dyn AnalysisProvider> =
            Arc::new(GeminiClient::new(GeminiConfig::new(&config.gemini_api_key))?);

        Ok(Self::with_components(repo, images, ai, config))
    }

    /// Create app state from explicit components (tests plug in stubs here)
    pub fn with_components(
        repo: Arc<dyn ReportRepository>,
        images: Arc<dyn ImageStore>,
        ai: Arc<dyn AnalysisProvider>,
        config: ApiConfig,
    ) -> Self {
        let cleanup = Arc::new(CleanupService::new(repo.clone(), images.clone()));
        Self {
            repo,
            images,
            ai,
            cleanup,
            config: Arc::new(config),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    /// Admin password compared on /api/admin/auth; never serialized
    pub admin_password: String,
    /// Gemini API key; never serialized
    pub gemini_api_key: String,
    /// Directory holding the SQLite database and image blobs
    pub data_dir: String,
    /// Externally visible base URL used to build image URLs
    pub public_base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
            admin_password: String::new(),
            gemini_api_key: String::new(),
            data_dir: "./data".to_string(),
            public_base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl ApiConfig {
    /// Resolve configuration from the environment.
    ///
    /// `BTI_ADMIN_PASSWORD` and `GEMINI_API_KEY` are required; the rest
    /// fall back to defaults.
    pub fn from_env() -> Result<Self, String> {
        let admin_password = std::env::var("BTI_ADMIN_PASSWORD")
            .map_err(|_| "BTI_ADMIN_PASSWORD is not set".to_string())?;
        let gemini_api_key =
            std::env::var("GEMINI_API_KEY").map_err(|_| "GEMINI_API_KEY is not set".to_string())?;

        let defaults = Self::default();
        let host = std::env::var("BTI_HOST").unwrap_or(defaults.host);
        let port = match std::env::var("BTI_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| format!("BTI_PORT is not a port number: {}", raw))?,
            Err(_) => defaults.port,
        };
        let data_dir = std::env::var("BTI_DATA_DIR").unwrap_or(defaults.data_dir);
        let public_base_url = std::env::var("BTI_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", host, port));

        Ok(Self {
            host,
            port,
            enable_cors: true,
            admin_password,
            gemini_api_key,
            data_dir,
            public_base_url,
        })
    }
}
