//! Configuration module
//!
//! Settings are read from the process environment (after loading `.env` with
//! `dotenvy`). Unparseable numeric and boolean values fall back to their
//! defaults; structural problems are reported by [`Config::validate`].

use std::env;

use crate::constants::MAX_BATCH_SIZE;
use crate::validation::ValidationPolicy;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_EXTRACTION_CONCURRENCY: usize = 4;
const DEFAULT_MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_ALLOWED_EXTENSIONS: &str = "jpg,jpeg,png,pdf";

/// HTTP server settings
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub project_name: String,
    pub version: String,
    pub environment: String,
    pub cors_origins: Vec<String>,
    /// `compact` (default) or `json`
    pub log_format: String,
}

/// Vision model endpoint settings
#[derive(Clone, Debug)]
pub struct ModelConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Maximum number of in-flight model calls across all requests
    pub concurrency: usize,
}

/// Upload, output and extraction behavior
#[derive(Clone, Debug)]
pub struct ExtractionConfig {
    pub upload_folder: String,
    pub output_folder: String,
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub max_batch_size: usize,
    pub save_extracted_data: bool,
    pub delete_uploaded_files: bool,
    pub validate_pan_format: bool,
    pub validate_aadhaar_format: bool,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub extraction: ExtractionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_source(|_| None)
    }
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    value
        .map(|v| v.trim().to_lowercase())
        .and_then(|v| match v.as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn parse_list(value: String) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let port_raw = env::var("PORT").ok();
        if let Some(ref raw) = port_raw {
            raw.parse::<u16>()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;
        }

        Ok(Self::from_source(|key| env::var(key).ok()))
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_source<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = get("ENVIRONMENT")
            .or_else(|| get("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server = ServerConfig {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: get("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            project_name: get("PROJECT_NAME")
                .unwrap_or_else(|| "PAN & Aadhaar Extractor".to_string()),
            version: get("APP_VERSION").unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            environment,
            cors_origins,
            log_format: get("LOG_FORMAT")
                .unwrap_or_else(|| "compact".to_string())
                .to_lowercase(),
        };

        let model = ModelConfig {
            endpoint: get("MOONDREAM_ENDPOINT")
                .unwrap_or_else(|| "http://localhost:2020/v1".to_string())
                .trim_end_matches('/')
                .to_string(),
            model: get("MOONDREAM_MODEL").unwrap_or_else(|| "moondream2".to_string()),
            timeout_secs: get("MOONDREAM_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MODEL_TIMEOUT_SECS),
            concurrency: get("EXTRACTION_CONCURRENCY")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_EXTRACTION_CONCURRENCY),
        };

        let extraction = ExtractionConfig {
            upload_folder: get("UPLOAD_FOLDER").unwrap_or_else(|| "uploads".to_string()),
            output_folder: get("OUTPUT_FOLDER").unwrap_or_else(|| "outputs".to_string()),
            max_file_size_bytes: get("MAX_FILE_SIZE_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_FILE_SIZE_BYTES),
            allowed_extensions: parse_list(
                get("ALLOWED_EXTENSIONS").unwrap_or_else(|| DEFAULT_ALLOWED_EXTENSIONS.to_string()),
            ),
            max_batch_size: get("MAX_BATCH_SIZE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_BATCH_SIZE),
            save_extracted_data: parse_bool(get("SAVE_EXTRACTED_DATA"), true),
            delete_uploaded_files: parse_bool(get("DELETE_UPLOADED_FILES"), false),
            validate_pan_format: parse_bool(get("VALIDATE_PAN_FORMAT"), true),
            validate_aadhaar_format: parse_bool(get("VALIDATE_AADHAAR_FORMAT"), true),
        };

        Config {
            server,
            model,
            extraction,
        }
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.server.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.model.concurrency == 0 {
            return Err(anyhow::anyhow!(
                "EXTRACTION_CONCURRENCY must be at least 1"
            ));
        }

        if self.model.timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "MOONDREAM_TIMEOUT_SECS must be greater than 0"
            ));
        }

        if !(self.model.endpoint.starts_with("http://")
            || self.model.endpoint.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "MOONDREAM_ENDPOINT must be an http:// or https:// URL"
            ));
        }

        if self.extraction.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_BYTES must be greater than 0"));
        }

        if self.extraction.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_EXTENSIONS must list at least one extension"
            ));
        }

        if self.extraction.max_batch_size == 0 {
            return Err(anyhow::anyhow!("MAX_BATCH_SIZE must be at least 1"));
        }

        if self.is_production() && self.server.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        Ok(())
    }

    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            pan: self.extraction.validate_pan_format,
            aadhaar: self.extraction.validate_aadhaar_format,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
