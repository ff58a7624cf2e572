use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{AppError, Result};

/// Storage path value selecting the in-memory backend.
pub const MEMORY_STORAGE: &str = "memory";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Memory,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub storage: StorageConfig,
    pub template_dir: PathBuf,
    pub page_size: usize,
    pub low_stock_threshold: u32,
    pub secure_cookies: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:1227".to_string(),
            storage: StorageConfig::File(PathBuf::from("storage/local_storage.json")),
            template_dir: PathBuf::from("templates"),
            page_size: 5,
            low_stock_threshold: 30,
            secure_cookies: false,
        }
    }
}

impl AppConfig {
    /// Reads `SLOOZE_*` variables, loading a `.env` file first if present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let storage = match lookup("SLOOZE_STORAGE_PATH") {
            Some(value) if value == MEMORY_STORAGE => StorageConfig::Memory,
            Some(value) => StorageConfig::File(PathBuf::from(value)),
            None => defaults.storage,
        };

        let page_size = parse_or(&lookup, "SLOOZE_PAGE_SIZE", defaults.page_size)?;
        if page_size == 0 {
            return Err(AppError::Config("SLOOZE_PAGE_SIZE must be at least 1".to_string()));
        }

        Ok(Self {
            bind_addr: lookup("SLOOZE_BIND_ADDR").unwrap_or(defaults.bind_addr),
            storage,
            template_dir: lookup("SLOOZE_TEMPLATE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.template_dir),
            page_size,
            low_stock_threshold: parse_or(
                &lookup,
                "SLOOZE_LOW_STOCK_THRESHOLD",
                defaults.low_stock_threshold,
            )?,
            secure_cookies: parse_or(&lookup, "SLOOZE_SECURE_COOKIES", defaults.secure_cookies)?,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", key, raw))),
        None => Ok(default),
    }
}
