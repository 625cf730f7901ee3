use std::path::PathBuf;

use anyhow::Context;

use crate::db::TenantStore;

pub const DEFAULT_MAX_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one `<tenant>.db` file per tenant
    pub db_base_path: PathBuf,
    pub max_page_size: u32,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_base_path: PathBuf::from("./data"),
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            bind_addr: "0.0.0.0:8080".to_owned(),
        }
    }
}

impl Config {
    /// Reads `DB_BASE_PATH`, `MAX_PAGE_SIZE` and `BIND_ADDR`, from `.env`
    /// when present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        let defaults = Self::default();

        let max_page_size = match dotenv::var("MAX_PAGE_SIZE") {
            Ok(raw) => raw.parse().with_context(|| format!("MAX_PAGE_SIZE={raw}"))?,
            Err(_) => defaults.max_page_size,
        };

        Ok(Self {
            db_base_path: dotenv::var("DB_BASE_PATH").map_or(defaults.db_base_path, PathBuf::from),
            max_page_size,
            bind_addr: dotenv::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
        })
    }

    pub fn tenant_store(&self) -> TenantStore {
        TenantStore::new(&self.db_base_path)
    }
}
