use crate::{
    config::AppConfig,
    session::store::{FileTokenStore, MemoryTokenStore, TokenStore},
};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Settings shared by every action.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub config: AppConfig,
    /// Keep tokens in memory for the lifetime of the process only.
    pub ephemeral: bool,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(config: AppConfig, ephemeral: bool) -> Self {
        Self { config, ephemeral }
    }

    /// Token store for the configured API origin.
    ///
    /// # Errors
    /// Returns an error if the API base URL is invalid.
    pub fn store(&self) -> Result<Arc<dyn TokenStore>> {
        if self.ephemeral {
            return Ok(Arc::new(MemoryTokenStore::new()));
        }
        let api_base = self.config.api_base().context("invalid API base URL")?;
        Ok(Arc::new(FileTokenStore::for_origin(
            &self.config.store_dir,
            &api_base,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::StorageKey;

    fn config(store_dir: &std::path::Path) -> AppConfig {
        AppConfig {
            api_base_url: "http://127.0.0.1:8000/api".to_string(),
            store_dir: store_dir.to_path_buf(),
            request_timeout: None,
        }
    }

    #[test]
    fn test_ephemeral_store_writes_nothing() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let globals = GlobalArgs::new(config(dir.path()), true);
        globals.store()?.set(StorageKey::Access, "token");
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_file_store_is_shared_between_runs() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let globals = GlobalArgs::new(config(dir.path()), false);
        globals.store()?.set(StorageKey::Refresh, "refresh-1");
        assert_eq!(
            globals.store()?.get(StorageKey::Refresh),
            Some("refresh-1".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_invalid_base_url_is_reported() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut config = config(dir.path());
        config.api_base_url = "ftp://files.example.com/".to_string();
        assert!(GlobalArgs::new(config, false).store().is_err());
        Ok(())
    }
}
