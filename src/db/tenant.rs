use std::path::PathBuf;

pub const DEFAULT_TENANT: &str = "default";
pub const STORE_SUFFIX: &str = ".db";

/// Maps a tenant identifier onto its SQLite file under the configured base
/// directory. One file per tenant, nothing shared between them.
#[derive(Debug, Clone)]
pub struct TenantStore {
    base_path: PathBuf,
}

impl TenantStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self { base_path: base_path.into() }
    }

    /// The identifier is used verbatim. `None` and `""` land on
    /// [`DEFAULT_TENANT`].
    pub fn resolve(&self, tenant_id: Option<&str>) -> PathBuf {
        let tenant = match tenant_id {
            Some(id) if !id.is_empty() => id,
            _ => DEFAULT_TENANT,
        };
        self.base_path.join(format!("{tenant}{STORE_SUFFIX}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_tenant_file_under_base() {
        let store = TenantStore::new("/var/chat");
        assert_eq!(store.resolve(Some("acme")), PathBuf::from("/var/chat/acme.db"));
    }

    #[test]
    fn same_tenant_same_location() {
        let store = TenantStore::new("data");
        assert_eq!(store.resolve(Some("t1")), store.resolve(Some("t1")));
        assert_ne!(store.resolve(Some("t1")), store.resolve(Some("t2")));
    }

    #[test]
    fn missing_tenant_falls_back_to_default() {
        let store = TenantStore::new("data");
        assert_eq!(store.resolve(None), PathBuf::from("data/default.db"));
        assert_eq!(store.resolve(Some("")), PathBuf::from("data/default.db"));
    }
}
