use std::collections::BTreeMap;
use std::sync::Arc;

use forgefit_core::AppResult;
use forgefit_domain::{Permission, sort_catalog};

use crate::PermissionCatalogRepository;

/// Read-only access to the seeded permission catalog.
#[derive(Clone)]
pub struct PermissionCatalogService {
    repository: Arc<dyn PermissionCatalogRepository>,
}

impl PermissionCatalogService {
    /// Creates a catalog service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn PermissionCatalogRepository>) -> Self {
        Self { repository }
    }

    /// Returns every permission sorted by group, resource and action.
    pub async fn list_all(&self) -> AppResult<Vec<Permission>> {
        let mut permissions = self.repository.list_permissions().await?;
        sort_catalog(&mut permissions);
        Ok(permissions)
    }

    /// Returns permissions keyed by presentation group, catalog order within each group.
    pub async fn list_grouped(&self) -> AppResult<BTreeMap<String, Vec<Permission>>> {
        let mut grouped: BTreeMap<String, Vec<Permission>> = BTreeMap::new();

        for permission in self.list_all().await? {
            grouped
                .entry(permission.group().to_owned())
                .or_default()
                .push(permission);
        }

        Ok(grouped)
    }
}
