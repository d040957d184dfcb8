//! Permission catalog entries and the `resource:action` key format.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use forgefit_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Synthetic identifier of a catalog permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PermissionId(Uuid);

impl PermissionId {
    /// Creates a random permission identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a permission identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parses a transport value into a permission identifier.
    pub fn parse(value: &str) -> AppResult<Self> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| AppError::Validation(format!("invalid permission id '{value}'")))
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PermissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PermissionId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A grantable capability expressed as a `(resource, action)` pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PermissionKey {
    resource: String,
    action: String,
}

impl PermissionKey {
    /// Creates a key from its parts, rejecting empty parts and embedded colons.
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> AppResult<Self> {
        let resource = resource.into();
        let action = action.into();

        for (label, value) in [("resource", &resource), ("action", &action)] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!(
                    "permission {label} must not be empty"
                )));
            }
            if value.contains(':') {
                return Err(AppError::Validation(format!(
                    "permission {label} '{value}' must not contain ':'"
                )));
            }
        }

        Ok(Self { resource, action })
    }

    /// Parses the external `resource:action` representation.
    pub fn parse(value: &str) -> AppResult<Self> {
        let Some((resource, action)) = value.split_once(':') else {
            return Err(AppError::Validation(format!(
                "permission '{value}' must use the 'resource:action' format"
            )));
        };

        Self::new(resource, action)
            .map_err(|error| AppError::Validation(format!("invalid permission '{value}': {error}")))
    }

    /// Parses a list of transport values, failing on the first malformed entry.
    pub fn parse_all<S: AsRef<str>>(values: &[S]) -> AppResult<Vec<Self>> {
        values
            .iter()
            .map(|value| Self::parse(value.as_ref()))
            .collect()
    }

    /// Returns the resource part.
    #[must_use]
    pub fn resource(&self) -> &str {
        self.resource.as_str()
    }

    /// Returns the action part.
    #[must_use]
    pub fn action(&self) -> &str {
        self.action.as_str()
    }
}

impl Display for PermissionKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}:{}", self.resource, self.action)
    }
}

impl FromStr for PermissionKey {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

/// Immutable permission catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    id: PermissionId,
    key: PermissionKey,
    display_name: NonEmptyString,
    group: NonEmptyString,
}

impl Permission {
    /// Creates a validated catalog entry.
    pub fn new(
        id: PermissionId,
        key: PermissionKey,
        display_name: impl Into<String>,
        group: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            key,
            display_name: NonEmptyString::new(display_name)?,
            group: NonEmptyString::new(group)?,
        })
    }

    /// Returns the synthetic identifier.
    #[must_use]
    pub fn id(&self) -> PermissionId {
        self.id
    }

    /// Returns the `(resource, action)` key.
    #[must_use]
    pub fn key(&self) -> &PermissionKey {
        &self.key
    }

    /// Returns the human-readable label.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the presentation group.
    #[must_use]
    pub fn group(&self) -> &str {
        self.group.as_str()
    }

    /// Catalog ordering: group, then resource, then action.
    #[must_use]
    pub fn catalog_order(&self, other: &Self) -> std::cmp::Ordering {
        (self.group(), self.key.resource(), self.key.action()).cmp(&(
            other.group(),
            other.key.resource(),
            other.key.action(),
        ))
    }
}

/// Sorts permissions into deterministic catalog order.
pub fn sort_catalog(permissions: &mut [Permission]) {
    permissions.sort_by(Permission::catalog_order);
}

/// Set of permission keys granted to a role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(BTreeSet<PermissionKey>);

impl PermissionSet {
    /// Returns whether every requested key is granted.
    #[must_use]
    pub fn contains_all(&self, requested: &[PermissionKey]) -> bool {
        requested.iter().all(|key| self.0.contains(key))
    }

    /// Returns whether at least one requested key is granted.
    ///
    /// An empty request never matches.
    #[must_use]
    pub fn contains_any(&self, requested: &[PermissionKey]) -> bool {
        requested.iter().any(|key| self.0.contains(key))
    }

    /// Returns requested keys that are not granted, in request order.
    #[must_use]
    pub fn missing(&self, requested: &[PermissionKey]) -> Vec<PermissionKey> {
        requested
            .iter()
            .filter(|key| !self.0.contains(*key))
            .cloned()
            .collect()
    }

    /// Returns the number of granted keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether nothing is granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<PermissionKey> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = PermissionKey>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = &'a Permission>>(iter: T) -> Self {
        Self(iter.into_iter().map(|value| value.key().clone()).collect())
    }
}
