use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub id: i64,
    pub name: String,
}

/// A tracked competitor, supplied by the caller rather than derived from data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformEntry {
    pub id: i64,
    pub name: String,
}

/// Contents of the tracking file: one business, the competitors it is
/// benchmarked against, AI platform display names, and brand aliases.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackingConfig {
    pub business: BusinessProfile,
    #[serde(default)]
    pub competitors: Vec<Competitor>,
    #[serde(default)]
    pub platforms: Vec<PlatformEntry>,
    /// Alias spelling → canonical brand name.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

impl TrackingConfig {
    /// Display name for a platform id, if the tracking file names it.
    #[must_use]
    pub fn platform_name(&self, platform_id: i64) -> Option<&str> {
        self.platforms
            .iter()
            .find(|p| p.id == platform_id)
            .map(|p| p.name.as_str())
    }

    /// Build the immutable alias table for this business.
    #[must_use]
    pub fn brand_aliases(&self) -> BrandAliases {
        BrandAliases::new(
            self.aliases
                .iter()
                .map(|(alias, canonical)| (alias.as_str(), canonical.as_str())),
        )
    }
}

/// Immutable brand-alias lookup.
///
/// Built once per request from the tracking file and handed to the engine as
/// a parameter. Keys are trimmed and compared case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct BrandAliases {
    by_alias: HashMap<String, String>,
}

impl BrandAliases {
    pub fn new<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let by_alias = pairs
            .into_iter()
            .map(|(alias, canonical)| (alias.trim().to_lowercase(), canonical.trim().to_string()))
            .collect();
        Self { by_alias }
    }

    /// Canonical display name for `name`, or the trimmed input when it is
    /// not a known alias.
    #[must_use]
    pub fn canonical(&self, name: &str) -> String {
        let trimmed = name.trim();
        self.by_alias
            .get(&trimmed.to_lowercase())
            .cloned()
            .unwrap_or_else(|| trimmed.to_string())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }
}

/// Load and validate the tracking configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_tracking(path: &Path) -> Result<TrackingConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TrackingFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let tracking: TrackingConfig =
        serde_yaml::from_str(&content).map_err(ConfigError::TrackingFileParse)?;

    validate_tracking(&tracking)?;

    Ok(tracking)
}

fn validate_tracking(tracking: &TrackingConfig) -> Result<(), ConfigError> {
    let business_name = tracking.business.name.trim();
    if business_name.is_empty() {
        return Err(ConfigError::Validation(
            "business name must be non-empty".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();
    let mut seen_ids = HashSet::new();
    for competitor in &tracking.competitors {
        let name = competitor.name.trim();
        if name.is_empty() {
            return Err(ConfigError::Validation(format!(
                "competitor {} has an empty name",
                competitor.id
            )));
        }

        if name.eq_ignore_ascii_case(business_name) {
            return Err(ConfigError::Validation(format!(
                "competitor '{name}' has the same name as the tracked business"
            )));
        }

        if !seen_names.insert(name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate competitor name: '{name}'"
            )));
        }

        if !seen_ids.insert(competitor.id) {
            return Err(ConfigError::Validation(format!(
                "duplicate competitor id: {}",
                competitor.id
            )));
        }
    }

    let mut seen_platforms = HashSet::new();
    let mut seen_platform_names = HashSet::new();
    for platform in &tracking.platforms {
        if !seen_platforms.insert(platform.id) {
            return Err(ConfigError::Validation(format!(
                "duplicate platform id: {}",
                platform.id
            )));
        }

        let name = platform.name.trim();
        if !seen_platform_names.insert(name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate platform name: '{name}'"
            )));
        }
    }

    for (alias, canonical) in &tracking.aliases {
        if canonical.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "alias '{alias}' points at an empty brand name"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tracking_test.rs"]
mod tests;
