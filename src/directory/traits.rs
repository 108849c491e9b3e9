//! Directory trait and shared types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ValidationError;
use crate::metrics::PlatformMetrics;

/// Errors that can occur during directory operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// A creator with the same name already exists.
    #[error("Duplicate creator: {0}")]
    DuplicateCreator(String),

    /// A profile carried metrics that failed validation.
    #[error("Invalid metrics for {creator} on {platform}: {source}")]
    InvalidMetrics {
        /// Creator whose profile was rejected.
        creator: String,
        /// Offending platform; empty when the profile itself is malformed.
        platform: String,
        /// Underlying validation failure.
        #[source]
        source: ValidationError,
    },

    /// Backend error.
    #[error("Directory backend error: {0}")]
    BackendError(String),
}

/// A creator and their per-platform metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorProfile {
    /// Display name, also the directory key.
    pub name: String,

    /// Metrics per platform, in the order the directory lists them.
    pub platforms: Vec<(String, PlatformMetrics)>,
}

impl CreatorProfile {
    /// Creates a profile with no platforms.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platforms: Vec::new(),
        }
    }

    /// Adds or replaces the metrics for one platform.
    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>, metrics: PlatformMetrics) -> Self {
        self.set_platform(platform, metrics);
        self
    }

    /// Replaces the metrics of a known platform in place, or appends a new one.
    ///
    /// Returns the replaced metrics, if any.
    pub fn set_platform(
        &mut self,
        platform: impl Into<String>,
        metrics: PlatformMetrics,
    ) -> Option<PlatformMetrics> {
        let platform = platform.into();
        match self.position(&platform) {
            Some(idx) => Some(std::mem::replace(&mut self.platforms[idx].1, metrics)),
            None => {
                self.platforms.push((platform, metrics));
                None
            }
        }
    }

    /// Metrics for `platform`, matched case-insensitively.
    #[must_use]
    pub fn platform(&self, platform: &str) -> Option<&PlatformMetrics> {
        self.position(platform).map(|idx| &self.platforms[idx].1)
    }

    /// Canonical spelling of `platform` as listed by this profile.
    #[must_use]
    pub fn platform_name(&self, platform: &str) -> Option<&str> {
        self.position(platform).map(|idx| self.platforms[idx].0.as_str())
    }

    fn position(&self, platform: &str) -> Option<usize> {
        let wanted = platform.trim();
        self.platforms
            .iter()
            .position(|(name, _)| name.eq_ignore_ascii_case(wanted))
    }

    /// Validates every platform's metrics.
    pub fn validate(&self) -> Result<(), DirectoryError> {
        if self.name.trim().is_empty() {
            return Err(DirectoryError::InvalidMetrics {
                creator: self.name.clone(),
                platform: String::new(),
                source: ValidationError::MissingField {
                    field: "name".to_string(),
                },
            });
        }
        for (platform, metrics) in &self.platforms {
            metrics
                .validate()
                .map_err(|source| DirectoryError::InvalidMetrics {
                    creator: self.name.clone(),
                    platform: platform.clone(),
                    source,
                })?;
        }
        Ok(())
    }
}

/// Lookup contract for creator metrics.
///
/// Implementations must be safe to share across threads.
pub trait CreatorDirectory: Send + Sync {
    /// Metrics for one creator on one platform, or `None` if either is unknown.
    fn lookup(&self, name: &str, platform: &str) -> Result<Option<PlatformMetrics>, DirectoryError>;

    /// Full profile for a creator.
    fn profile(&self, name: &str) -> Result<Option<CreatorProfile>, DirectoryError>;

    /// Creator names containing `query` (case-insensitive), sorted.
    ///
    /// A blank query returns every creator.
    fn search(&self, query: &str) -> Result<Vec<String>, DirectoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Tier;

    fn metrics(avg_views: u64) -> PlatformMetrics {
        PlatformMetrics::new("@h", Tier::Nano, 1_000, avg_views, 2.0, 1.0)
    }

    #[test]
    fn platforms_keep_insertion_order() {
        let profile = CreatorProfile::new("Tech Guru")
            .with_platform("YouTube", metrics(1))
            .with_platform("Twitter", metrics(2));
        let names: Vec<_> = profile.platforms.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(names, vec!["YouTube", "Twitter"]);
    }

    #[test]
    fn set_platform_replaces_in_place() {
        let mut profile = CreatorProfile::new("Tech Guru")
            .with_platform("YouTube", metrics(1))
            .with_platform("Twitter", metrics(2));

        let previous = profile.set_platform("youtube", metrics(9)).unwrap();
        assert_eq!(previous.avg_views, 1);
        assert_eq!(profile.platforms.len(), 2);
        assert_eq!(profile.platforms[0].0, "YouTube");
        assert_eq!(profile.platform("YOUTUBE").unwrap().avg_views, 9);
        assert_eq!(profile.platform_name(" twitter "), Some("Twitter"));
        assert!(profile.platform("TikTok").is_none());
    }
}
