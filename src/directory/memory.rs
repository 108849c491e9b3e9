//! In-memory directory backend.
//!
//! Thread-safe; intended for fixtures, tests and embedded use.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::directory::traits::{CreatorDirectory, CreatorProfile, DirectoryError};
use crate::metrics::PlatformMetrics;

fn lock_err(context: &'static str) -> DirectoryError {
    DirectoryError::BackendError(format!("poisoned lock: {context}"))
}

fn normalize_key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Thread-safe in-memory creator directory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    by_name: RwLock<HashMap<String, CreatorProfile>>,
}

impl InMemoryDirectory {
    /// Create a new empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new creator. Fails if the name (case-insensitive) already exists.
    pub fn insert(&self, profile: CreatorProfile) -> Result<(), DirectoryError> {
        profile.validate()?;
        let mut by_name = self.by_name.write().map_err(|_| lock_err("directory.insert"))?;
        let key = normalize_key(&profile.name);
        if by_name.contains_key(&key) {
            return Err(DirectoryError::DuplicateCreator(profile.name));
        }
        by_name.insert(key, profile);
        Ok(())
    }

    /// Insert or replace a creator. Returns the previous profile, if any.
    ///
    /// Selections committed earlier keep their own snapshot and are not affected.
    pub fn upsert(&self, profile: CreatorProfile) -> Result<Option<CreatorProfile>, DirectoryError> {
        profile.validate()?;
        let mut by_name = self.by_name.write().map_err(|_| lock_err("directory.upsert"))?;
        Ok(by_name.insert(normalize_key(&profile.name), profile))
    }

    /// Number of creators.
    pub fn len(&self) -> Result<usize, DirectoryError> {
        let by_name = self.by_name.read().map_err(|_| lock_err("directory.len"))?;
        Ok(by_name.len())
    }

    /// Returns true if the directory holds no creators.
    pub fn is_empty(&self) -> Result<bool, DirectoryError> {
        Ok(self.len()? == 0)
    }
}

impl CreatorDirectory for InMemoryDirectory {
    fn lookup(&self, name: &str, platform: &str) -> Result<Option<PlatformMetrics>, DirectoryError> {
        let by_name = self.by_name.read().map_err(|_| lock_err("directory.lookup"))?;
        Ok(by_name
            .get(&normalize_key(name))
            .and_then(|p| p.platform(platform))
            .cloned())
    }

    fn profile(&self, name: &str) -> Result<Option<CreatorProfile>, DirectoryError> {
        let by_name = self.by_name.read().map_err(|_| lock_err("directory.profile"))?;
        Ok(by_name.get(&normalize_key(name)).cloned())
    }

    fn search(&self, query: &str) -> Result<Vec<String>, DirectoryError> {
        let by_name = self.by_name.read().map_err(|_| lock_err("directory.search"))?;
        let needle = normalize_key(query);
        let mut names: Vec<String> = by_name
            .iter()
            .filter(|(key, _)| needle.is_empty() || key.contains(&needle))
            .map(|(_, p)| p.name.clone())
            .collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Tier;

    fn profile(name: &str) -> CreatorProfile {
        CreatorProfile::new(name).with_platform(
            "Instagram",
            PlatformMetrics::new(format!("@{}", name.to_lowercase()), Tier::Nano, 900, 400, 3.0, 2.0),
        )
    }

    #[test]
    fn insert_and_lookup_case_insensitive() {
        let dir = InMemoryDirectory::new();
        dir.insert(profile("Jane Doe")).unwrap();

        let m = dir.lookup("jane doe", "instagram").unwrap().unwrap();
        assert_eq!(m.avg_views, 400);
        assert!(dir.lookup("Jane Doe", "TikTok").unwrap().is_none());
        assert!(dir.lookup("John", "Instagram").unwrap().is_none());
    }

    #[test]
    fn insert_rejects_duplicates() {
        let dir = InMemoryDirectory::new();
        dir.insert(profile("Jane Doe")).unwrap();
        let err = dir.insert(profile("JANE DOE")).unwrap_err();
        assert!(matches!(err, DirectoryError::DuplicateCreator(_)));
        assert_eq!(dir.len().unwrap(), 1);
    }

    #[test]
    fn insert_rejects_invalid_metrics() {
        let dir = InMemoryDirectory::new();
        let bad = CreatorProfile::new("Broken").with_platform(
            "YouTube",
            PlatformMetrics::new("@broken", Tier::Mid, 10, 10, f64::NAN, 1.0),
        );
        let err = dir.insert(bad).unwrap_err();
        let DirectoryError::InvalidMetrics { platform, .. } = err else {
            panic!("expected InvalidMetrics, got {err:?}");
        };
        assert_eq!(platform, "YouTube");
        assert!(dir.is_empty().unwrap());
    }

    #[test]
    fn upsert_replaces_profile() {
        let dir = InMemoryDirectory::new();
        dir.insert(profile("Jane Doe")).unwrap();

        let updated = CreatorProfile::new("Jane Doe").with_platform(
            "Instagram",
            PlatformMetrics::new("@janedoe", Tier::Micro, 20_000, 9_000, 3.0, 2.5),
        );
        let previous = dir.upsert(updated).unwrap().unwrap();
        assert_eq!(previous.platform("Instagram").unwrap().avg_views, 400);
        assert_eq!(dir.lookup("Jane Doe", "Instagram").unwrap().unwrap().avg_views, 9_000);
    }

    #[test]
    fn search_matches_substring_and_sorts() {
        let dir = InMemoryDirectory::new();
        dir.insert(profile("Zed Martin")).unwrap();
        dir.insert(profile("Anna Martinez")).unwrap();
        dir.insert(profile("Bob")).unwrap();

        assert_eq!(dir.search("MARTIN").unwrap(), vec!["Anna Martinez", "Zed Martin"]);
        assert_eq!(dir.search("  ").unwrap(), vec!["Anna Martinez", "Bob", "Zed Martin"]);
        assert!(dir.search("nobody").unwrap().is_empty());
    }
}
