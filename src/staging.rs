//! Selection staging.
//!
//! Before anything is committed, the user picks which platforms of which
//! creators to book and with what post type and count. `SelectionStager`
//! holds that transient state and, on `commit`, emits immutable
//! `CampaignSelection`s carrying a metrics snapshot each.

use crate::directory::CreatorProfile;
use crate::error::ValidationError;
use crate::metrics::PlatformMetrics;
use crate::selection::{CampaignSelection, PostType};

/// Staging state of one creator's platform.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedPlatform {
    /// Whether this platform is included on commit.
    pub selected: bool,
    /// Content format to book.
    pub post_type: PostType,
    /// Posts to book; never zero while staged.
    pub post_count: u32,
    /// Metrics snapshot handed to the committed selection.
    pub metrics: PlatformMetrics,
}

impl StagedPlatform {
    fn new(metrics: PlatformMetrics) -> Self {
        Self {
            selected: false,
            post_type: PostType::default(),
            post_count: 1,
            metrics,
        }
    }
}

#[derive(Debug, Clone)]
struct StagedCreator {
    name: String,
    platforms: Vec<(String, StagedPlatform)>,
}

/// Builder for a batch of campaign selections.
///
/// # Example
/// ```rust,ignore
/// let mut stager = SelectionStager::from_profiles(profiles);
/// stager.toggle("Brett Chody", "Instagram")?;
/// stager.set_post_type("Brett Chody", "Instagram", PostType::Reel)?;
/// stager.set_post_count("Brett Chody", "Instagram", 2)?;
/// let selections = stager.commit();
/// ```
#[derive(Debug, Clone, Default)]
pub struct SelectionStager {
    creators: Vec<StagedCreator>,
}

impl SelectionStager {
    /// Stages every platform of every profile, unselected, as one feed post.
    pub fn from_profiles(profiles: impl IntoIterator<Item = CreatorProfile>) -> Self {
        let creators = profiles
            .into_iter()
            .map(|p| StagedCreator {
                name: p.name,
                platforms: p
                    .platforms
                    .into_iter()
                    .map(|(platform, metrics)| (platform, StagedPlatform::new(metrics)))
                    .collect(),
            })
            .collect();
        Self { creators }
    }

    /// Returns true if no creators are staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.creators.is_empty()
    }

    /// Names of the staged creators, in staging order.
    pub fn creators(&self) -> impl Iterator<Item = &str> {
        self.creators.iter().map(|c| c.name.as_str())
    }

    /// Staging state of one platform.
    #[must_use]
    pub fn staged(&self, creator: &str, platform: &str) -> Option<&StagedPlatform> {
        self.creators
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(creator.trim()))
            .and_then(|c| {
                c.platforms
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(platform.trim()))
                    .map(|(_, staged)| staged)
            })
    }

    /// Number of platforms currently selected.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.creators
            .iter()
            .flat_map(|c| c.platforms.iter())
            .filter(|(_, p)| p.selected)
            .count()
    }

    /// Flips the selection of a platform and returns the new state.
    pub fn toggle(&mut self, creator: &str, platform: &str) -> Result<bool, ValidationError> {
        let staged = self.staged_mut(creator, platform)?;
        staged.selected = !staged.selected;
        Ok(staged.selected)
    }

    /// Sets the selection of a platform explicitly.
    pub fn set_selected(&mut self, creator: &str, platform: &str, selected: bool) -> Result<(), ValidationError> {
        self.staged_mut(creator, platform)?.selected = selected;
        Ok(())
    }

    /// Sets the post type for a platform.
    pub fn set_post_type(&mut self, creator: &str, platform: &str, post_type: PostType) -> Result<(), ValidationError> {
        self.staged_mut(creator, platform)?.post_type = post_type;
        Ok(())
    }

    /// Sets the post count for a platform. A count of zero is staged as one.
    pub fn set_post_count(&mut self, creator: &str, platform: &str, post_count: u32) -> Result<(), ValidationError> {
        self.staged_mut(creator, platform)?.post_count = post_count.max(1);
        Ok(())
    }

    /// Emits one selection per selected platform, in creator order and then
    /// in the order the directory lists each creator's platforms.
    #[must_use]
    pub fn commit(self) -> Vec<CampaignSelection> {
        let mut out = Vec::with_capacity(self.selected_count());
        for creator in self.creators {
            for (platform, staged) in creator.platforms {
                if staged.selected {
                    out.push(CampaignSelection::new(
                        creator.name.clone(),
                        platform,
                        staged.post_type,
                        staged.post_count,
                        staged.metrics,
                    ));
                }
            }
        }
        tracing::debug!(committed = out.len(), "selections committed");
        out
    }

    fn staged_mut(&mut self, creator: &str, platform: &str) -> Result<&mut StagedPlatform, ValidationError> {
        let unknown = || ValidationError::UnknownStagedPlatform {
            creator: creator.to_string(),
            platform: platform.to_string(),
        };
        let entry = self
            .creators
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(creator.trim()))
            .ok_or_else(unknown)?;
        entry
            .platforms
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(platform.trim()))
            .map(|(_, staged)| staged)
            .ok_or_else(unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{sample_directory, CreatorDirectory};

    fn stager() -> SelectionStager {
        let dir = sample_directory().unwrap();
        let profiles = ["Brett Chody", "Tech Guru"]
            .iter()
            .map(|n| dir.profile(n).unwrap().unwrap())
            .collect::<Vec<_>>();
        SelectionStager::from_profiles(profiles)
    }

    #[test]
    fn platforms_start_unselected_as_single_feed_post() {
        let s = stager();
        let staged = s.staged("Brett Chody", "TikTok").unwrap();
        assert!(!staged.selected);
        assert_eq!(staged.post_type, PostType::FeedPost);
        assert_eq!(staged.post_count, 1);
        assert_eq!(s.selected_count(), 0);
        assert_eq!(s.creators().collect::<Vec<_>>(), vec!["Brett Chody", "Tech Guru"]);
    }

    #[test]
    fn commit_emits_only_selected_platforms() {
        let mut s = stager();
        assert!(s.toggle("Brett Chody", "Instagram").unwrap());
        s.set_post_type("Brett Chody", "Instagram", PostType::Reel).unwrap();
        s.set_post_count("Brett Chody", "Instagram", 2).unwrap();
        s.set_selected("Tech Guru", "youtube", true).unwrap();
        assert!(s.toggle("Tech Guru", "Twitter").unwrap());
        assert!(!s.toggle("Tech Guru", "Twitter").unwrap());

        let selections = s.commit();
        assert_eq!(selections.len(), 2);

        assert_eq!(selections[0].creator_name, "Brett Chody");
        assert_eq!(selections[0].platform, "Instagram");
        assert_eq!(selections[0].post_type, PostType::Reel);
        assert_eq!(selections[0].post_count, 2);
        assert_eq!(selections[0].metrics.avg_views, 25_000);

        assert_eq!(selections[1].creator_name, "Tech Guru");
        assert_eq!(selections[1].platform, "YouTube");
        assert_eq!(selections[1].post_count, 1);
    }

    #[test]
    fn commit_follows_directory_platform_order() {
        let mut s = stager();
        s.toggle("Tech Guru", "Twitter").unwrap();
        s.toggle("Tech Guru", "YouTube").unwrap();
        s.toggle("Brett Chody", "YouTube").unwrap();
        s.toggle("Brett Chody", "Instagram").unwrap();

        let order: Vec<_> = s
            .commit()
            .into_iter()
            .map(|sel| (sel.creator_name, sel.platform))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Brett Chody".to_string(), "Instagram".to_string()),
                ("Brett Chody".to_string(), "YouTube".to_string()),
                ("Tech Guru".to_string(), "YouTube".to_string()),
                ("Tech Guru".to_string(), "Twitter".to_string()),
            ]
        );
    }

    #[test]
    fn zero_post_count_is_staged_as_one() {
        let mut s = stager();
        s.set_post_count("Tech Guru", "Twitter", 0).unwrap();
        assert_eq!(s.staged("Tech Guru", "Twitter").unwrap().post_count, 1);
    }

    #[test]
    fn unknown_platform_is_rejected() {
        let mut s = stager();
        let err = s.toggle("Tech Guru", "TikTok").unwrap_err();
        assert!(matches!(err, ValidationError::UnknownStagedPlatform { .. }));
        let err = s.toggle("Nobody", "Instagram").unwrap_err();
        assert!(matches!(err, ValidationError::UnknownStagedPlatform { .. }));
    }

    #[test]
    fn empty_stager_commits_nothing() {
        let s = SelectionStager::default();
        assert!(s.is_empty());
        assert!(s.commit().is_empty());
    }
}
