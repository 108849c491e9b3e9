//! Sample creator data used by the CLI, tests and benches.

use crate::directory::memory::InMemoryDirectory;
use crate::directory::traits::{CreatorProfile, DirectoryError};
use crate::metrics::{PlatformMetrics, Tier};

fn sample_profiles() -> Vec<CreatorProfile> {
    vec![
        CreatorProfile::new("Brett Chody")
            .with_platform(
                "Instagram",
                PlatformMetrics::new("@brettchody", Tier::Micro, 50_000, 25_000, 5.2, 3.8),
            )
            .with_platform(
                "TikTok",
                PlatformMetrics::new("@brettchody", Tier::Mid, 125_000, 85_000, 6.8, 4.5),
            )
            .with_platform(
                "YouTube",
                PlatformMetrics::new("@brettchodyvlogs", Tier::Micro, 35_000, 18_000, 4.9, 3.2),
            ),
        CreatorProfile::new("Sarah Martinez")
            .with_platform(
                "Instagram",
                PlatformMetrics::new("@sarahmartinez", Tier::Macro, 850_000, 520_000, 7.2, 5.1),
            )
            .with_platform(
                "TikTok",
                PlatformMetrics::new("@sarahmartinez", Tier::Mega, 2_500_000, 1_800_000, 8.1, 6.2),
            ),
        CreatorProfile::new("Tech Guru")
            .with_platform(
                "YouTube",
                PlatformMetrics::new("@techguru", Tier::Mid, 180_000, 95_000, 5.5, 3.9),
            )
            .with_platform(
                "Twitter",
                PlatformMetrics::new("@techguru", Tier::Mid, 95_000, 45_000, 4.8, 3.1),
            ),
    ]
}

/// Directory preloaded with three sample creators.
pub fn sample_directory() -> Result<InMemoryDirectory, DirectoryError> {
    let dir = InMemoryDirectory::new();
    for profile in sample_profiles() {
        dir.insert(profile)?;
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::CreatorDirectory;

    #[test]
    fn sample_directory_has_three_creators() {
        let dir = sample_directory().unwrap();
        assert_eq!(dir.search("").unwrap(), vec!["Brett Chody", "Sarah Martinez", "Tech Guru"]);
    }

    #[test]
    fn sample_metrics_match_fixture() {
        let dir = sample_directory().unwrap();
        let m = dir.lookup("Sarah Martinez", "TikTok").unwrap().unwrap();
        assert_eq!(m.tier, Tier::Mega);
        assert_eq!(m.avg_views, 1_800_000);
        assert!((m.sponsored_rate_percent - 6.2).abs() < f64::EPSILON);

        let profile = dir.profile("Brett Chody").unwrap().unwrap();
        assert_eq!(profile.platforms.len(), 3);
        assert_eq!(profile.platform("YouTube").unwrap().handle, "@brettchodyvlogs");
    }
}
