//! Campaign roster: added creators and committed line items.
//!
//! Committed selections form an append-only list. Editing a post count or
//! removing a line replaces that list item wholesale; nothing patches a
//! selection in place.

use chrono::{DateTime, Utc};

use crate::directory::CreatorProfile;
use crate::error::ValidationError;
use crate::selection::{CampaignSelection, SelectionId};
use crate::staging::SelectionStager;

/// A creator added to the roster.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    /// Directory profile at the time the creator was added.
    pub profile: CreatorProfile,

    /// Whether the creator is ticked for the next staging round.
    pub toggled: bool,

    /// When the creator was added.
    pub added_at: DateTime<Utc>,
}

/// Creators under consideration plus the committed selections.
#[derive(Debug, Clone, Default)]
pub struct CampaignRoster {
    creators: Vec<RosterEntry>,
    selections: Vec<CampaignSelection>,
}

impl CampaignRoster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a creator. Each creator may be added once.
    pub fn add_creator(&mut self, profile: CreatorProfile) -> Result<(), ValidationError> {
        if self.position(&profile.name).is_some() {
            return Err(ValidationError::DuplicateCreator { name: profile.name });
        }
        tracing::debug!(creator = %profile.name, platforms = profile.platforms.len(), "creator added to roster");
        self.creators.push(RosterEntry {
            profile,
            toggled: false,
            added_at: Utc::now(),
        });
        Ok(())
    }

    /// Added creators in insertion order.
    #[must_use]
    pub fn creators(&self) -> &[RosterEntry] {
        &self.creators
    }

    /// Flips whether a creator is ticked and returns the new state.
    pub fn toggle_creator(&mut self, name: &str) -> Result<bool, ValidationError> {
        let idx = self.position(name).ok_or_else(|| ValidationError::UnknownCreator {
            name: name.to_string(),
        })?;
        let entry = &mut self.creators[idx];
        entry.toggled = !entry.toggled;
        Ok(entry.toggled)
    }

    /// Ticks every creator, or clears all ticks if every creator is already ticked.
    pub fn toggle_all(&mut self) {
        let all = !self.creators.is_empty() && self.creators.iter().all(|c| c.toggled);
        for entry in &mut self.creators {
            entry.toggled = !all;
        }
    }

    /// Names of the ticked creators.
    #[must_use]
    pub fn toggled(&self) -> Vec<&str> {
        self.creators
            .iter()
            .filter(|c| c.toggled)
            .map(|c| c.profile.name.as_str())
            .collect()
    }

    /// Opens a staging round for the ticked creators.
    #[must_use]
    pub fn stage(&self) -> SelectionStager {
        SelectionStager::from_profiles(
            self.creators
                .iter()
                .filter(|c| c.toggled)
                .map(|c| c.profile.clone()),
        )
    }

    /// Appends the stager's selections and clears creator ticks.
    ///
    /// Returns the number of selections appended.
    pub fn commit(&mut self, stager: SelectionStager) -> usize {
        let count = self.append(stager.commit());
        for entry in &mut self.creators {
            entry.toggled = false;
        }
        count
    }

    /// Appends already-committed selections.
    pub fn append(&mut self, selections: impl IntoIterator<Item = CampaignSelection>) -> usize {
        let before = self.selections.len();
        self.selections.extend(selections);
        self.selections.len() - before
    }

    /// Committed selections in commit order.
    #[must_use]
    pub fn selections(&self) -> &[CampaignSelection] {
        &self.selections
    }

    /// Replaces a line item with one carrying `post_count`.
    ///
    /// Zero is accepted and simulates as a zero-impression line.
    pub fn update_post_count(&mut self, id: SelectionId, post_count: u32) -> Result<(), ValidationError> {
        let slot = self
            .selections
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(ValidationError::UnknownSelection { id })?;
        *slot = slot.with_post_count(post_count);
        Ok(())
    }

    /// Removes a line item and returns it.
    pub fn remove(&mut self, id: SelectionId) -> Result<CampaignSelection, ValidationError> {
        let idx = self
            .selections
            .iter()
            .position(|s| s.id == id)
            .ok_or(ValidationError::UnknownSelection { id })?;
        Ok(self.selections.remove(idx))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.creators
            .iter()
            .position(|c| c.profile.name.eq_ignore_ascii_case(name.trim()))
    }
}
