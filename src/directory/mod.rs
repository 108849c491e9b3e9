//! Creator directory: where creator metrics come from.
//!
//! The engine never calls the directory. Callers resolve metrics here and
//! snapshot them into `CampaignSelection`s before simulating, so any backend
//! implementing [`CreatorDirectory`] can be swapped in without touching the
//! simulation logic.

mod fixtures;
mod memory;
mod traits;

pub use fixtures::sample_directory;
pub use memory::InMemoryDirectory;
pub use traits::{CreatorDirectory, CreatorProfile, DirectoryError};
