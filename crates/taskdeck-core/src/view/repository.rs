//! Preference repository trait.

use async_trait::async_trait;

use super::model::{SortDirection, SortField, ViewSettings};
use crate::error::Result;

/// Persistence for the view settings.
///
/// Loading never fails on bad data: unreadable values are dropped and the
/// defaults from [`ViewSettings::default`] are kept in their place.
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    /// Loads the persisted view settings.
    ///
    /// # Returns
    ///
    /// - `Ok(ViewSettings)`: Stored values merged over the defaults
    /// - `Err`: The underlying storage could not be read
    async fn load_view_settings(&self) -> Result<ViewSettings>;

    async fn save_show_completed(&self, show_completed: bool) -> Result<()>;

    /// Persists the sort field.
    ///
    /// # Arguments
    ///
    /// * `field` - The field to sort by; `None` is stored as an empty name,
    ///   which loads back as "no sort"
    async fn save_sort_field(&self, field: Option<&SortField>) -> Result<()>;

    async fn save_sort_direction(&self, direction: SortDirection) -> Result<()>;
}
