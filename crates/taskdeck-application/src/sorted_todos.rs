//! Persisted list view settings.

use std::sync::Arc;
use taskdeck_core::error::Result;
use taskdeck_core::task::Task;
use taskdeck_core::view::{PreferenceRepository, SortDirection, SortField, ViewSettings, apply_view};
use tokio::sync::RwLock;

struct ViewState {
    settings: ViewSettings,
    activated: bool,
}

/// In-memory view settings, written through to the preference repository on
/// every change.
pub struct SortedTodos {
    repository: Arc<dyn PreferenceRepository>,
    state: RwLock<ViewState>,
}

impl SortedTodos {
    pub fn new(repository: Arc<dyn PreferenceRepository>) -> Self {
        Self {
            repository,
            state: RwLock::new(ViewState {
                settings: ViewSettings::default(),
                activated: false,
            }),
        }
    }

    /// Loads the persisted settings. Only the first call reads storage.
    pub async fn activate(&self) -> Result<ViewSettings> {
        let mut state = self.state.write().await;
        if !state.activated {
            state.settings = self.repository.load_view_settings().await?;
            state.activated = true;
            tracing::debug!("Loaded view settings: {:?}", state.settings);
        }
        Ok(state.settings.clone())
    }

    pub async fn settings(&self) -> ViewSettings {
        self.state.read().await.settings.clone()
    }

    pub async fn toggle_show_completed(&self) -> Result<bool> {
        let mut state = self.state.write().await;
        state.settings.show_completed = !state.settings.show_completed;
        let show_completed = state.settings.show_completed;
        self.repository.save_show_completed(show_completed).await?;
        Ok(show_completed)
    }

    pub async fn toggle_sort_direction(&self) -> Result<SortDirection> {
        let mut state = self.state.write().await;
        state.settings.sort_direction = state.settings.sort_direction.toggled();
        let direction = state.settings.sort_direction;
        self.repository.save_sort_direction(direction).await?;
        Ok(direction)
    }

    /// Sorts by `field`; an empty name turns sorting off.
    pub async fn set_sort_field(&self, field: &str) -> Result<Option<SortField>> {
        let mut state = self.state.write().await;
        state.settings.sort_field = SortField::parse(field);
        self.repository
            .save_sort_field(state.settings.sort_field.as_ref())
            .await?;
        Ok(state.settings.sort_field.clone())
    }

    /// The visible list for the current settings.
    pub async fn view(&self, tasks: &[Task]) -> Vec<Task> {
        let state = self.state.read().await;
        apply_view(tasks, &state.settings)
    }
}
