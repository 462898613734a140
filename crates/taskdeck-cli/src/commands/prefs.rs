use anyhow::Result;
use clap::Subcommand;
use taskdeck_core::route::Route;
use taskdeck_core::view::ViewSettings;

use super::enter;
use crate::bootstrap::AppContext;

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Print the current settings
    Show,
    /// Show or hide completed tasks
    ToggleCompleted,
    /// Flip between ascending and descending
    ToggleDirection,
    /// Sort by a field name; an empty name turns sorting off
    Sort { field: String },
}

fn print_settings(settings: &ViewSettings) {
    println!("showCompleted: {}", settings.show_completed);
    println!(
        "sortField:     {}",
        settings.sort_field.as_ref().map(|f| f.as_str()).unwrap_or("(none)")
    );
    println!("sortDirection: {}", settings.sort_direction);
}

pub async fn run(ctx: &AppContext, action: PrefsAction) -> Result<()> {
    enter(ctx, Route::Home)?;
    ctx.view.activate().await?;

    match action {
        PrefsAction::Show => {}
        PrefsAction::ToggleCompleted => {
            ctx.view.toggle_show_completed().await?;
        }
        PrefsAction::ToggleDirection => {
            ctx.view.toggle_sort_direction().await?;
        }
        PrefsAction::Sort { field } => {
            ctx.view.set_sort_field(&field).await?;
        }
    }

    print_settings(&ctx.view.settings().await);
    Ok(())
}
