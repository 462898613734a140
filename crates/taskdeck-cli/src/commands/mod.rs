pub mod auth;
pub mod prefs;
pub mod tasks;

use anyhow::{Result, bail};
use taskdeck_core::route::Route;

use crate::bootstrap::AppContext;

/// Navigates to `route` and fails if the guard sent us elsewhere.
pub fn enter(ctx: &AppContext, route: Route) -> Result<()> {
    let landed = ctx.navigator.navigate_to(route.clone())?;
    if landed == route {
        return Ok(());
    }

    match landed {
        Route::Login => bail!("Not signed in. Run `taskdeck login <username>` first."),
        Route::Home => bail!(
            "Already signed in as {}. Run `taskdeck logout` first.",
            ctx.auth.user().unwrap_or_default()
        ),
        other => bail!("Redirected to {}", other.path()),
    }
}

pub fn open(ctx: &AppContext, path: &str) -> Result<()> {
    let route = ctx.navigator.navigate(path)?;
    println!("{} ({})", route.path(), route.name());
    Ok(())
}
