use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use taskdeck_core::route::Route;
use taskdeck_core::session::{LoginCredentials, RegisterCredentials};

use super::enter;
use crate::bootstrap::AppContext;

pub async fn register(ctx: &AppContext, username: String, telegram_id: i64) -> Result<()> {
    enter(ctx, Route::Login)?;
    ctx.auth
        .register(&RegisterCredentials {
            username,
            telegram_id,
        })
        .await
        .context("Registration failed")?;
    println!(
        "Registered {}. Run `taskdeck login` to sign in.",
        ctx.auth.user().unwrap_or_default()
    );
    Ok(())
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn login(ctx: &AppContext, username: String, password: Option<String>) -> Result<()> {
    enter(ctx, Route::Login)?;
    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };
    ctx.auth
        .login(&LoginCredentials { username, password })
        .await
        .context("Login failed")?;
    println!("Signed in as {}", ctx.auth.user().unwrap_or_default());
    Ok(())
}

/// Signs out from the home page and lands on the login page.
pub async fn logout(ctx: &AppContext) -> Result<()> {
    enter(ctx, Route::Home)?;
    ctx.auth.logout().await?;
    ctx.navigator.navigate_to(Route::Login)?;
    println!("Signed out");
    Ok(())
}

pub fn whoami(ctx: &AppContext) -> Result<()> {
    enter(ctx, Route::Home)?;
    println!("{}", ctx.auth.user().unwrap_or_default());
    Ok(())
}
