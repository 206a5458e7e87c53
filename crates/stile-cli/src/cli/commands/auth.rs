//! Login and logout command handlers.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use stile_core::config::Config;
use stile_core::gate;
use stile_core::session::{LOGOUT_REDIRECT_DELAY, LoginOutcome, SessionManager};

pub async fn login(username: Option<String>, remember: bool, config: &Config) -> Result<()> {
    let mut manager = SessionManager::from_config(config)?;

    if manager.is_logged_in() {
        if let Some(user) = manager.current_user() {
            println!("Already signed in as {}", user.display_name());
        }
        print!("Do you want to sign in again? [y/N] ");
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().lock().read_line(&mut response)?;
        if !response.trim().eq_ignore_ascii_case("y") {
            println!("Login cancelled.");
            return Ok(());
        }
    }

    let username = match username {
        Some(name) => name,
        None => prompt_username(manager.remembered_username())?,
    };
    let password = prompt_password()?;

    println!("Signing in to {}...", manager.portal_url());

    match manager.login(&username, &password, remember).await? {
        LoginOutcome::Success { user } => {
            println!();
            println!("✓ Signed in as {}", user.display_name());
            println!("  Session saved to: {}", manager.store_path().display());
            Ok(())
        }
        LoginOutcome::Failure { message } => anyhow::bail!("{message}"),
    }
}

pub async fn logout(yes: bool, config: &Config) -> Result<()> {
    let mut manager = SessionManager::from_config(config)?;

    if !manager.is_logged_in() {
        println!("Not signed in (no session found).");
        return Ok(());
    }

    if !yes && config.confirm_logout {
        print!("Sign out? [y/N] ");
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().lock().read_line(&mut response)?;
        if !response.trim().eq_ignore_ascii_case("y") {
            println!("Logout cancelled.");
            return Ok(());
        }
    }

    manager.logout()?;

    println!("✓ Signed out");
    println!("  Session cleared from: {}", manager.store_path().display());

    // Linger the way the web front-end does before heading back.
    tokio::time::sleep(LOGOUT_REDIRECT_DELAY).await;
    println!("Returning to {}", gate::PUBLIC_LANDING);

    Ok(())
}

/// Asks for a username, prefilled with the remembered one. Empty input
/// takes the prefill.
fn prompt_username(remembered: Option<&str>) -> Result<String> {
    match remembered {
        Some(name) => print!("Username [{name}]: "),
        None => print!("Username: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    let input = input.trim();

    if input.is_empty()
        && let Some(name) = remembered
    {
        return Ok(name.to_string());
    }
    Ok(input.to_string())
}

/// Asks for the password. Only the line ending is stripped; the portal gets
/// the rest verbatim, spaces included.
fn prompt_password() -> Result<String> {
    print!("Password: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}
