//! Config command handlers.

use anyhow::{Context, Result};
use stile_core::config;

pub fn path() -> Result<()> {
    println!("{}", config::paths::config_path().display());
    Ok(())
}

pub fn init() -> Result<()> {
    let config_path = config::paths::config_path();
    config::Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    Ok(())
}

pub fn set_portal(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid portal URL: {url}"))?;

    let config_path = config::paths::config_path();
    config::Config::save_portal_url_to(&config_path, url)
        .with_context(|| format!("save portal URL to {}", config_path.display()))?;

    println!("✓ Portal URL set to {url}");
    println!("  Config: {}", config_path.display());
    Ok(())
}
