//! Status command handler.

use anyhow::Result;
use stile_core::config::Config;
use stile_core::gate;
use stile_core::session::SessionManager;

pub fn run(config: &Config) -> Result<()> {
    let manager = SessionManager::from_config(config)?;

    if manager.is_logged_in() {
        if let Some(user) = manager.current_user() {
            println!("Signed in as {}", user.display_name());
            if let Some(id) = user.id_string() {
                println!("  Member id: {id}");
            }
        }
        println!("  Landing page: {}", gate::PROTECTED_LANDING);
    } else {
        println!("Not signed in");
        println!("  Landing page: {}", gate::PUBLIC_LANDING);
    }

    println!("  Portal: {}", manager.portal_url());
    if let Some(name) = manager.remembered_username() {
        println!("  Remembered username: {name}");
    }

    Ok(())
}
