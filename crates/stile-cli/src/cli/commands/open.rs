//! Open command handler.
//!
//! Opens a portal page in the browser, routed through the page gate first
//! so the browser lands where the session state says it should.

use anyhow::Result;
use stile_core::api;
use stile_core::config::Config;
use stile_core::gate;
use stile_core::session::SessionManager;
use tracing::debug;

pub fn run(page: Option<&str>, config: &Config) -> Result<()> {
    let manager = SessionManager::from_config(config)?;

    let landing = if manager.is_logged_in() {
        gate::PROTECTED_LANDING
    } else {
        gate::PUBLIC_LANDING
    };
    let requested = page.unwrap_or(landing);

    let target = match manager.check_auth_state(requested) {
        Some(redirect) => {
            if manager.is_logged_in() {
                println!("Already signed in, opening {redirect} instead of {requested}");
            } else {
                println!("{requested} needs a session, opening {redirect} instead");
            }
            redirect
        }
        None => requested,
    };

    let pages_url = match config.effective_pages_url() {
        Some(url) => url.to_string(),
        None => api::derive_pages_url(manager.portal_url()),
    };
    debug!("Resolved pages URL: {pages_url}");

    let url = format!("{}/{}", pages_url.trim_end_matches('/'), target);
    println!("Opening {url}");

    // Best effort, skip in tests
    if std::env::var("STILE_NO_BROWSER").is_err() {
        let _ = open::that(&url);
    }

    Ok(())
}
