//! The session manager.
//!
//! Ties the portal client, the persisted store, and the page gate together:
//! sign in, sign out, report the session state, and announce changes over a
//! broadcast channel.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::api::{LoginCall, PortalClient};
use crate::config::Config;
use crate::events::SessionEvent;
use crate::gate;
use crate::store::SessionStore;
use crate::user::UserRecord;

/// Shown when a credential field is left empty. No request is sent.
pub const MISSING_INPUT_NOTICE: &str = "Enter both a username and a password";

/// Shown when the portal rejects the credentials without its own message.
pub const REJECTED_NOTICE: &str = "Incorrect username or password";

/// Shown when the portal can't be reached or answers nonsense.
pub const OFFLINE_NOTICE: &str = "Could not reach the portal";

/// How long to linger before heading to the public landing page after a
/// sign-out.
pub const LOGOUT_REDIRECT_DELAY: Duration = Duration::from_millis(800);

/// Event channel capacity. Subscribers that fall this far behind lose
/// events, which is fine for session notifications.
const EVENT_CAPACITY: usize = 16;

/// How a login attempt ended.
///
/// `Failure` covers every way the attempt can be turned down: empty input,
/// the portal saying no, or the portal being unreachable. The caller gets
/// one message to show either way. `Err` at the call site is reserved for
/// local trouble, like not being able to write the session file.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Success { user: UserRecord },
    Failure { message: String },
}

/// Manages the portal session: login, logout, state checks, events.
pub struct SessionManager {
    client: PortalClient,
    store_path: PathBuf,
    store: SessionStore,
    current_user: Option<UserRecord>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    /// Creates a manager from environment and config, storing the session
    /// at the default path.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = PortalClient::from_config(config)?;
        Self::new(client, SessionStore::store_path())
    }

    /// Creates a manager with an explicit client and store path.
    ///
    /// Loads the persisted session. A store that can't be parsed is logged,
    /// reset on disk, and treated as signed out.
    pub fn new(client: PortalClient, store_path: PathBuf) -> Result<Self> {
        let store = match SessionStore::load_from(&store_path) {
            Ok(store) => store,
            Err(e) => {
                warn!("Resetting unreadable session store: {e:#}");
                let store = SessionStore::default();
                store.save_to(&store_path)?;
                store
            }
        };

        let current_user = store.user_data.clone();
        if let Some(user) = &current_user {
            debug!("Loaded session for {}", user.display_name());
        }

        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            client,
            store_path,
            store,
            current_user,
            events,
        })
    }

    /// Attempts to sign in.
    ///
    /// One request, no retries. Empty input never reaches the network.
    /// `Err` means the portal accepted the credentials but the session
    /// couldn't be persisted locally.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
        remember: bool,
    ) -> Result<LoginOutcome> {
        if username.is_empty() || password.is_empty() {
            return Ok(LoginOutcome::Failure {
                message: MISSING_INPUT_NOTICE.to_string(),
            });
        }

        let call = match self.client.login(username, password).await {
            Ok(call) => call,
            Err(e) => {
                debug!("Login request failed: {e:#}");
                return Ok(LoginOutcome::Failure {
                    message: OFFLINE_NOTICE.to_string(),
                });
            }
        };

        match call {
            LoginCall::Accepted { user } => {
                self.store.set_session(user.clone());
                if remember {
                    self.store.remembered_username = Some(username.to_string());
                } else {
                    self.store.remembered_username = None;
                }
                self.store.save_to(&self.store_path)?;

                self.current_user = Some(user.clone());
                let _ = self.events.send(SessionEvent::LoggedIn { user: user.clone() });

                Ok(LoginOutcome::Success { user })
            }
            LoginCall::Rejected { message } => Ok(LoginOutcome::Failure {
                message: message.unwrap_or_else(|| REJECTED_NOTICE.to_string()),
            }),
        }
    }

    /// Signs out: clears the session keys and announces the change.
    ///
    /// The remembered username survives. Whether to ask the user first is
    /// the caller's business, not handled here.
    pub fn logout(&mut self) -> Result<()> {
        self.store.clear_session();
        self.store.save_to(&self.store_path)?;

        self.current_user = None;
        let _ = self.events.send(SessionEvent::LoggedOut);

        Ok(())
    }

    /// True iff the persisted flag is set and a user record is in memory.
    pub fn is_logged_in(&self) -> bool {
        self.store.logged_in_flag() && self.current_user.is_some()
    }

    /// Where the gate says `page` should redirect, given the current
    /// session state.
    pub fn check_auth_state(&self, page: &str) -> Option<&'static str> {
        gate::check_auth_state(page, self.is_logged_in())
    }

    pub fn current_user(&self) -> Option<&UserRecord> {
        self.current_user.as_ref()
    }

    pub fn remembered_username(&self) -> Option<&str> {
        self.store.remembered_username.as_deref()
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn portal_url(&self) -> &str {
        self.client.base_url()
    }

    /// Subscribes to session change events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
