//! Session event types.
//!
//! The session manager announces login and logout over a broadcast channel
//! so other parts of the app can react without being wired into the manager.

use serde::{Deserialize, Serialize};

use crate::user::UserRecord;

/// Events emitted when the session changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A session was established for `user`.
    LoggedIn { user: UserRecord },

    /// The session was cleared.
    LoggedOut,
}
