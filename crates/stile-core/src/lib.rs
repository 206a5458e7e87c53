//! stile core library.
//!
//! Everything the CLI needs to manage a portal session: configuration and
//! path resolution, the portal HTTP client, the persisted session store, the
//! page gate, and the session manager that ties them together.

pub mod api;
pub mod config;
pub mod events;
pub mod gate;
pub mod session;
pub mod store;
pub mod user;
