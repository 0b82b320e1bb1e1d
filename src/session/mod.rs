//! Session and transcript management.
//!
//! This module provides in-memory storage for per-browser view state: the
//! chat transcript and the per-channel in-flight flags. Sessions are
//! identified by UUID (issued as a cookie) and hold nothing durable.
//!
//! # Architecture
//!
//! - [`Session`]: state for a single browser session
//! - [`SessionStore`]: thread-safe store for all active sessions
//! - [`InFlightGuard`]: RAII handle for a channel's single request slot
//!
//! # Example
//!
//! ```rust
//! use courier_console::session::{Channel, SessionStore};
//!
//! let store = SessionStore::new();
//! let session = store.create();
//! session.add_user_entry("Hello!");
//!
//! let guard = session.begin(Channel::Chat).unwrap();
//! assert!(session.begin(Channel::Chat).is_none());
//! drop(guard);
//! ```

mod thread;

pub use thread::{
    Channel, ChatEntry, DEFAULT_IDLE_TIMEOUT, EntryRole, InFlightGuard, Session, SessionStore,
};
