//! Courier Console
//!
//! A server-rendered web console with three interaction components — chat,
//! email and SMS — each of which relays its submissions to a remote HTTP
//! gateway. The console holds only transient view state; the gateway does
//! all the actual work.
//!
//! # Architecture
//!
//! - **Server**: Axum HTTP server rendering pages and HTMX fragments
//! - **Gateway client**: reqwest relay to the remote `/chat`, `/send-email`
//!   and `/send-sms` endpoints
//! - **Sessions**: in-memory per-browser state (chat transcript, per-channel
//!   in-flight flags)
//!
//! # Modules
//!
//! - [`config`]: configuration loading (defaults, file, env, CLI)
//! - [`gateway`]: gateway trait, wire types and reqwest client
//! - [`server`]: routes, handlers and middleware
//! - [`session`]: session and transcript storage
//! - [`ui`]: server-rendered HTML

#![allow(clippy::unused_async)]

pub mod config;
pub mod gateway;
pub mod server;
pub mod session;
pub mod ui;

use std::sync::Arc;

use gateway::Gateway;
use session::SessionStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Outbound gateway interface; tests install fakes here.
    pub gateway: Arc<dyn Gateway>,
    /// Session store for per-browser view state.
    pub sessions: SessionStore,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}
