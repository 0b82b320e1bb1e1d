//! Per-browser session state and session storage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Default idle timeout before a session is swept (30 minutes).
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Role of a chat transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRole {
    /// Text the user typed.
    User,
    /// Reply from the remote assistant (or the local fallback text).
    Assistant,
}

/// One entry in the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    /// Who authored the entry.
    pub role: EntryRole,
    /// Entry text, exactly as submitted or received.
    pub text: String,
}

/// The three interaction components, each with its own in-flight slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Conversational chat panel.
    Chat,
    /// Email send form.
    Email,
    /// SMS send form.
    Sms,
}

impl Channel {
    const COUNT: usize = 3;

    fn index(self) -> usize {
        match self {
            Self::Chat => 0,
            Self::Email => 1,
            Self::Sms => 2,
        }
    }

    /// Channel name for log events.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Email => "email",
            Self::Sms => "sms",
        }
    }
}

/// A single browser session.
///
/// Holds the append-only chat transcript and one in-flight flag per channel.
/// All state is transient: nothing survives a session sweep or a process
/// restart.
#[derive(Debug)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    /// Unique session identifier, issued as a cookie.
    id: String,
    /// Ordered chat transcript. Entries alternate in causal order (a user
    /// entry precedes its assistant entry); insertion order is the only
    /// enforcement.
    entries: RwLock<Vec<ChatEntry>>,
    /// Session creation time.
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    /// Last interaction time, used by the idle sweeper.
    last_activity: RwLock<DateTime<Utc>>,
    /// One slot per channel; a held slot blocks further submissions on that
    /// channel until the guard drops.
    in_flight: [AtomicBool; Channel::COUNT],
}

impl Clone for Session {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Session {
    fn new(id: String) -> Self {
        let now = Utc::now();
        Self {
            inner: Arc::new(SessionInner {
                id,
                entries: RwLock::new(Vec::new()),
                created_at: now,
                last_activity: RwLock::new(now),
                in_flight: [const { AtomicBool::new(false) }; Channel::COUNT],
            }),
        }
    }

    /// Get the session ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Append a user entry to the transcript.
    pub fn add_user_entry(&self, text: impl Into<String>) {
        self.push(ChatEntry {
            role: EntryRole::User,
            text: text.into(),
        });
    }

    /// Append an assistant entry to the transcript.
    pub fn add_assistant_entry(&self, text: impl Into<String>) {
        self.push(ChatEntry {
            role: EntryRole::Assistant,
            text: text.into(),
        });
    }

    fn push(&self, entry: ChatEntry) {
        let mut guard = self.inner.entries.write().unwrap();
        guard.push(entry);
        drop(guard);
        self.touch();
    }

    /// Snapshot of the transcript.
    #[must_use]
    pub fn entries(&self) -> Vec<ChatEntry> {
        self.inner.entries.read().unwrap().clone()
    }

    /// Number of transcript entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.inner.entries.read().unwrap().len()
    }

    /// Claim the in-flight slot for a channel.
    ///
    /// Returns `None` when a request is already in flight on that channel;
    /// the caller must then drop the submission without observable effect.
    /// The slot releases when the guard drops, including when a handler
    /// future is dropped mid-await, so a slot can never leak.
    #[must_use]
    pub fn begin(&self, channel: Channel) -> Option<InFlightGuard> {
        let slot = &self.inner.in_flight[channel.index()];
        if slot
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }
        self.touch();
        Some(InFlightGuard {
            inner: Arc::clone(&self.inner),
            channel,
        })
    }

    /// Whether a request is currently in flight on a channel.
    #[must_use]
    pub fn is_in_flight(&self, channel: Channel) -> bool {
        self.inner.in_flight[channel.index()].load(Ordering::Acquire)
    }

    fn touch(&self) {
        let mut guard = self.inner.last_activity.write().unwrap();
        *guard = Utc::now();
    }

    /// Whether the session has been idle longer than `timeout`.
    #[must_use]
    pub fn is_idle_longer_than(&self, timeout: Duration) -> bool {
        let last = *self.inner.last_activity.read().unwrap();
        let now = Utc::now();
        if let Ok(idle) = (now - last).to_std() {
            idle > timeout
        } else {
            // Negative duration means clock skew or "last" is in the future.
            false
        }
    }
}

/// Releases a channel's in-flight slot on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    inner: Arc<SessionInner>,
    channel: Channel,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.inner.in_flight[self.channel.index()].store(false, Ordering::Release);
    }
}

/// Thread-safe store for sessions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

#[derive(Debug)]
struct SessionStoreInner {
    sessions: RwLock<HashMap<String, Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create a new session store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                sessions: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Create a new session and return it.
    #[must_use]
    pub fn create(&self) -> Session {
        let id = Uuid::new_v4().to_string();
        self.create_with_id(id)
    }

    /// Create a new session with a specific ID.
    #[must_use]
    pub fn create_with_id(&self, id: impl Into<String>) -> Session {
        let id = id.into();
        let session = Session::new(id.clone());
        let mut guard = self.inner.sessions.write().unwrap();
        guard.insert(id, session.clone());
        session
    }

    /// Get a session by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Session> {
        let guard = self.inner.sessions.read().unwrap();
        guard.get(id).cloned()
    }

    /// Number of active sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.sessions.read().unwrap().len()
    }

    /// Whether there are no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove sessions idle longer than `timeout`.
    ///
    /// Returns the number of sessions removed.
    pub fn cleanup_idle(&self, timeout: Duration) -> usize {
        let mut guard = self.inner.sessions.write().unwrap();
        let before = guard.len();
        guard.retain(|_, session| !session.is_idle_longer_than(timeout));
        before - guard.len()
    }
}
