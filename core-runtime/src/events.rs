//! # Event Bus System
//!
//! Typed events broadcast over `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! The gateway and the session store never talk to a UI directly. What they
//! observe (a credential rotated, a forced logout, a failed request, a
//! requested navigation) is published on the [`EventBus`] so host shells,
//! audit logs and tests can subscribe independently.
//!
//! ```text
//! ┌───────────────┐     emit      ┌───────────┐
//! │ Session Store ├──────────────>│           │     subscribe    ┌────────────┐
//! └───────────────┘               │ EventBus  ├─────────────────>│ Subscriber │
//! ┌───────────────┐     emit      │ (broadcast│                  └────────────┘
//! │   Gateways    ├──────────────>│  channel) │
//! └───────────────┘               └───────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, SessionEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(100);
//! let mut subscriber = event_bus.subscribe();
//!
//! event_bus.emit(CoreEvent::Session(SessionEvent::SignedOut)).ok();
//!
//! let event = subscriber.recv().await.unwrap();
//! assert_eq!(event.description(), "Session signed out");
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber missed `n` events. Non-fatal.
//! - **`RecvError::Closed`**: every sender is gone. Treat as shutdown.
//!
//! Emitting with no subscribers returns an error; publishers ignore it with
//! `.ok()`.

use bridge_traits::ui::Navigator;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Subscribers that can't keep up will receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Session store changes
    Session(SessionEvent),
    /// Request outcomes observed by a gateway
    Gateway(GatewayEvent),
    /// Route changes requested by the core
    Navigation(NavigationEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Session(e) => e.description(),
            CoreEvent::Gateway(e) => e.description(),
            CoreEvent::Navigation(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Gateway(GatewayEvent::RequestFailed { .. }) => EventSeverity::Error,
            CoreEvent::Session(SessionEvent::Expired { .. }) => EventSeverity::Warning,
            CoreEvent::Session(SessionEvent::SignedIn { .. }) => EventSeverity::Info,
            CoreEvent::Session(SessionEvent::SignedOut) => EventSeverity::Info,
            CoreEvent::Navigation(_) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

// ============================================================================
// Session Events
// ============================================================================

/// Changes to the shared session.
///
/// Payloads never carry the credential itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum SessionEvent {
    /// A credential was stored (login or explicit set).
    SignedIn {
        /// Session generation after the change.
        generation: u64,
    },
    /// The server handed out a fresh credential.
    TokenRotated {
        /// Gateway that observed the rotation header.
        gateway: String,
        generation: u64,
    },
    /// Profile stored or replaced.
    ProfileUpdated {
        username: String,
    },
    /// Explicit logout.
    SignedOut,
    /// Forced logout after the server rejected the credential.
    Expired {
        /// Gateway whose response triggered the teardown.
        gateway: String,
    },
}

impl SessionEvent {
    fn description(&self) -> &str {
        match self {
            SessionEvent::SignedIn { .. } => "Session credential stored",
            SessionEvent::TokenRotated { .. } => "Session credential rotated",
            SessionEvent::ProfileUpdated { .. } => "User profile updated",
            SessionEvent::SignedOut => "Session signed out",
            SessionEvent::Expired { .. } => "Session expired",
        }
    }
}

// ============================================================================
// Gateway Events
// ============================================================================

/// Request outcomes worth observing outside the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum GatewayEvent {
    /// A request settled with an error.
    RequestFailed {
        gateway: String,
        /// Correlation id also present in the request's log span.
        request_id: String,
        method: String,
        path: String,
        /// Error kind name (e.g. "Unauthorized").
        kind: String,
        http_status: Option<u16>,
        business_code: Option<i64>,
        message: String,
    },
    /// The caller cancelled a request before it settled.
    RequestCancelled {
        gateway: String,
        request_id: String,
        path: String,
    },
}

impl GatewayEvent {
    fn description(&self) -> &str {
        match self {
            GatewayEvent::RequestFailed { .. } => "Request failed",
            GatewayEvent::RequestCancelled { .. } => "Request cancelled",
        }
    }
}

// ============================================================================
// Navigation Events
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum NavigationEvent {
    /// The core asked the host to show `route`.
    Requested { route: String },
}

impl NavigationEvent {
    fn description(&self) -> &str {
        match self {
            NavigationEvent::Requested { .. } => "Navigation requested",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for broadcasting events to multiple subscribers.
///
/// Cloning is cheap; every clone publishes into the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of events to buffer per subscriber.
    ///   When a subscriber falls behind by more than this amount, it will
    ///   receive a `RecvError::Lagged` error.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event.
    /// Returns an error if there are no active subscribers.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive events.
    ///
    /// Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    ///
    /// ```rust
    /// use core_runtime::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.subscriber_count(), 0);
    ///
    /// let _subscriber = event_bus.subscribe();
    /// assert_eq!(event_bus.subscriber_count(), 1);
    /// ```
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let event_bus = EventBus::new(100);
/// let session_only = EventStream::new(event_bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Session(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receives the next event that passes the filter (if any).
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;

            let Some(filter) = &self.filter else {
                return Ok(event);
            };

            if filter(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no events are currently available.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    let Some(filter) = &self.filter else {
                        return Some(Ok(event));
                    };

                    if filter(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Navigator Adapter
// ============================================================================

/// [`Navigator`] that publishes [`NavigationEvent::Requested`] instead of
/// routing itself.
///
/// Hosts without a router of their own (CLIs, headless tests) subscribe to the
/// bus and react to the event.
#[derive(Debug, Clone)]
pub struct EventNavigator {
    bus: EventBus,
}

impl EventNavigator {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

impl Navigator for EventNavigator {
    fn navigate_to(&self, route: &str) {
        self.bus
            .emit(CoreEvent::Navigation(NavigationEvent::Requested {
                route: route.to_string(),
            }))
            .ok();
    }
}

// ============================================================================
// Tests
// ============================================================================
