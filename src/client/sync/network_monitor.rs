//! # Connectivity Monitor
//!
//! Holds the client's belief about whether the API is reachable and announces
//! changes of that belief.
//!
//! - **State**: a `watch` channel carrying [`ReachabilityState`], readable
//!   synchronously and observable by a status indicator
//! - **Transitions**: a `broadcast` channel of [`ConnectivityEvent`]s, emitted only
//!   when the online flag actually flips
//!
//! The monitor does not probe anything itself. The reachability probe (or a test)
//! feeds it through [`ConnectivityMonitor::set_online`].

use crate::client::sync::sync_state::ReachabilityState;
use chrono::Utc;
use tokio::sync::{broadcast, watch};

const EVENT_CAPACITY: usize = 16;

/// A change of the online flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    BecameOnline,
    BecameOffline,
}

#[derive(Debug)]
pub struct ConnectivityMonitor {
    state: watch::Sender<ReachabilityState>,
    events: broadcast::Sender<ConnectivityEvent>,
}

impl ConnectivityMonitor {
    /// Monitor seeded with the result of the startup probe
    pub fn new(initially_online: bool) -> Self {
        let (state, _) = watch::channel(ReachabilityState::initial(initially_online));
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { state, events }
    }

    pub fn is_online(&self) -> bool {
        self.state.borrow().is_online
    }

    pub fn state(&self) -> ReachabilityState {
        self.state.borrow().clone()
    }

    /// Transition events from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ConnectivityEvent> {
        self.events.subscribe()
    }

    /// Receiver that always sees the latest state
    pub fn watch(&self) -> watch::Receiver<ReachabilityState> {
        self.state.subscribe()
    }

    /// Record a connectivity signal
    ///
    /// Returns the emitted event, or `None` when the signal matched the current
    /// state and was ignored.
    pub fn set_online(&self, online: bool) -> Option<ConnectivityEvent> {
        let now = Utc::now();
        let changed = self.state.send_if_modified(|state| {
            if state.is_online == online {
                return false;
            }
            state.is_online = online;
            state.changed_at = now;
            if online {
                state.last_online_at = Some(now);
            } else {
                state.last_offline_at = Some(now);
            }
            true
        });

        if !changed {
            return None;
        }

        let event = if online {
            tracing::info!("Connectivity restored");
            ConnectivityEvent::BecameOnline
        } else {
            tracing::info!("Connectivity lost, mutations will be queued");
            ConnectivityEvent::BecameOffline
        };

        // No receivers just means nobody is listening yet
        let _ = self.events.send(event);
        Some(event)
    }
}
