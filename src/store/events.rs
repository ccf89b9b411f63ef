use tokio::sync::broadcast;

use crate::models::{RecentEntry, Tool, User, UserPreferences};

/// Buffer size for the change broadcast channel.
/// 32 events of headroom covers bursts of rapid toggling before a slow
/// subscriber starts lagging.
const CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteAction {
    Added,
    Removed,
    Cleared,
}

/// Typed payloads broadcast on every persisted mutation. Each event carries
/// the full updated state so subscribers can re-render without reading the
/// store themselves.
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    FavoritesChanged {
        favorites: Vec<Tool>,
        action: FavoriteAction,
    },
    RecentToolsChanged {
        recent: Vec<RecentEntry>,
    },
    PreferencesChanged {
        preferences: UserPreferences,
    },
    SessionChanged {
        user: Option<User>,
    },
}

/// Process-wide change notification hub.
///
/// A small subject owned by the persistence layer and injected into the
/// managers; UI surfaces subscribe independently and never talk to each
/// other directly.
#[derive(Debug, Clone)]
pub struct ChangeHub {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. A hub with no subscribers drops the event silently;
    /// notifications are best-effort by contract.
    pub fn broadcast(&self, event: ChangeEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribers_receive_events() {
        let hub = ChangeHub::new();
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();

        hub.broadcast(ChangeEvent::SessionChanged { user: None });

        assert!(matches!(
            first.try_recv(),
            Ok(ChangeEvent::SessionChanged { user: None })
        ));
        assert!(matches!(
            second.try_recv(),
            Ok(ChangeEvent::SessionChanged { user: None })
        ));
    }

    #[test]
    fn test_broadcast_without_subscribers_is_silent() {
        let hub = ChangeHub::new();
        hub.broadcast(ChangeEvent::RecentToolsChanged { recent: vec![] });
    }
}
