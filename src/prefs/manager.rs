use tokio::sync::broadcast;

use crate::models::{RecentEntry, Tool, UserPreferences};
use crate::store::{
    ChangeEvent, ChangeHub, FavoriteAction, Store, KEY_FAVORITES, KEY_PREFERENCES, KEY_RECENT,
};

/// Most recent entries kept when persisting the list.
const MAX_RECENT_STORED: usize = 15;

/// Defensive cap applied when reading the stored list back. Slightly wider
/// than the write-time cap so externally written data is tolerated rather
/// than truncated below what was stored.
const MAX_RECENT_RETRIEVED: usize = 20;

/// Manages the favorites set, the recently-used list, and user preferences.
///
/// All operations persist through the `Store` and broadcast the updated
/// state on the `ChangeHub`. Storage failures degrade to empty state
/// silently; the next successful write re-establishes consistency.
pub struct PrefsManager {
    store: Store,
    hub: ChangeHub,
}

impl PrefsManager {
    pub fn new(store: Store, hub: ChangeHub) -> Self {
        Self { store, hub }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.hub.subscribe()
    }

    // ===== Favorites =====

    pub fn favorites(&self) -> Vec<Tool> {
        self.store.read(KEY_FAVORITES)
    }

    pub fn is_favorite(&self, tool_id: &str) -> bool {
        self.favorites().iter().any(|t| t.id == tool_id)
    }

    /// Add a tool to the favorites set. No-op if already present.
    pub fn add_favorite(&self, tool: &Tool) {
        let mut favorites = self.favorites();
        if favorites.iter().any(|t| t.id == tool.id) {
            return;
        }
        favorites.push(tool.clone());
        self.store.write(KEY_FAVORITES, &favorites);
        self.hub.broadcast(ChangeEvent::FavoritesChanged {
            favorites,
            action: FavoriteAction::Added,
        });
    }

    /// Remove a tool from the favorites set. No-op if absent.
    pub fn remove_favorite(&self, tool_id: &str) {
        let mut favorites = self.favorites();
        let before = favorites.len();
        favorites.retain(|t| t.id != tool_id);
        if favorites.len() == before {
            return;
        }
        self.store.write(KEY_FAVORITES, &favorites);
        self.hub.broadcast(ChangeEvent::FavoritesChanged {
            favorites,
            action: FavoriteAction::Removed,
        });
    }

    /// Flip a tool's favorite state; returns whether it is now a favorite.
    pub fn toggle_favorite(&self, tool: &Tool) -> bool {
        if self.is_favorite(&tool.id) {
            self.remove_favorite(&tool.id);
            false
        } else {
            self.add_favorite(tool);
            true
        }
    }

    pub fn clear_favorites(&self) {
        self.store.remove(KEY_FAVORITES);
        self.hub.broadcast(ChangeEvent::FavoritesChanged {
            favorites: vec![],
            action: FavoriteAction::Cleared,
        });
    }

    // ===== Recent tools =====

    /// The recently-used list, most recent first.
    ///
    /// Re-sorts and caps on every read so externally corrupted ordering is
    /// repaired instead of propagated.
    pub fn recent(&self) -> Vec<RecentEntry> {
        let mut recent: Vec<RecentEntry> = self.store.read(KEY_RECENT);
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(MAX_RECENT_RETRIEVED);
        recent
    }

    /// Record a visit: collapses any previous entry for the tool, prepends a
    /// fresh one, and evicts the oldest entries beyond the cap.
    pub fn add_recent(&self, tool: &Tool) {
        let mut recent = self.recent();
        recent.retain(|entry| entry.tool.id != tool.id);
        recent.insert(0, RecentEntry::now(tool.clone()));
        recent.truncate(MAX_RECENT_STORED);
        self.store.write(KEY_RECENT, &recent);
        self.hub
            .broadcast(ChangeEvent::RecentToolsChanged { recent });
    }

    pub fn clear_recent(&self) {
        self.store.remove(KEY_RECENT);
        self.hub
            .broadcast(ChangeEvent::RecentToolsChanged { recent: vec![] });
    }

    // ===== Preferences =====

    /// Current preferences with defaults filled in for unset fields.
    pub fn preferences(&self) -> UserPreferences {
        let mut prefs = UserPreferences::defaults();
        prefs.merge(self.store.read(KEY_PREFERENCES));
        prefs
    }

    /// Merge a sparse update into the stored preferences.
    pub fn update_preferences(&self, update: UserPreferences) {
        let mut preferences = self.preferences();
        preferences.merge(update);
        self.store.write(KEY_PREFERENCES, &preferences);
        self.hub
            .broadcast(ChangeEvent::PreferencesChanged { preferences });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn tool(id: &str) -> Tool {
        Tool {
            id: id.to_string(),
            name: format!("Tool {}", id),
            description: String::new(),
            category: Category::Math,
            icon: "fas fa-plus".to_string(),
            is_popular: false,
            href: format!("/games/{}", id),
        }
    }

    fn manager() -> (tempfile::TempDir, PrefsManager) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = Store::open(dir.path().to_path_buf()).expect("Failed to open store");
        (dir, PrefsManager::new(store, ChangeHub::new()))
    }

    #[test]
    fn test_add_favorite_is_idempotent() {
        let (_dir, manager) = manager();
        manager.add_favorite(&tool("a"));
        manager.add_favorite(&tool("a"));
        assert_eq!(manager.favorites().len(), 1);
    }

    #[test]
    fn test_toggle_favorite() {
        let (_dir, manager) = manager();
        assert!(manager.toggle_favorite(&tool("a")));
        assert!(manager.is_favorite("a"));
        assert!(!manager.toggle_favorite(&tool("a")));
        assert!(!manager.is_favorite("a"));
    }

    #[test]
    fn test_recent_deduplicates_by_tool() {
        let (_dir, manager) = manager();
        manager.add_recent(&tool("a"));
        manager.add_recent(&tool("b"));
        manager.add_recent(&tool("a"));

        let recent = manager.recent();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].tool.id, "a");
        assert_eq!(recent[1].tool.id, "b");
    }

    #[test]
    fn test_recent_caps_at_fifteen() {
        let (_dir, manager) = manager();
        for i in 0..16 {
            manager.add_recent(&tool(&format!("t{}", i)));
        }

        let recent = manager.recent();
        assert_eq!(recent.len(), MAX_RECENT_STORED);
        // The first visit fell off the end
        assert!(!recent.iter().any(|e| e.tool.id == "t0"));
        assert_eq!(recent[0].tool.id, "t15");
    }

    #[test]
    fn test_preferences_defaults_then_merge() {
        let (_dir, manager) = manager();
        let prefs = manager.preferences();
        assert_eq!(prefs.show_recent_tools, Some(true));
        assert_eq!(prefs.max_recent_tools, Some(10));

        manager.update_preferences(UserPreferences {
            max_recent_tools: Some(6),
            ..Default::default()
        });
        let prefs = manager.preferences();
        assert_eq!(prefs.max_recent_tools, Some(6));
        assert_eq!(prefs.show_recent_tools, Some(true));
    }
}
