use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Tool;

/// One entry in the recently-used list: the tool plus its last visit time.
/// The list keeps at most one entry per tool id; the most recent visit wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentEntry {
    pub tool: Tool,
    pub timestamp: DateTime<Utc>,
}

impl RecentEntry {
    pub fn now(tool: Tool) -> Self {
        Self {
            tool,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

/// Sparse display/behavior settings. Every field is optional so a stored
/// record only carries what the user actually changed; updates merge
/// field-wise instead of replacing the whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_recent_tools: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_recent_tools: Option<usize>,
}

impl UserPreferences {
    /// The settings a fresh profile starts from.
    pub fn defaults() -> Self {
        Self {
            preferred_theme: None,
            show_recent_tools: Some(true),
            max_recent_tools: Some(10),
        }
    }

    /// Overlay `update` onto `self`, keeping existing values for fields the
    /// update leaves unset.
    pub fn merge(&mut self, update: UserPreferences) {
        if let Some(theme) = update.preferred_theme {
            self.preferred_theme = Some(theme);
        }
        if let Some(show) = update.show_recent_tools {
            self.show_recent_tools = Some(show);
        }
        if let Some(max) = update.max_recent_tools {
            self.max_recent_tools = Some(max);
        }
    }

    pub fn theme(&self) -> Theme {
        self.preferred_theme.unwrap_or(Theme::System)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut prefs = UserPreferences::defaults();
        prefs.merge(UserPreferences {
            preferred_theme: Some(Theme::Dark),
            ..Default::default()
        });

        assert_eq!(prefs.preferred_theme, Some(Theme::Dark));
        assert_eq!(prefs.show_recent_tools, Some(true));
        assert_eq!(prefs.max_recent_tools, Some(10));
    }

    #[test]
    fn test_merge_overwrites_set_fields() {
        let mut prefs = UserPreferences::defaults();
        prefs.merge(UserPreferences {
            show_recent_tools: Some(false),
            max_recent_tools: Some(5),
            ..Default::default()
        });

        assert_eq!(prefs.show_recent_tools, Some(false));
        assert_eq!(prefs.max_recent_tools, Some(5));
    }

    #[test]
    fn test_theme_defaults_to_system() {
        assert_eq!(UserPreferences::default().theme(), Theme::System);
    }
}
