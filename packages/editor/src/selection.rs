use serde::{Deserialize, Serialize};

/// How a click modifies the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionMode {
    /// Single-select
    #[default]
    Replace,
    /// Append if absent
    Add,
    /// Remove if present, else append
    Toggle,
}

/// Primary selection plus the ordered multi-selection.
///
/// `primary` is the most recently selected id and is always contained in
/// `ids` when set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    primary: Option<String>,
    ids: Vec<String>,
}

impl Selection {
    pub fn primary(&self) -> Option<&str> {
        self.primary.as_deref()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn select(&mut self, id: Option<&str>, mode: SelectionMode) {
        let Some(id) = id else {
            self.clear();
            return;
        };

        match mode {
            SelectionMode::Replace => self.replace(id),
            SelectionMode::Add => self.add(id),
            SelectionMode::Toggle => self.toggle(id),
        }
    }

    pub fn replace(&mut self, id: &str) {
        self.ids = vec![id.to_string()];
        self.primary = Some(id.to_string());
    }

    pub fn add(&mut self, id: &str) {
        if !self.contains(id) {
            self.ids.push(id.to_string());
        }
        self.primary = Some(id.to_string());
    }

    pub fn toggle(&mut self, id: &str) {
        if self.contains(id) {
            self.remove(id);
        } else {
            self.add(id);
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.ids.retain(|selected| selected != id);
        if self.primary.as_deref() == Some(id) {
            self.primary = self.ids.last().cloned();
        }
    }

    /// Replace with `ids` (duplicates dropped); the last one becomes primary
    pub fn set_many(&mut self, ids: &[String]) {
        self.ids.clear();
        for id in ids {
            if !self.contains(id) {
                self.ids.push(id.clone());
            }
        }
        self.primary = self.ids.last().cloned();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.primary = None;
    }

    /// Drop ids that fail `keep`, re-pointing the primary if needed
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.ids.retain(|id| keep(id));
        if let Some(primary) = &self.primary {
            if !self.ids.contains(primary) {
                self.primary = self.ids.last().cloned();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_selects_single() {
        let mut selection = Selection::default();
        selection.select(Some("a"), SelectionMode::Add);
        selection.select(Some("b"), SelectionMode::Replace);
        assert_eq!(selection.ids(), &["b".to_string()]);
        assert_eq!(selection.primary(), Some("b"));
    }

    #[test]
    fn test_add_keeps_existing_and_updates_primary() {
        let mut selection = Selection::default();
        selection.select(Some("a"), SelectionMode::Replace);
        selection.select(Some("b"), SelectionMode::Add);
        selection.select(Some("a"), SelectionMode::Add);

        assert_eq!(selection.ids(), &["a".to_string(), "b".to_string()]);
        assert_eq!(selection.primary(), Some("a"));
    }

    #[test]
    fn test_toggle_removes_and_repoints_primary() {
        let mut selection = Selection::default();
        selection.select(Some("a"), SelectionMode::Toggle);
        selection.select(Some("b"), SelectionMode::Toggle);
        assert_eq!(selection.primary(), Some("b"));

        selection.select(Some("b"), SelectionMode::Toggle);
        assert_eq!(selection.ids(), &["a".to_string()]);
        assert_eq!(selection.primary(), Some("a"));

        selection.select(Some("a"), SelectionMode::Toggle);
        assert!(selection.is_empty());
        assert_eq!(selection.primary(), None);
    }

    #[test]
    fn test_selecting_none_clears() {
        let mut selection = Selection::default();
        selection.set_many(&["a".to_string(), "b".to_string()]);
        selection.select(None, SelectionMode::Add);
        assert!(selection.is_empty());
        assert_eq!(selection.primary(), None);
    }

    #[test]
    fn test_retain_drops_missing_primary() {
        let mut selection = Selection::default();
        selection.set_many(&["a".to_string(), "b".to_string(), "c".to_string()]);
        selection.retain(|id| id != "c");
        assert_eq!(selection.primary(), Some("b"));
        assert_eq!(selection.len(), 2);
    }
}
