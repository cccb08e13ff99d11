//! Row selection over the lead list.

use std::collections::HashSet;

use crate::lead::Lead;

/// Set of selected lead identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Flips membership of one identifier. Returns true if it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// True when every visible lead is selected and there is at least one.
    pub fn covers_all(&self, visible: &[&Lead]) -> bool {
        !visible.is_empty()
            && self.ids.len() == visible.len()
            && visible.iter().all(|lead| self.ids.contains(&lead.id))
    }

    /// "Select all" checkbox: clears when everything visible is selected,
    /// otherwise selects exactly the visible leads.
    pub fn toggle_all(&mut self, visible: &[&Lead]) {
        if self.covers_all(visible) {
            self.ids.clear();
        } else {
            self.ids = visible.iter().map(|lead| lead.id.clone()).collect();
        }
    }

    /// Drops identifiers that are no longer loaded.
    pub fn retain_loaded(&mut self, leads: &[Lead]) {
        let loaded: HashSet<&str> = leads.iter().map(|lead| lead.id.as_str()).collect();
        self.ids.retain(|id| loaded.contains(id.as_str()));
    }

    /// Selected leads looked up against `leads`, in `leads` order.
    pub fn pick<'a>(&self, leads: &'a [Lead]) -> Vec<&'a Lead> {
        leads.iter().filter(|lead| self.ids.contains(&lead.id)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leads(n: usize) -> Vec<Lead> {
        (0..n)
            .map(|i| Lead::new(uuid::Uuid::new_v4().to_string(), format!("{i}")))
            .collect()
    }

    #[test]
    fn test_toggle_flips_membership() {
        let mut selection = Selection::new();
        assert!(selection.toggle("a"));
        assert!(selection.contains("a"));
        assert!(!selection.toggle("a"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_all_then_deselect_one() {
        let all = leads(5);
        let visible: Vec<&Lead> = all.iter().collect();
        let mut selection = Selection::new();

        selection.toggle_all(&visible);
        assert_eq!(selection.len(), visible.len());

        selection.toggle(&visible[2].id);
        assert_eq!(selection.len(), visible.len() - 1);

        // Partially selected: the checkbox selects everything again
        selection.toggle_all(&visible);
        assert_eq!(selection.len(), visible.len());

        selection.toggle_all(&visible);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_all_uses_visible_subset() {
        let all = leads(4);
        let visible: Vec<&Lead> = all.iter().take(2).collect();
        let mut selection = Selection::new();

        selection.toggle_all(&visible);
        assert_eq!(selection.len(), 2);
        assert!(!selection.contains(&all[3].id));
    }

    #[test]
    fn test_select_all_on_empty_view_selects_nothing() {
        let mut selection = Selection::new();
        selection.toggle("stale");
        selection.toggle_all(&[]);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_retain_loaded_prunes_missing_ids() {
        let all = leads(3);
        let mut selection = Selection::new();
        selection.toggle(&all[0].id);
        selection.toggle("deleted-row");

        selection.retain_loaded(&all);
        assert_eq!(selection.len(), 1);
        assert!(selection.contains(&all[0].id));
    }

    #[test]
    fn test_pick_preserves_list_order() {
        let all = leads(3);
        let mut selection = Selection::new();
        selection.toggle(&all[2].id);
        selection.toggle(&all[0].id);

        let picked: Vec<&str> = selection.pick(&all).iter().map(|l| l.id.as_str()).collect();
        assert_eq!(picked, vec![all[0].id.as_str(), all[2].id.as_str()]);
    }
}
