//! Multi-select tag toggles.

use std::collections::HashSet;

use serde::Serialize;

/// What a toggle did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Toggle {
    Added,
    Removed,
    /// The selection was full; nothing changed.
    Rejected,
    /// The step owning this selection is not on screen; nothing changed.
    NotOnScreen,
}

/// Toggle `tag` in a set where `sentinel` excludes every other tag.
///
/// Selecting the sentinel clears the rest of the set. Selecting any other
/// tag drops the sentinel.
pub fn toggle_exclusive(tags: &mut Vec<String>, tag: &str, sentinel: &str) -> Toggle {
    if let Some(pos) = tags.iter().position(|t| t == tag) {
        tags.remove(pos);
        return Toggle::Removed;
    }

    if tag == sentinel {
        tags.clear();
    } else {
        tags.retain(|t| t != sentinel);
    }
    tags.push(tag.to_string());
    Toggle::Added
}

/// Toggle `tag` in an ordered set holding at most `cap` entries.
pub fn toggle_capped(tags: &mut Vec<String>, tag: &str, cap: usize) -> Toggle {
    if let Some(pos) = tags.iter().position(|t| t == tag) {
        tags.remove(pos);
        return Toggle::Removed;
    }

    if tags.len() >= cap {
        return Toggle::Rejected;
    }
    tags.push(tag.to_string());
    Toggle::Added
}

/// Drop repeated tags, keeping the first occurrence of each.
pub fn dedup_tags(tags: &mut Vec<String>) {
    let mut seen = HashSet::new();
    tags.retain(|t| seen.insert(t.clone()));
}

/// Bring a set supplied wholesale in line with `toggle_exclusive`: no
/// repeats, and the sentinel only when it is the sole tag.
pub fn normalize_exclusive(tags: &mut Vec<String>, sentinel: &str) {
    dedup_tags(tags);
    if tags.len() > 1 {
        tags.retain(|t| t != sentinel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn sentinel_clears_other_tags() {
        let mut set = tags(&["Chicken", "Corn"]);
        assert_eq!(toggle_exclusive(&mut set, "None", "None"), Toggle::Added);
        assert_eq!(set, tags(&["None"]));
    }

    #[test]
    fn other_tag_drops_sentinel() {
        let mut set = tags(&["None"]);
        assert_eq!(toggle_exclusive(&mut set, "Beef", "None"), Toggle::Added);
        assert_eq!(set, tags(&["Beef"]));
    }

    #[test]
    fn exclusive_toggle_off() {
        let mut set = tags(&["Chicken", "Corn"]);
        assert_eq!(toggle_exclusive(&mut set, "Chicken", "None"), Toggle::Removed);
        assert_eq!(set, tags(&["Corn"]));

        let mut set = tags(&["None"]);
        assert_eq!(toggle_exclusive(&mut set, "None", "None"), Toggle::Removed);
        assert!(set.is_empty());
    }

    #[test]
    fn capped_rejects_third_selection() {
        let mut set = tags(&["Grain-free", "Organic"]);
        assert_eq!(toggle_capped(&mut set, "Local", 2), Toggle::Rejected);
        assert_eq!(set, tags(&["Grain-free", "Organic"]));
    }

    #[test]
    fn capped_keeps_selection_order() {
        let mut set = Vec::new();
        toggle_capped(&mut set, "Organic", 2);
        toggle_capped(&mut set, "Grain-free", 2);
        assert_eq!(set, tags(&["Organic", "Grain-free"]));

        // Deselect frees a slot
        assert_eq!(toggle_capped(&mut set, "Organic", 2), Toggle::Removed);
        assert_eq!(toggle_capped(&mut set, "Local", 2), Toggle::Added);
        assert_eq!(set, tags(&["Grain-free", "Local"]));
    }

    #[test]
    fn normalize_drops_repeats_and_mixed_sentinel() {
        let mut set = tags(&["None", "Chicken", "Chicken", "Corn"]);
        normalize_exclusive(&mut set, "None");
        assert_eq!(set, tags(&["Chicken", "Corn"]));

        let mut set = tags(&["None", "None"]);
        normalize_exclusive(&mut set, "None");
        assert_eq!(set, tags(&["None"]));
    }

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let mut set = tags(&["Organic", "Local", "Organic"]);
        dedup_tags(&mut set);
        assert_eq!(set, tags(&["Organic", "Local"]));
    }
}
