use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::flatten::flatten_slot_tree;
use crate::slot::{SEPARATOR, Slot};

/// Flat registry of slot definitions keyed by qualified path.
///
/// Script construction owns the registry mutably; once the dialogue starts it
/// is shared read-only, typically as `Arc<SlotRegistry>`. Registration from
/// several threads is not supported.
#[derive(Debug, Clone, Default)]
pub struct SlotRegistry {
    slots: BTreeMap<String, Slot>,
}

impl SlotRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }

    /// Register one slot tree under its own name.
    ///
    /// A previous tree with the same top-level name is dropped entirely.
    /// Bare entries of descendants that were registered on their own before
    /// being composed into this tree are evicted along with everything below them.
    pub fn register(&mut self, slot: impl Into<Slot>) {
        let slot = slot.into();
        let name = slot.name().to_string();

        let replaced = self.remove_subtree(&name);
        if replaced > 0 {
            debug!("Replacing {replaced} entries of slot '{name}'");
        }

        let tree = flatten_slot_tree(&slot);
        for (bare, node) in &tree.remove {
            if self.slots.get(bare) == Some(node) {
                let evicted = self.remove_subtree(bare);
                debug!("Evicting '{bare}' ({evicted} entries), now registered below '{name}'");
            }
        }

        info!("Registering slot: {name} ({} paths)", tree.len());
        self.slots.extend(tree.add);
    }

    pub fn register_slots<I, S>(&mut self, slots: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Slot>,
    {
        for slot in slots {
            self.register(slot);
        }
    }

    /// Register `slots` and drop every entry that does not belong to one of them.
    pub fn register_root_slots<I, S>(&mut self, slots: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Slot>,
    {
        let mut roots = Vec::new();
        for slot in slots {
            let slot = slot.into();
            roots.push(slot.name().to_string());
            self.register(slot);
        }
        self.retain_roots(&roots);
    }

    /// Keep only the entries that are, or descend from, one of `roots`.
    pub fn retain_roots<S: AsRef<str>>(&mut self, roots: &[S]) {
        let before = self.slots.len();
        self.slots
            .retain(|path, _| roots.iter().any(|root| is_within(path, root.as_ref())));
        debug!("Pruned registry from {before} to {} entries", self.slots.len());
    }

    /// Remove `name` and everything registered below it. Returns the number of removed entries.
    pub fn remove_subtree(&mut self, name: &str) -> usize {
        let before = self.slots.len();
        self.slots.retain(|path, _| !is_within(path, name));
        before - self.slots.len()
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Slot> {
        self.slots.get(path)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.slots.contains_key(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Slot)> {
        self.slots.iter().map(|(path, slot)| (path.as_str(), slot))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// Paths without a separator, i.e. the roots of registered trees.
    #[must_use]
    pub fn top_level_names(&self) -> Vec<String> {
        self.paths()
            .filter(|path| !path.contains(SEPARATOR))
            .map(str::to_string)
            .collect()
    }
}

fn is_within(path: &str, root: &str) -> bool {
    path.strip_prefix(root)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::{GroupSlot, ValueSlot};

    fn leaf(name: &str, pattern: &str) -> Slot {
        match ValueSlot::regexp(name, pattern) {
            Ok(slot) => slot.into(),
            Err(e) => panic!("invalid test slot: {e}"),
        }
    }

    fn group(name: &str, children: Vec<Slot>) -> Slot {
        match GroupSlot::new(name, children) {
            Ok(group) => group.into(),
            Err(e) => panic!("invalid test group: {e}"),
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = SlotRegistry::new();
        registry.register(group(
            "person",
            vec![leaf("username", r"\w+"), leaf("email", r"\S+@\S+")],
        ));

        assert_eq!(registry.len(), 3);
        assert!(registry.get("person/username").is_some());
        assert!(registry.get("username").is_none());
        assert_eq!(registry.top_level_names(), vec!["person".to_string()]);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = SlotRegistry::new();
        let person = group("person", vec![leaf("username", r"\w+")]);
        registry.register(person.clone());
        registry.register(person);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_reregistration_leaves_no_orphans() {
        let mut registry = SlotRegistry::new();
        registry.register(group(
            "person",
            vec![leaf("username", r"\w+"), leaf("email", r"\S+@\S+")],
        ));
        registry.register(group("person", vec![leaf("phone", r"[0-9]+")]));

        let paths: Vec<&str> = registry.paths().collect();
        assert_eq!(paths, vec!["person", "person/phone"]);
    }

    #[test]
    fn test_composed_child_evicts_bare_entry() {
        let mut registry = SlotRegistry::new();
        let username = leaf("username", r"\w+");
        let unrelated = leaf("email", r"unrelated");
        registry.register_slots([username.clone(), unrelated]);
        registry.register(group(
            "person",
            vec![username, leaf("email", r"\S+@\S+")],
        ));

        assert!(!registry.contains("username"));
        assert!(registry.contains("person/username"));
        // a different slot that only shares the name stays put
        assert!(registry.contains("email"));
    }

    #[test]
    fn test_composed_group_evicts_its_subtree() {
        let mut registry = SlotRegistry::new();
        let address = group("address", vec![leaf("city", r"in (\w+)")]);
        registry.register(address.clone());
        registry.register(group("person", vec![address]));

        let paths: Vec<&str> = registry.paths().collect();
        assert_eq!(paths, vec!["person", "person/address", "person/address/city"]);
        assert!(registry.get("address/city").is_none());
    }

    #[test]
    fn test_register_root_slots_prunes() {
        let mut registry = SlotRegistry::new();
        registry.register(leaf("stray", r".+"));
        registry.register(leaf("personal", r".+"));
        registry.register_root_slots([group("person", vec![leaf("name", r".+")])]);

        let paths: Vec<&str> = registry.paths().collect();
        assert_eq!(paths, vec!["person", "person/name"]);
    }

    #[test]
    fn test_remove_subtree_respects_separator() {
        let mut registry = SlotRegistry::new();
        registry.register(group("person", vec![leaf("name", r".+")]));
        registry.register(leaf("personal", r".+"));

        assert_eq!(registry.remove_subtree("person"), 2);
        assert!(registry.contains("personal"));
    }
}
