use super::{GroupValue, SEPARATOR, Slot, ValueSlot, join_path, validate_name};
use crate::error::Result;
use crate::template;

/// Composite slot with ordered, uniquely named children.
///
/// Once a slot is included into a group it is addressed through the group:
/// a child `username` of the group `person` is `person/username` in a
/// [`crate::SlotRegistry`].
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSlot {
    name: String,
    children: Vec<Slot>,
}

impl GroupSlot {
    /// Build a group. Children sharing a name collapse into the last one.
    pub fn new(name: impl Into<String>, children: impl IntoIterator<Item = Slot>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        let mut group = Self {
            name,
            children: Vec::new(),
        };
        for child in children {
            group.insert(child);
        }
        Ok(group)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn children(&self) -> &[Slot] {
        &self.children
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Add a child, replacing a same-named one in place. Returns the replaced child.
    pub fn insert(&mut self, child: Slot) -> Option<Slot> {
        match self.children.iter_mut().find(|c| c.name() == child.name()) {
            Some(existing) => Some(std::mem::replace(existing, child)),
            None => {
                self.children.push(child);
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Slot> {
        let index = self.children.iter().position(|c| c.name() == name)?;
        Some(self.children.remove(index))
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Slot> {
        self.children.iter().find(|c| c.name() == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Slot> {
        self.children.iter_mut().find(|c| c.name() == name)
    }

    /// Resolve a path relative to this group, e.g. `address/city`.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&Slot> {
        let (head, rest) = match path.split_once(SEPARATOR) {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let child = self.child(head)?;
        match (rest, child) {
            (None, _) => Some(child),
            (Some(rest), Slot::Group(group)) => group.find(rest),
            (Some(_), Slot::Value(_)) => None,
        }
    }

    /// Every descendant leaf set.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.children.iter().all(Slot::is_set)
    }

    /// Leaf values keyed by leaf name, nested groups merged into one mapping.
    #[must_use]
    pub fn value(&self) -> GroupValue {
        let mut values = GroupValue::new();
        for child in &self.children {
            match child {
                Slot::Value(leaf) => {
                    values.insert(leaf.name().to_string(), leaf.value().map(str::to_string));
                }
                Slot::Group(group) => values.extend(group.value()),
            }
        }
        values
    }

    pub fn extract_value(&mut self, input: &str) -> GroupValue {
        for child in &mut self.children {
            child.extract_value(input);
        }
        self.value()
    }

    pub fn unset_value(&mut self) {
        for child in &mut self.children {
            child.unset_value();
        }
    }

    /// Fill `{child}` and `{child/grandchild}` placeholders.
    ///
    /// All or nothing: a group that is not fully set returns the template unchanged.
    #[must_use]
    pub fn fill_template(&self, template: &str) -> String {
        if !self.is_set() {
            return template.to_string();
        }
        let leaves = self.leaves();
        template::fill(template, |name| {
            leaves
                .iter()
                .find(|(path, _)| path == name)
                .and_then(|(_, leaf)| leaf.value())
        })
    }

    /// Descendant leaves with their paths relative to this group.
    #[must_use]
    pub fn leaves(&self) -> Vec<(String, &ValueSlot)> {
        let mut leaves = Vec::new();
        self.collect_leaves("", &mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a ValueSlot)>) {
        for child in &self.children {
            let path = join_path(prefix, child.name());
            match child {
                Slot::Value(leaf) => out.push((path, leaf)),
                Slot::Group(group) => group.collect_leaves(&path, out),
            }
        }
    }
}
