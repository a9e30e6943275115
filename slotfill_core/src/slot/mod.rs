//! Slot tree model.
//!
//! A slot is either a leaf [`ValueSlot`], which extracts a single string
//! value from user input, or a [`GroupSlot`], which composes named children
//! into a tree. Names are immutable once constructed; qualified paths such as
//! `person/username` are computed by [`crate::flatten`] and never written back
//! into the nodes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, SlotError};

mod group;
mod value;

pub use group::GroupSlot;
pub use value::{Extractor, SlotFn, ValueSlot};

/// Separator between the segments of a qualified slot path.
pub const SEPARATOR: char = '/';

/// Composite value of a group: leaf name to leaf value, nested groups merged in.
pub type GroupValue = BTreeMap<String, Option<String>>;

/// Value produced by extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotValue {
    Text(String),
    Group(GroupValue),
}

impl SlotValue {
    /// Text of a leaf value, `None` for groups.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Group(_) => None,
        }
    }

    /// Whether every component of the value is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Text(_) => true,
            Self::Group(values) => values.values().all(Option::is_some),
        }
    }
}

impl From<String> for SlotValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// A node of the slot tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Value(ValueSlot),
    Group(GroupSlot),
}

impl Slot {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Value(slot) => slot.name(),
            Self::Group(slot) => slot.name(),
        }
    }

    /// Short label of the slot variant, used in listings.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Value(slot) => slot.extractor().kind(),
            Self::Group(_) => "group",
        }
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        match self {
            Self::Value(slot) => slot.is_set(),
            Self::Group(slot) => slot.is_set(),
        }
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        match self {
            Self::Value(_) => false,
            Self::Group(slot) => slot.has_children(),
        }
    }

    /// Current value without re-extracting.
    #[must_use]
    pub fn value(&self) -> Option<SlotValue> {
        match self {
            Self::Value(slot) => slot.value().map(|v| SlotValue::Text(v.to_string())),
            Self::Group(slot) => Some(SlotValue::Group(slot.value())),
        }
    }

    /// Re-run extraction against `input`, store and return the result.
    pub fn extract_value(&mut self, input: &str) -> Option<SlotValue> {
        match self {
            Self::Value(slot) => slot.extract_value(input).map(SlotValue::Text),
            Self::Group(slot) => Some(SlotValue::Group(slot.extract_value(input))),
        }
    }

    /// Replace the placeholders this slot is responsible for.
    #[must_use]
    pub fn fill_template(&self, template: &str) -> String {
        match self {
            Self::Value(slot) => slot.fill_template(template),
            Self::Group(slot) => slot.fill_template(template),
        }
    }

    pub fn unset_value(&mut self) {
        match self {
            Self::Value(slot) => slot.unset_value(),
            Self::Group(slot) => slot.unset_value(),
        }
    }

    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Value(_) => &[],
            Self::Group(slot) => slot.children(),
        }
    }

    /// Leaves below this node, keyed by their path relative to it.
    ///
    /// A leaf yields itself under an empty path.
    #[must_use]
    pub fn leaves(&self) -> Vec<(String, &ValueSlot)> {
        match self {
            Self::Value(slot) => vec![(String::new(), slot)],
            Self::Group(slot) => slot.leaves(),
        }
    }
}

impl From<ValueSlot> for Slot {
    fn from(slot: ValueSlot) -> Self {
        Self::Value(slot)
    }
}

impl From<GroupSlot> for Slot {
    fn from(slot: GroupSlot) -> Self {
        Self::Group(slot)
    }
}

/// Join a parent path and a child name with [`SEPARATOR`].
#[must_use]
pub fn join_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        return child.to_string();
    }
    if child.is_empty() {
        return parent.to_string();
    }
    format!("{parent}{SEPARATOR}{child}")
}

pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SlotError::InvalidName {
            name: name.to_string(),
            reason: "slot names must not be empty",
        });
    }
    if name.contains(SEPARATOR) {
        return Err(SlotError::InvalidName {
            name: name.to_string(),
            reason: "separator `/` cannot be used in slot names",
        });
    }
    Ok(())
}
