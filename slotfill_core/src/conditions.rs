//! Predicates over the set state of slots.

use serde::{Deserialize, Serialize};

use crate::context::SlotContext;
use crate::error::{Result, SlotError};
use crate::handlers::is_slot_set;
use crate::registry::SlotRegistry;

/// How the set states of several slots are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetMode {
    All,
    Any,
}

/// Condition on whether named slots have been set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCondition {
    names: Vec<String>,
    mode: SetMode,
}

impl SlotCondition {
    #[must_use]
    pub fn new<I, S>(names: I, mode: SetMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            mode,
        }
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub const fn mode(&self) -> SetMode {
        self.mode
    }

    /// Unknown names and a missing storage count as unset.
    pub fn evaluate<C>(&self, ctx: &C, registry: &SlotRegistry) -> bool
    where
        C: SlotContext + ?Sized,
    {
        let mut states = self
            .names
            .iter()
            .map(|name| is_slot_set(ctx, registry, name));
        match self.mode {
            SetMode::All => states.all(|set| set),
            SetMode::Any => states.any(|set| set),
        }
    }
}

/// Build a set-state condition from the two mutually exclusive flags.
///
/// # Errors
/// Returns [`SlotError::ExclusiveModes`] unless exactly one flag is set.
pub fn is_set<I, S>(names: I, use_all: bool, use_any: bool) -> Result<SlotCondition>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mode = match (use_all, use_any) {
        (true, false) => SetMode::All,
        (false, true) => SetMode::Any,
        _ => return Err(SlotError::ExclusiveModes),
    };
    Ok(SlotCondition::new(names, mode))
}

#[must_use]
pub fn all_set<I, S>(names: I) -> SlotCondition
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    SlotCondition::new(names, SetMode::All)
}

#[must_use]
pub fn any_set<I, S>(names: I) -> SlotCondition
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    SlotCondition::new(names, SetMode::Any)
}
