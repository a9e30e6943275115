//! Form policy: drives the dialogue through the nodes that fill a set of slots.
//!
//! A form maps slot paths to the nodes able to fill them. Put
//! [`Form::to_next_label`] into the global transitions and
//! [`Form::update_form_state`] (without a state) into the global
//! pre-transitions processing; activate the form from any node with
//! `update_form_state(Some(FormState::Active))`.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use slotfill_core::{SlotValue, get_values, is_slot_set};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::actor::Actor;
use crate::context::Context;
use crate::error::{EngineError, Result};
use crate::script::{Condition, LabelFn, NodeLabel, Processing};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormState {
    #[default]
    Inactive,
    Active,
    Complete,
    Failed,
}

/// Per-conversation record of one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRecord {
    pub state: FormState,
    pub visits: BTreeMap<NodeLabel, usize>,
    pub fillable: bool,
}

impl Default for FormRecord {
    fn default() -> Self {
        Self {
            state: FormState::Inactive,
            visits: BTreeMap::new(),
            fillable: true,
        }
    }
}

/// Form records of one conversation, keyed by form name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormStorage {
    records: BTreeMap<String, FormRecord>,
}

impl FormStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, form: &str) -> Option<&FormRecord> {
        self.records.get(form)
    }

    pub fn entry(&mut self, form: &str) -> &mut FormRecord {
        self.records.entry(form.to_string()).or_default()
    }

    pub fn remove(&mut self, form: &str) -> Option<FormRecord> {
        self.records.remove(form)
    }

    #[must_use]
    pub fn contains(&self, form: &str) -> bool {
        self.records.contains_key(form)
    }
}

/// Mapping from slots to the nodes that fill them.
#[derive(Debug, Clone)]
pub struct Form {
    name: String,
    mapping: Vec<(String, Vec<NodeLabel>)>,
    allowed_repeats: usize,
}

impl Form {
    /// Slots are visited in mapping order.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, mapping: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<NodeLabel>)>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            mapping: mapping
                .into_iter()
                .map(|(slot, nodes)| (slot.into(), nodes))
                .collect(),
            allowed_repeats: 0,
        }
    }

    /// How many times the form may return to an already visited node.
    #[must_use]
    pub const fn with_allowed_repeats(mut self, allowed_repeats: usize) -> Self {
        self.allowed_repeats = allowed_repeats;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn allowed_repeats(&self) -> usize {
        self.allowed_repeats
    }

    pub fn slot_names(&self) -> impl Iterator<Item = &str> {
        self.mapping.iter().map(|(slot, _)| slot.as_str())
    }

    /// Current state; unknown forms and a missing storage read as inactive.
    #[must_use]
    pub fn state(&self, ctx: &Context) -> FormState {
        ctx.form_storage()
            .and_then(|storage| storage.get(&self.name))
            .map_or(FormState::Inactive, |record| record.state)
    }

    /// Label function leading to a node of the first unset slot.
    ///
    /// Yields nothing once every mapped slot is set.
    #[must_use]
    pub fn to_next_label(&self, priority: Option<f32>) -> LabelFn {
        let form = self.clone();
        Arc::new(move |ctx: &mut Context, actor: &Actor| {
            form.next_label(ctx, actor, priority)
        })
    }

    fn next_label(
        &self,
        ctx: &mut Context,
        actor: &Actor,
        priority: Option<f32>,
    ) -> Option<(NodeLabel, f32)> {
        let priority = priority.unwrap_or_else(|| actor.label_priority());
        let registry = actor.registry();

        let (slot, candidates) = self
            .mapping
            .iter()
            .find(|(slot, _)| !is_slot_set(&*ctx, registry, slot))?;

        let Some(storage) = ctx.form_storage_mut() else {
            warn!(
                "Form '{}' cannot track visits: form storage missing",
                self.name
            );
            let label = candidates.choose(&mut rand::thread_rng())?;
            return Some((label.clone(), priority));
        };
        let record = storage.entry(&self.name);

        let allowed: Vec<&NodeLabel> = candidates
            .iter()
            .filter(|label| {
                record.visits.get(*label).copied().unwrap_or(0) <= self.allowed_repeats
            })
            .collect();

        let chosen = if allowed.is_empty() {
            debug!(
                "Form '{}' exhausted repeats for slot '{slot}'",
                self.name
            );
            record.fillable = false;
            candidates.choose(&mut rand::thread_rng())?
        } else {
            allowed.choose(&mut rand::thread_rng()).copied()?
        };

        *record.visits.entry(chosen.clone()).or_insert(0) += 1;
        debug!("Form '{}' asks for '{slot}' at {chosen}", self.name);
        Some((chosen.clone(), priority))
    }

    /// Processing that sets `state`, or recomputes the state when `None`.
    #[must_use]
    pub fn update_form_state(&self, state: Option<FormState>) -> Processing {
        let form = self.clone();
        Arc::new(move |ctx: &mut Context, actor: &Actor| {
            form.update(ctx, actor, state)
        })
    }

    fn update(&self, ctx: &mut Context, actor: &Actor, state: Option<FormState>) -> Result<()> {
        let all_set = self
            .mapping
            .iter()
            .all(|(slot, _)| is_slot_set(&*ctx, actor.registry(), slot));
        let storage = ctx
            .form_storage_mut()
            .ok_or(EngineError::StorageMissing)?;

        if let Some(state) = state {
            storage.entry(&self.name).state = state;
            info!("Form '{}' set to {state:?}", self.name);
            return Ok(());
        }

        if !storage.contains(&self.name) {
            storage.entry(&self.name).state = FormState::Inactive;
            return Ok(());
        }

        let record = storage.entry(&self.name);
        if !record.fillable {
            record.state = FormState::Failed;
        } else if all_set {
            record.state = FormState::Complete;
        }
        debug!("Form '{}' is {:?}", self.name, record.state);
        Ok(())
    }

    /// Processing that forgets the state and visit counts of the form.
    #[must_use]
    pub fn reset(&self) -> Processing {
        let name = self.name.clone();
        Arc::new(move |ctx: &mut Context, _: &Actor| -> Result<()> {
            let storage = ctx
                .form_storage_mut()
                .ok_or(EngineError::StorageMissing)?;
            storage.remove(&name);
            debug!("Form '{name}' reset");
            Ok(())
        })
    }

    /// Condition that holds while the form is active.
    #[must_use]
    pub fn is_active(&self) -> Condition {
        let form = self.clone();
        Arc::new(move |ctx: &Context, _: &Actor| {
            form.state(ctx) == FormState::Active
        })
    }

    /// Stored values of the mapped slots.
    pub fn get_values(&self, ctx: &Context, actor: &Actor) -> Result<Vec<Option<SlotValue>>> {
        let names: Vec<String> = self.mapping.iter().map(|(slot, _)| slot.clone()).collect();
        Ok(get_values(ctx, actor.registry(), Some(&names))?)
    }
}
