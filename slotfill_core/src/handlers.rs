//! Turn-level slot operations over a conversation context.
//!
//! `names` arguments take qualified paths (`person/username`). `None` or an
//! empty list selects every top-level registered slot.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::context::{SlotContext, SlotStorage};
use crate::error::{Result, SlotError};
use crate::registry::SlotRegistry;
use crate::slot::{GroupValue, SEPARATOR, Slot, SlotValue, join_path};
use crate::template;

fn target_names(registry: &SlotRegistry, names: Option<&[String]>) -> Vec<String> {
    match names {
        Some(names) if !names.is_empty() => names.to_vec(),
        _ => registry.top_level_names(),
    }
}

/// Extract the requested slots from the latest request.
///
/// Values are stored under their qualified paths; a group stores every
/// descendant leaf rather than one composite entry. The result is aligned
/// with the requested names, unknown names yielding `None`.
pub fn extract<C>(
    ctx: &mut C,
    registry: &SlotRegistry,
    names: Option<&[String]>,
) -> Result<Vec<Option<SlotValue>>>
where
    C: SlotContext + ?Sized,
{
    let targets = target_names(registry, names);
    let input = ctx.last_request().unwrap_or_default().to_string();
    let Some(storage) = ctx.slot_storage_mut() else {
        warn!("Failed to extract slot values: storage missing");
        return Err(SlotError::StorageMissing);
    };

    let mut results = Vec::with_capacity(targets.len());
    for name in targets {
        let Some(slot) = registry.get(&name) else {
            debug!("Slot '{name}' is not registered");
            results.push(None);
            continue;
        };
        match slot {
            Slot::Value(leaf) => {
                let value = leaf.evaluate(&input);
                storage.insert(name.as_str(), value.clone());
                results.push(value.map(SlotValue::Text));
            }
            Slot::Group(group) => {
                let mut composite = GroupValue::new();
                for (relative, leaf) in group.leaves() {
                    let value = leaf.evaluate(&input);
                    composite.insert(leaf.name().to_string(), value.clone());
                    storage.insert(join_path(&name, &relative), value);
                }
                results.push(Some(SlotValue::Group(composite)));
            }
        }
    }

    Ok(results)
}

/// Values of already extracted slots.
///
/// Names that were never extracted are omitted, so the result can be shorter
/// than `names`. Extracted-but-unset leaves yield `None`.
pub fn get_values<C>(
    ctx: &C,
    registry: &SlotRegistry,
    names: Option<&[String]>,
) -> Result<Vec<Option<SlotValue>>>
where
    C: SlotContext + ?Sized,
{
    let storage = ctx.slot_storage().ok_or(SlotError::StorageMissing)?;
    Ok(target_names(registry, names)
        .iter()
        .filter_map(|name| stored_value(storage, registry, name))
        .collect())
}

fn stored_value(
    storage: &SlotStorage,
    registry: &SlotRegistry,
    name: &str,
) -> Option<Option<SlotValue>> {
    if let Some(Slot::Group(group)) = registry.get(name) {
        let leaves = group.leaves();
        let extracted = leaves
            .iter()
            .all(|(relative, _)| storage.contains(&join_path(name, relative)));
        if !extracted {
            return None;
        }
        let composite = leaves
            .iter()
            .map(|(relative, leaf)| {
                let value = storage.value(&join_path(name, relative));
                (leaf.name().to_string(), value.map(str::to_string))
            })
            .collect();
        return Some(Some(SlotValue::Group(composite)));
    }
    storage
        .get(name)
        .map(|value| value.clone().map(SlotValue::Text))
}

/// Whether `name` (a leaf, or every leaf of a group) holds a value.
pub fn is_slot_set<C>(ctx: &C, registry: &SlotRegistry, name: &str) -> bool
where
    C: SlotContext + ?Sized,
{
    let Some(storage) = ctx.slot_storage() else {
        return false;
    };
    match registry.get(name) {
        Some(Slot::Group(group)) => group
            .leaves()
            .iter()
            .all(|(relative, _)| storage.is_set(&join_path(name, relative))),
        _ => storage.is_set(name),
    }
}

/// Fill `template` with stored values of the requested slots.
///
/// A group fills its placeholders only once all of its leaves are set.
pub fn get_filled_template<C>(
    template: &str,
    ctx: &C,
    registry: &SlotRegistry,
    names: Option<&[String]>,
) -> Result<String>
where
    C: SlotContext + ?Sized,
{
    let candidates: Vec<(&str, &Slot)> = match names {
        Some(names) if !names.is_empty() => registry
            .iter()
            .filter(|(path, _)| names.iter().any(|name| name.as_str() == *path))
            .collect(),
        _ => registry
            .iter()
            .filter(|(path, _)| !path.contains(SEPARATOR))
            .collect(),
    };

    if candidates.is_empty() {
        let requested = names.map_or_else(|| "None".to_string(), |names| names.join(", "));
        return Err(SlotError::EmptyIntersection(requested));
    }

    let storage = ctx.slot_storage().ok_or(SlotError::StorageMissing)?;
    let values: BTreeMap<String, &str> = candidates
        .into_iter()
        .filter_map(|(path, slot)| stored_values(path, slot, storage))
        .flatten()
        .collect();
    let filled = template::fill(template, |name| values.get(name).copied());

    let unresolved = template::placeholders(&filled);
    if !unresolved.is_empty() {
        debug!("Unresolved placeholders: {}", unresolved.join(", "));
    }

    Ok(filled)
}

/// Qualified path and value of every leaf of `slot`, or `None` unless all are set.
fn stored_values<'a>(
    path: &str,
    slot: &Slot,
    storage: &'a SlotStorage,
) -> Option<Vec<(String, &'a str)>> {
    slot.leaves()
        .iter()
        .map(|(relative, _)| {
            let qualified = join_path(path, relative);
            storage.value(&qualified).map(|value| (qualified, value))
        })
        .collect()
}

/// Reset the stored values of the requested slots to unset.
pub fn unset<C>(ctx: &mut C, registry: &SlotRegistry, names: Option<&[String]>) -> Result<()>
where
    C: SlotContext + ?Sized,
{
    let targets = target_names(registry, names);
    let storage = ctx.slot_storage_mut().ok_or(SlotError::StorageMissing)?;

    for name in targets {
        let Some(slot) = registry.get(&name) else {
            debug!("Cannot unset '{name}': slot is not registered");
            continue;
        };
        for (relative, _) in slot.leaves() {
            storage.insert(join_path(&name, &relative), None);
        }
    }
    Ok(())
}
