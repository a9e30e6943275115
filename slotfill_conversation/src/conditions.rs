//! Transition conditions: request matching and slot set-state checks.

use regex::Regex;
use slotfill_core::{SlotCondition, SlotContext};
use std::sync::Arc;

use crate::actor::Actor;
use crate::context::Context;
use crate::error::Result;
use crate::script::Condition;

#[must_use]
pub fn always() -> Condition {
    Arc::new(|_: &Context, _: &Actor| true)
}

/// True when the latest request equals `text`.
#[must_use]
pub fn exact_match(text: impl Into<String>) -> Condition {
    let text = text.into();
    Arc::new(move |ctx: &Context, _: &Actor| ctx.last_request() == Some(text.as_str()))
}

/// True when `pattern` matches the latest request.
pub fn regexp(pattern: &str) -> Result<Condition> {
    let regex = Regex::new(pattern)?;
    Ok(Arc::new(move |ctx: &Context, _: &Actor| {
        ctx.last_request().is_some_and(|request| regex.is_match(request))
    }))
}

#[must_use]
pub fn negation(condition: Condition) -> Condition {
    Arc::new(move |ctx: &Context, actor: &Actor| !condition(ctx, actor))
}

fn from_slot_condition(condition: SlotCondition) -> Condition {
    Arc::new(move |ctx: &Context, actor: &Actor| condition.evaluate(ctx, actor.registry()))
}

/// True when every named slot is set. Groups count as set once all their leaves are.
#[must_use]
pub fn all_set(names: &[&str]) -> Condition {
    from_slot_condition(slotfill_core::all_set(names.iter().copied()))
}

#[must_use]
pub fn any_set(names: &[&str]) -> Condition {
    from_slot_condition(slotfill_core::any_set(names.iter().copied()))
}

/// Set-state condition selected by exactly one of `use_all` and `use_any`.
pub fn is_set(names: &[&str], use_all: bool, use_any: bool) -> Result<Condition> {
    let condition = slotfill_core::is_set(names.iter().copied(), use_all, use_any)?;
    Ok(from_slot_condition(condition))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::script::{Flow, Node, Script};
    use slotfill_core::{SlotRegistry, ValueSlot};

    fn actor() -> Actor {
        let mut registry = SlotRegistry::new();
        for name in ["username", "email"] {
            if let Ok(slot) = ValueSlot::new(name) {
                registry.register(slot);
            }
        }
        let script = Script::new().with_flow("root", Flow::new().with_node("start", Node::new()));
        match Actor::new(script, ("root", "start"), ("root", "start"), Arc::new(registry)) {
            Ok(actor) => actor,
            Err(e) => panic!("invalid test actor: {e}"),
        }
    }

    #[test]
    fn test_request_conditions() {
        let actor = actor();
        let mut ctx = Context::new();
        ctx.add_request("Start please");

        assert!(exact_match("Start please")(&ctx, &actor));
        assert!(!exact_match("start")(&ctx, &actor));
        let Ok(starts) = regexp(r"^[sS]tart") else {
            panic!("pattern should compile");
        };
        assert!(starts(&ctx, &actor));
        assert!(!negation(starts)(&ctx, &actor));
        assert!(matches!(regexp("(open"), Err(EngineError::InvalidPattern(_))));
    }

    #[test]
    fn test_slot_conditions() {
        let actor = actor();
        let mut ctx = Context::new();
        ctx.init_slot_storage();
        if let Some(storage) = ctx.slot_storage_mut() {
            storage.insert("username", Some("groot".to_string()));
            storage.insert("email", None);
        }

        assert!(all_set(&["username"])(&ctx, &actor));
        assert!(!all_set(&["username", "email"])(&ctx, &actor));
        assert!(any_set(&["username", "email"])(&ctx, &actor));
        assert!(matches!(
            is_set(&["username"], true, true),
            Err(EngineError::Slot(_))
        ));
    }
}
