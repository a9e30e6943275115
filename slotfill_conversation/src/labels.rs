//! Label functions relative to the current node.

use std::sync::Arc;

use crate::actor::Actor;
use crate::context::Context;
use crate::script::{LabelFn, NodeLabel};

fn current(ctx: &Context, actor: &Actor) -> NodeLabel {
    ctx.last_label()
        .cloned()
        .unwrap_or_else(|| actor.start_label().clone())
}

/// Stay on the current node.
#[must_use]
pub fn repeat(priority: Option<f32>) -> LabelFn {
    Arc::new(move |ctx: &mut Context, actor: &Actor| {
        Some((
            current(ctx, actor),
            priority.unwrap_or_else(|| actor.label_priority()),
        ))
    })
}

/// Move to the next node of the current flow, wrapping around at the end.
#[must_use]
pub fn forward(priority: Option<f32>) -> LabelFn {
    Arc::new(move |ctx: &mut Context, actor: &Actor| -> Option<(NodeLabel, f32)> {
        let label = current(ctx, actor);
        let next = actor
            .script()
            .flow(&label.flow)?
            .next_node_name(&label.node)?;
        Some((
            NodeLabel::new(label.flow.as_str(), next),
            priority.unwrap_or_else(|| actor.label_priority()),
        ))
    })
}

#[must_use]
pub fn to_fallback(priority: Option<f32>) -> LabelFn {
    Arc::new(move |_: &mut Context, actor: &Actor| {
        Some((
            actor.fallback_label().clone(),
            priority.unwrap_or_else(|| actor.label_priority()),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{Flow, Node, Script};
    use slotfill_core::SlotRegistry;

    #[test]
    fn test_relative_labels() {
        let script = Script::new().with_flow(
            "chitchat",
            Flow::new()
                .with_node("chat_1", Node::new())
                .with_node("chat_2", Node::new()),
        );
        let Ok(actor) = Actor::new(
            script,
            ("chitchat", "chat_1"),
            ("chitchat", "chat_2"),
            Arc::new(SlotRegistry::new()),
        ) else {
            panic!("labels should exist");
        };

        let mut ctx = Context::new();
        let chat_1 = NodeLabel::new("chitchat", "chat_1");
        let chat_2 = NodeLabel::new("chitchat", "chat_2");

        assert_eq!(forward(None)(&mut ctx, &actor), Some((chat_2.clone(), 1.0)));
        ctx.add_label(chat_2.clone());
        assert_eq!(forward(Some(0.9))(&mut ctx, &actor), Some((chat_1, 0.9)));
        assert_eq!(repeat(None)(&mut ctx, &actor), Some((chat_2.clone(), 1.0)));
        assert_eq!(to_fallback(Some(0.1))(&mut ctx, &actor), Some((chat_2, 0.1)));
    }
}
