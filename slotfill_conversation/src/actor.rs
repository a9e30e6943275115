//! Dialogue actor: runs one script turn by turn over a [`Context`].

use slotfill_core::SlotRegistry;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::context::Context;
use crate::error::{EngineError, Result};
use crate::script::{Node, NodeLabel, Processing, Script, Target, Transition};

/// Points of a turn where handlers can be attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorStage {
    /// After the request is recorded, before anything else.
    ContextInit,
    PreTransitionsProcessing,
    PreResponseProcessing,
    /// Before the pending response is rendered.
    CreateResponse,
}

/// Hook run at an [`ActorStage`].
pub type Handler = Processing;

/// Script runner.
///
/// The slot registry is frozen when the actor is built; scripts read it
/// through [`Actor::registry`].
pub struct Actor {
    script: Script,
    start_label: NodeLabel,
    fallback_label: NodeLabel,
    label_priority: f32,
    handlers: HashMap<ActorStage, Vec<Handler>>,
    registry: Arc<SlotRegistry>,
}

impl Actor {
    /// Create an actor; both labels must name nodes of `script`.
    pub fn new(
        script: Script,
        start_label: impl Into<NodeLabel>,
        fallback_label: impl Into<NodeLabel>,
        registry: Arc<SlotRegistry>,
    ) -> Result<Self> {
        let start_label = start_label.into();
        let fallback_label = fallback_label.into();
        for label in [&start_label, &fallback_label] {
            if !script.contains(label) {
                return Err(EngineError::UnknownLabel(label.clone()));
            }
        }

        info!(
            "Creating actor: start {start_label}, fallback {fallback_label}, {} slot paths",
            registry.len()
        );

        Ok(Self {
            script,
            start_label,
            fallback_label,
            label_priority: 1.0,
            handlers: HashMap::new(),
            registry,
        })
    }

    /// Priority of transitions that do not set one.
    #[must_use]
    pub const fn with_label_priority(mut self, priority: f32) -> Self {
        self.label_priority = priority;
        self
    }

    pub fn add_handler(&mut self, stage: ActorStage, handler: Handler) {
        self.handlers.entry(stage).or_default().push(handler);
    }

    #[must_use]
    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn script(&self) -> &Script {
        &self.script
    }

    #[must_use]
    pub const fn label_priority(&self) -> f32 {
        self.label_priority
    }

    #[must_use]
    pub const fn start_label(&self) -> &NodeLabel {
        &self.start_label
    }

    #[must_use]
    pub const fn fallback_label(&self) -> &NodeLabel {
        &self.fallback_label
    }

    /// Process one user request and return the response.
    pub fn turn(&self, ctx: &mut Context, request: impl Into<String>) -> Result<String> {
        ctx.add_request(request);
        self.run_handlers(ActorStage::ContextInit, ctx)?;

        let previous = ctx
            .last_label()
            .filter(|label| self.script.contains(label))
            .cloned()
            .unwrap_or_else(|| self.start_label.clone());
        debug!("Turn {} from {previous}", ctx.turn_count() + 1);

        self.run_handlers(ActorStage::PreTransitionsProcessing, ctx)?;
        for node in self.scopes(&previous) {
            Self::run_processing(&node.pre_transitions_processing, ctx, self)?;
        }

        let next = self.next_label(ctx, &previous);
        ctx.add_label(next.clone());

        let response = self.script.node(&next).and_then(|node| node.response.clone());
        ctx.set_pending_response(response);

        self.run_handlers(ActorStage::PreResponseProcessing, ctx)?;
        for node in self.scopes(&next) {
            Self::run_processing(&node.pre_response_processing, ctx, self)?;
        }

        self.run_handlers(ActorStage::CreateResponse, ctx)?;
        let response = match ctx.take_pending_response() {
            Some(response) => response.render(ctx, self)?,
            None => String::new(),
        };

        info!("Turn {} answered from {next}", ctx.turn_count() + 1);
        ctx.add_response(response.clone());
        Ok(response)
    }

    /// Global, local and own node of `label`, in that order.
    fn scopes(&self, label: &NodeLabel) -> Vec<&Node> {
        let mut scopes = vec![&self.script.global];
        if let Some(flow) = self.script.flow(&label.flow) {
            scopes.push(&flow.local);
            if let Some(node) = flow.node(&label.node) {
                scopes.push(node);
            }
        }
        scopes
    }

    /// Highest-priority true transition of the node, local and global scopes.
    ///
    /// Ties go to the narrower scope, then to the earlier transition.
    fn next_label(&self, ctx: &mut Context, previous: &NodeLabel) -> NodeLabel {
        let mut best: Option<(NodeLabel, f32)> = None;
        for node in self.scopes(previous).into_iter().rev() {
            for transition in &node.transitions {
                let Some((label, priority)) = self.resolve(transition, ctx) else {
                    continue;
                };
                if !self.script.contains(&label) {
                    warn!("Ignoring transition to unknown node {label}");
                    continue;
                }
                if best.as_ref().is_none_or(|(_, top)| priority > *top) {
                    best = Some((label, priority));
                }
            }
        }

        best.map_or_else(
            || {
                debug!("No transition fired, falling back to {}", self.fallback_label);
                self.fallback_label.clone()
            },
            |(label, _)| label,
        )
    }

    fn resolve(&self, transition: &Transition, ctx: &mut Context) -> Option<(NodeLabel, f32)> {
        if !(transition.condition)(ctx, self) {
            return None;
        }
        match &transition.target {
            Target::Label(label) => Some((
                label.clone(),
                transition.priority.unwrap_or(self.label_priority),
            )),
            Target::Function(func) => func(ctx, self),
        }
    }

    fn run_handlers(&self, stage: ActorStage, ctx: &mut Context) -> Result<()> {
        for handler in self.handlers.get(&stage).into_iter().flatten() {
            handler(ctx, self)?;
        }
        Ok(())
    }

    fn run_processing(
        steps: &[(String, Processing)],
        ctx: &mut Context,
        actor: &Self,
    ) -> Result<()> {
        for (name, step) in steps {
            step(ctx, actor).map_err(|source| EngineError::Processing {
                name: name.clone(),
                source: Box::new(source),
            })?;
        }
        Ok(())
    }

    /// Run an interactive dialogue loop.
    ///
    /// Reads requests from stdin and prints responses until `exit`, `quit`
    /// or `q`.
    pub fn run_interactive(&self, ctx: &mut Context) -> Result<()> {
        println!("=== Dialogue Session: {} ===", ctx.id);
        println!("Type 'exit', 'quit', or Ctrl+C to end the session.\n");

        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let mut input = String::new();
            if std::io::stdin().read_line(&mut input)? == 0 {
                break;
            }
            let input = input.trim();

            if matches!(input, "exit" | "quit" | "q") {
                println!("\nSession ended. Total turns: {}", ctx.turn_count());
                break;
            }

            if input.is_empty() {
                continue;
            }

            match self.turn(ctx, input) {
                Ok(response) => println!("\n{response}\n"),
                Err(e) => eprintln!("Error: {e}"),
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actor")
            .field("start_label", &self.start_label)
            .field("fallback_label", &self.fallback_label)
            .field("label_priority", &self.label_priority)
            .field("slot_paths", &self.registry.len())
            .finish_non_exhaustive()
    }
}
