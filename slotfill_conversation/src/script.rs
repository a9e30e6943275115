//! Dialogue scripts: flows of nodes connected by conditional transitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::actor::Actor;
use crate::context::Context;
use crate::error::Result;

/// Address of a node inside a script.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeLabel {
    pub flow: String,
    pub node: String,
}

impl NodeLabel {
    #[must_use]
    pub fn new(flow: impl Into<String>, node: impl Into<String>) -> Self {
        Self {
            flow: flow.into(),
            node: node.into(),
        }
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.flow, self.node)
    }
}

impl<F: Into<String>, N: Into<String>> From<(F, N)> for NodeLabel {
    fn from((flow, node): (F, N)) -> Self {
        Self::new(flow, node)
    }
}

/// Predicate deciding whether a transition may fire.
pub type Condition = Arc<dyn Fn(&Context, &Actor) -> bool + Send + Sync>;

/// Computes a transition target and its priority at turn time.
pub type LabelFn = Arc<dyn Fn(&mut Context, &Actor) -> Option<(NodeLabel, f32)> + Send + Sync>;

/// Step run on the context before transitions or before the response.
pub type Processing = Arc<dyn Fn(&mut Context, &Actor) -> Result<()> + Send + Sync>;

/// Renders a response from the context.
pub type ResponseFn = Arc<dyn Fn(&Context, &Actor) -> Result<String> + Send + Sync>;

#[derive(Clone)]
pub enum Response {
    Text(String),
    Dynamic(ResponseFn),
}

impl Response {
    pub fn render(&self, ctx: &Context, actor: &Actor) -> Result<String> {
        match self {
            Self::Text(text) => Ok(text.clone()),
            Self::Dynamic(func) => func(ctx, actor),
        }
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

impl From<&str> for Response {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Response {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

#[derive(Clone)]
pub enum Target {
    Label(NodeLabel),
    Function(LabelFn),
}

#[derive(Clone)]
pub struct Transition {
    pub target: Target,
    pub condition: Condition,
    /// Falls back to the actor's label priority when unset.
    pub priority: Option<f32>,
}

impl Transition {
    #[must_use]
    pub fn to(label: impl Into<NodeLabel>, condition: Condition) -> Self {
        Self {
            target: Target::Label(label.into()),
            condition,
            priority: None,
        }
    }

    /// Transition whose target is computed by `label`, which also picks the priority.
    #[must_use]
    pub fn dynamic(label: LabelFn, condition: Condition) -> Self {
        Self {
            target: Target::Function(label),
            condition,
            priority: None,
        }
    }

    #[must_use]
    pub const fn with_priority(mut self, priority: f32) -> Self {
        self.priority = Some(priority);
        self
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match &self.target {
            Target::Label(label) => label.to_string(),
            Target::Function(_) => "<fn>".to_string(),
        };
        f.debug_struct("Transition")
            .field("target", &target)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// One dialogue node. Responses of global and local nodes are ignored.
#[derive(Clone, Default)]
pub struct Node {
    pub response: Option<Response>,
    pub transitions: Vec<Transition>,
    pub pre_transitions_processing: Vec<(String, Processing)>,
    pub pre_response_processing: Vec<(String, Processing)>,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_response(mut self, response: impl Into<Response>) -> Self {
        self.response = Some(response.into());
        self
    }

    #[must_use]
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    #[must_use]
    pub fn with_pre_transitions_processing(
        mut self,
        name: impl Into<String>,
        processing: Processing,
    ) -> Self {
        self.pre_transitions_processing
            .push((name.into(), processing));
        self
    }

    #[must_use]
    pub fn with_pre_response_processing(
        mut self,
        name: impl Into<String>,
        processing: Processing,
    ) -> Self {
        self.pre_response_processing.push((name.into(), processing));
        self
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |procs: &[(String, Processing)]| -> Vec<String> {
            procs.iter().map(|(name, _)| name.clone()).collect()
        };
        f.debug_struct("Node")
            .field("response", &self.response)
            .field("transitions", &self.transitions)
            .field(
                "pre_transitions_processing",
                &names(&self.pre_transitions_processing),
            )
            .field(
                "pre_response_processing",
                &names(&self.pre_response_processing),
            )
            .finish()
    }
}

/// Named group of nodes sharing a local node.
#[derive(Debug, Clone, Default)]
pub struct Flow {
    pub local: Node,
    nodes: Vec<(String, Node)>,
}

impl Flow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_local(mut self, local: Node) -> Self {
        self.local = local;
        self
    }

    /// Add a node; a node with the same name is replaced in place.
    #[must_use]
    pub fn with_node(mut self, name: impl Into<String>, node: Node) -> Self {
        let name = name.into();
        if let Some(slot) = self.nodes.iter_mut().find(|(existing, _)| *existing == name) {
            slot.1 = node;
        } else {
            self.nodes.push((name, node));
        }
        self
    }

    #[must_use]
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, node)| node)
    }

    /// Node declared after `name`, wrapping around to the first one.
    #[must_use]
    pub fn next_node_name(&self, name: &str) -> Option<&str> {
        let index = self.nodes.iter().position(|(existing, _)| existing == name)?;
        self.nodes
            .get((index + 1) % self.nodes.len())
            .map(|(next, _)| next.as_str())
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|(name, _)| name.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Script {
    pub global: Node,
    flows: Vec<(String, Flow)>,
}

impl Script {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_global(mut self, global: Node) -> Self {
        self.global = global;
        self
    }

    #[must_use]
    pub fn with_flow(mut self, name: impl Into<String>, flow: Flow) -> Self {
        let name = name.into();
        if let Some(slot) = self.flows.iter_mut().find(|(existing, _)| *existing == name) {
            slot.1 = flow;
        } else {
            self.flows.push((name, flow));
        }
        self
    }

    #[must_use]
    pub fn flow(&self, name: &str) -> Option<&Flow> {
        self.flows
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, flow)| flow)
    }

    #[must_use]
    pub fn node(&self, label: &NodeLabel) -> Option<&Node> {
        self.flow(&label.flow)?.node(&label.node)
    }

    #[must_use]
    pub fn contains(&self, label: &NodeLabel) -> bool {
        self.node(label).is_some()
    }

    pub fn labels(&self) -> impl Iterator<Item = NodeLabel> + '_ {
        self.flows.iter().flat_map(|(flow_name, flow)| {
            flow.node_names()
                .map(move |node| NodeLabel::new(flow_name.as_str(), node))
        })
    }
}
