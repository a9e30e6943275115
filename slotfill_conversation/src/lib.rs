#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Dialogue actor with slot filling.
//!
//! This crate runs scripts of flows and nodes turn by turn and wires the
//! slot operations of `slotfill_core` into them.
//!
//! # Key Features
//! - Lifecycle stages for context-init and processing hooks
//! - Priority-based transitions with a fallback node
//! - Processing, response and condition adapters for slots
//! - Form policy sequencing the nodes that fill a set of slots

pub mod actor;
pub mod conditions;
pub mod context;
pub mod demo;
pub mod error;
pub mod form;
pub mod labels;
pub mod processing;
pub mod response;
pub mod script;
pub mod storage;

pub use actor::{Actor, ActorStage, Handler};
pub use context::Context;
pub use error::{EngineError, Result};
pub use form::{Form, FormRecord, FormState, FormStorage};
pub use script::{
    Condition, Flow, LabelFn, Node, NodeLabel, Processing, Response, ResponseFn, Script, Target,
    Transition,
};
pub use storage::{register_form_storage, register_storage};
