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

//! Slot filling for dialogue scripts.
//!
//! Slots are declared as trees of [`ValueSlot`] leaves and [`GroupSlot`]
//! groups, registered into a [`SlotRegistry`] under qualified paths
//! (`person/username`), extracted from user input every turn and substituted
//! into response templates.

pub mod conditions;
pub mod context;
pub mod error;
pub mod flatten;
pub mod handlers;
pub mod registry;
pub mod slot;
pub mod template;

pub use conditions::{SetMode, SlotCondition, all_set, any_set, is_set};
pub use context::{SlotContext, SlotSession, SlotStorage};
pub use error::{Result, SlotError};
pub use flatten::{FlattenedTree, flatten_slot_tree};
pub use handlers::{extract, get_filled_template, get_values, is_slot_set, unset};
pub use registry::SlotRegistry;
pub use slot::{Extractor, GroupSlot, GroupValue, SEPARATOR, Slot, SlotFn, SlotValue, ValueSlot};
