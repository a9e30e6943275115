//! One-shot extraction of configured slots.

use serde_json::{Map, json};
use slotfill_core::{SlotContext, SlotSession, extract};
use tracing::info;

use super::load_config_or_default;

/// Input parameters for the Extract command strategy.
#[derive(Debug, Clone)]
pub struct ExtractInput {
    pub message: String,
    /// Slot paths; every top-level slot when empty
    pub slots: Vec<String>,
}

/// Strategy for extracting slots from a single message.
///
/// Prints the extracted values and the resulting slot storage as JSON.
#[derive(Debug, Clone, Copy)]
pub struct ExtractStrategy;

impl super::CommandStrategy for ExtractStrategy {
    type Input = ExtractInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = load_config_or_default();
        let registry = config.build_registry()?;

        let names = if input.slots.is_empty() {
            registry.top_level_names()
        } else {
            input.slots
        };

        let mut session = SlotSession::new();
        session.add_request(input.message);
        let extracted = extract(&mut session, &registry, Some(&names))?;
        info!("Extracted {} slots", extracted.len());

        let mut values = Map::new();
        for (name, value) in names.iter().zip(extracted) {
            values.insert(name.clone(), serde_json::to_value(value)?);
        }

        let output = json!({
            "values": values,
            "storage": session.slot_storage(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
