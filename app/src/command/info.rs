use slotfill_config::{Config, SlotDef};
use slotfill_core::SlotRegistry;

use super::load_config_or_default;

/// Strategy for displaying configuration information.
///
/// This strategy outputs:
/// - Config file location and logging level
/// - Conversation defaults
/// - Every registered slot path with its kind
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = load_config_or_default();
        let registry = config.build_registry()?;

        println!("=== slotfill Configuration ===\n");

        println!("Config File:");
        match Config::config_path() {
            Ok(path) if path.exists() => println!("  Path: {}", path.display()),
            Ok(path) => println!("  Path: {} (missing, using defaults)", path.display()),
            Err(e) => println!("  Path: unavailable ({e})"),
        }
        println!("  Log Level: {}", config.logging.level);
        println!();

        println!("Conversation:");
        println!("  Label Priority: {}", config.conversation.label_priority);
        println!("  Allowed Repeats: {}", config.conversation.allowed_repeats);
        println!();

        println!("Slot Definitions:");
        if config.slots.is_empty() {
            println!("  (none)");
        }
        for def in &config.slots {
            println!("  {}", describe(def));
        }
        println!();

        print_registry(&registry);
        Ok(())
    }
}

fn describe(def: &SlotDef) -> String {
    match def {
        SlotDef::Regexp {
            name,
            regexp,
            target_group,
        } => format!("{name}: regexp /{regexp}/ group {target_group}"),
        SlotDef::Value { name, value } => match value {
            Some(value) => format!("{name}: value '{value}'"),
            None => format!("{name}: value (unset)"),
        },
        SlotDef::Group { name, children } => {
            format!("{name}: group of {} children", children.len())
        }
    }
}

fn print_registry(registry: &SlotRegistry) {
    println!("Registered Paths ({}):", registry.len());
    for (path, slot) in registry.iter() {
        println!("  {path} [{}]", slot.kind());
    }
}
