use anyhow::Context;
use serde::{Deserialize, Serialize};
use slotfill_core::{GroupSlot, Slot, SlotRegistry, ValueSlot};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
    #[serde(default)]
    pub slots: Vec<SlotDef>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConversationConfig {
    /// Priority of transitions that do not carry their own.
    #[serde(default = "ConversationConfig::default_label_priority")]
    pub label_priority: f32,
    /// How many times a form may revisit one node before it gives up.
    #[serde(default)]
    pub allowed_repeats: usize,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            label_priority: Self::default_label_priority(),
            allowed_repeats: 0,
        }
    }
}

impl ConversationConfig {
    const fn default_label_priority() -> f32 {
        1.0
    }
}

/// Declarative slot definition.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SlotDef {
    Regexp {
        name: String,
        regexp: String,
        #[serde(default)]
        target_group: usize,
    },
    Value {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    Group {
        name: String,
        children: Vec<SlotDef>,
    },
}

impl SlotDef {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Regexp { name, .. } | Self::Value { name, .. } | Self::Group { name, .. } => name,
        }
    }

    /// Build the slot tree, validating names and patterns.
    pub fn build(&self) -> slotfill_core::Result<Slot> {
        match self {
            Self::Regexp {
                name,
                regexp,
                target_group,
            } => Ok(ValueSlot::regexp(name.as_str(), regexp)?
                .with_target_group(*target_group)
                .into()),
            Self::Value { name, value } => {
                let slot = ValueSlot::new(name.as_str())?;
                Ok(match value {
                    Some(value) => slot.with_value(value.as_str()),
                    None => slot,
                }
                .into())
            }
            Self::Group { name, children } => {
                let children = children
                    .iter()
                    .map(Self::build)
                    .collect::<slotfill_core::Result<Vec<_>>>()?;
                Ok(GroupSlot::new(name.as_str(), children)?.into())
            }
        }
    }
}

const CONFIG_TEMPLATE: &str = r#"{
  "logging": {
    "level": "info"
  },
  "conversation": {
    "label_priority": 1.0,
    "allowed_repeats": 0
  },
  "slots": [
    {
      "type": "group",
      "name": "person",
      "children": [
        { "type": "regexp", "name": "username", "regexp": "username is ([a-zA-Z]+)", "target_group": 1 },
        { "type": "regexp", "name": "email", "regexp": "email is ([a-z@.A-Z]+)", "target_group": 1 }
      ]
    },
    {
      "type": "group",
      "name": "friend",
      "children": [
        { "type": "regexp", "name": "first_name", "regexp": "^[A-Z][a-z]+" },
        { "type": "regexp", "name": "last_name", "regexp": " ([A-Z][a-z]+)", "target_group": 1 }
      ]
    }
  ]
}"#;

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("slotfill"))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'slotfill init' to create config.",
                config_path.display()
            );
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_json(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// The configuration `slotfill init` writes, slots included.
    pub fn builtin() -> anyhow::Result<Self> {
        Self::from_json(CONFIG_TEMPLATE).context("Built-in config template is invalid")
    }

    /// Build a registry holding every configured slot tree.
    pub fn build_registry(&self) -> anyhow::Result<SlotRegistry> {
        let mut registry = SlotRegistry::new();
        for def in &self.slots {
            let slot = def
                .build()
                .with_context(|| format!("Invalid slot definition '{}'", def.name()))?;
            registry.register(slot);
        }
        info!(
            "Built slot registry: {} slots, {} paths",
            self.slots.len(),
            registry.len()
        );
        Ok(registry)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, CONFIG_TEMPLATE)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Edit the slot definitions to match your script");
        println!("   2. Run 'slotfill info' to list the registered slot paths");
        println!("   3. Run 'slotfill extract -m \"my username is groot\"' to try them");
        println!();
        println!("🔧 Configuration options:");
        println!("   - slots: regexp, value and group definitions (groups nest)");
        println!("   - conversation.allowed_repeats: node revisits allowed in forms");
        println!("   - logging.level: default log level when RUST_LOG is unset");
        println!();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_template_is_valid_config() {
        let config = Config::from_json(CONFIG_TEMPLATE).expect("template should parse");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.slots.len(), 2);

        let registry = config.build_registry().expect("template slots should build");
        assert!(registry.contains("person/username"));
        assert!(registry.contains("friend/last_name"));
        assert_eq!(registry.len(), 6);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_builtin_config_carries_template_slots() {
        let config = Config::builtin().expect("built-in config should parse");
        let names: Vec<&str> = config.slots.iter().map(SlotDef::name).collect();
        assert_eq!(names, vec!["person", "friend"]);
        assert!(!config.build_registry().expect("slots should build").is_empty());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_defaults_apply_to_empty_config() {
        let config = Config::from_json("{}").expect("empty object should parse");
        assert_eq!(config.logging.level, "info");
        assert!((config.conversation.label_priority - 1.0).abs() < f32::EPSILON);
        assert_eq!(config.conversation.allowed_repeats, 0);
        assert!(config.slots.is_empty());
    }

    #[test]
    fn test_invalid_definitions_are_rejected() {
        let bad_name = SlotDef::Value {
            name: "a/b".to_string(),
            value: None,
        };
        assert!(bad_name.build().is_err());

        let bad_regex = SlotDef::Group {
            name: "group".to_string(),
            children: vec![SlotDef::Regexp {
                name: "broken".to_string(),
                regexp: "(unclosed".to_string(),
                target_group: 0,
            }],
        };
        assert!(bad_regex.build().is_err());

        let config = Config {
            slots: vec![bad_regex],
            ..Config::default()
        };
        assert!(config.build_registry().is_err());
    }
}
