//! Run one of the bundled dialogue scripts.

use clap::ValueEnum;
use slotfill_conversation::demo::{form_actor, slot_actor};
use slotfill_conversation::{Actor, Context};
use tracing::info;

use super::load_config_or_default;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Demo {
    /// Username, email and friend's name collected flow by flow
    Slots,
    /// Chit-chat turning into a restaurant booking form
    Form,
}

/// Input parameters for the Chat command strategy.
#[derive(Debug, Clone)]
pub struct ChatInput {
    pub demo: Demo,
    /// Scripted requests; interactive mode when empty
    pub messages: Vec<String>,
}

/// Strategy for executing the Chat command.
#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl super::CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = load_config_or_default();

        let actor: Actor = match input.demo {
            Demo::Slots => slot_actor()?,
            Demo::Form => form_actor(config.conversation.allowed_repeats)?,
        }
        .with_label_priority(config.conversation.label_priority);

        let mut ctx = Context::new();
        info!("Starting {:?} demo, session {}", input.demo, ctx.id);

        if input.messages.is_empty() {
            actor.run_interactive(&mut ctx)?;
        } else {
            for message in &input.messages {
                let response = actor.turn(&mut ctx, message.as_str())?;
                println!("> {message}");
                println!("{response}");
            }
        }

        info!("Dialogue ended after {} turns", ctx.turn_count());
        Ok(())
    }
}
