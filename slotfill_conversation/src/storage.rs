//! Context-init hooks creating the per-conversation storages.

use std::sync::Arc;
use tracing::debug;

use crate::actor::{Actor, ActorStage};
use crate::context::Context;
use crate::error::Result;

/// Make every conversation of `actor` start with an empty slot storage.
pub fn register_storage(actor: &mut Actor) {
    debug!("Registering slot storage hook");
    actor.add_handler(
        ActorStage::ContextInit,
        Arc::new(|ctx: &mut Context, _: &Actor| -> Result<()> {
            ctx.init_slot_storage();
            Ok(())
        }),
    );
}

/// Same as [`register_storage`] for form states.
pub fn register_form_storage(actor: &mut Actor) {
    debug!("Registering form storage hook");
    actor.add_handler(
        ActorStage::ContextInit,
        Arc::new(|ctx: &mut Context, _: &Actor| -> Result<()> {
            ctx.init_form_storage();
            Ok(())
        }),
    );
}
