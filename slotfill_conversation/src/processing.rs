//! Processing steps wrapping the slot operations.
//!
//! An empty `names` list selects every top-level registered slot.

use std::sync::Arc;
use tracing::debug;

use crate::actor::Actor;
use crate::context::Context;
use crate::error::Result;
use crate::script::{Processing, Response};

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

/// Extract the named slots from the latest request into the slot storage.
#[must_use]
pub fn extract(names: &[&str]) -> Processing {
    let names = owned(names);
    Arc::new(move |ctx: &mut Context, actor: &Actor| -> Result<()> {
        let values = slotfill_core::extract(ctx, actor.registry(), Some(&names))?;
        debug!("Extracted {} slot values", values.len());
        Ok(())
    })
}

/// Reset the named slots to unset.
#[must_use]
pub fn unset(names: &[&str]) -> Processing {
    let names = owned(names);
    Arc::new(move |ctx: &mut Context, actor: &Actor| -> Result<()> {
        slotfill_core::unset(ctx, actor.registry(), Some(&names))?;
        Ok(())
    })
}

/// Fill the pending text response with stored slot values.
///
/// Dynamic responses are left alone.
#[must_use]
pub fn fill_template(names: &[&str]) -> Processing {
    let names = owned(names);
    Arc::new(move |ctx: &mut Context, actor: &Actor| -> Result<()> {
        let Some(Response::Text(template)) = ctx.pending_response() else {
            return Ok(());
        };
        let template = template.clone();
        let filled =
            slotfill_core::get_filled_template(&template, &*ctx, actor.registry(), Some(&names))?;
        if let Some(response) = ctx.pending_response_mut() {
            *response = Response::Text(filled);
        }
        Ok(())
    })
}
