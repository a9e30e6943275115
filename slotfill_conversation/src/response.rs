//! Responses rendered from slot values.

use std::sync::Arc;

use crate::actor::Actor;
use crate::context::Context;
use crate::error::Result;
use crate::script::Response;

/// Response that fills `template` with the stored values of `names`
/// (every top-level slot when empty) at render time.
#[must_use]
pub fn fill_template(template: impl Into<String>, names: &[&str]) -> Response {
    let template = template.into();
    let names: Vec<String> = names.iter().map(|name| (*name).to_string()).collect();
    Response::Dynamic(Arc::new(move |ctx: &Context, actor: &Actor| -> Result<String> {
        Ok(slotfill_core::get_filled_template(
            &template,
            ctx,
            actor.registry(),
            Some(&names),
        )?)
    }))
}
