//! Background render jobs that report back through the broadcast bus.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::{RenderError, RenderRequest, Renderer};
use crate::chat::Broadcaster;

/// Posted when a render starts.
pub const RENDERING_NOTICE: &str = "* rendering ascii…";

/// Chat line describing a failed render.
pub fn error_message(error: &RenderError) -> String {
    format!("* ascii error: {}", error)
}

/// Render `request` on its own task.
///
/// Returns immediately. The task posts [`RENDERING_NOTICE`], then either the
/// rendered message or an error line, on `bus`. Aborting the returned handle
/// cancels the render; nothing further is posted.
pub fn spawn_render(
    renderer: Arc<Renderer>,
    bus: Broadcaster,
    request: RenderRequest,
    display_width: Option<u32>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        bus.send(RENDERING_NOTICE).await;

        let message = match renderer.render(&request, display_width).await {
            Ok(result) => result.message(),
            Err(e) => {
                log::warn!("Render of {} failed: {}", request.source, e);
                error_message(&e)
            }
        };
        bus.send(message).await;
    })
}
