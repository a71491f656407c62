use crate::coords::Viewport;
use crate::paint::Color;

use super::{RenderCtx, RenderTarget};

/// One frame of the window backend.
///
/// The frame has already been cleared to black when a scene sees it, so a
/// scene that draws nothing presents a blank frame.
pub struct Canvas<'a> {
    pub ctx: RenderCtx<'a>,
    pub target: RenderTarget<'a>,
}

impl<'a> Canvas<'a> {
    pub fn new(ctx: RenderCtx<'a>, target: RenderTarget<'a>) -> Self {
        Self { ctx, target }
    }

    /// Logical size of the drawable area.
    pub fn viewport(&self) -> Viewport {
        self.ctx.viewport
    }

    /// Fills the whole frame with `color`.
    pub fn clear(&mut self, color: Color) {
        clear_pass(self.target.encoder, self.target.color_view, color, "diorama canvas clear");
    }
}

/// Records a render pass that only clears `view`.
pub(crate) fn clear_pass(
    encoder: &mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    color: Color,
    label: &str,
) {
    let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(color.to_wgpu()),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });
}
