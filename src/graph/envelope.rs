use crate::{
    dsp::envelope::Envelope,
    graph::node::{GraphNode, RenderCtx},
    synth::shape::ToneShape,
};

/// Graph wrapper around the gain envelope.
pub struct EnvNode {
    env: Envelope,
}

impl EnvNode {
    pub fn new(shape: ToneShape) -> Self {
        Self {
            env: Envelope::new(shape),
        }
    }

    /// Replace the shape used by the next note-on.
    pub fn set_shape(&mut self, shape: ToneShape) {
        self.env.set_shape(shape);
    }

    pub fn reset(&mut self) {
        self.env.reset();
    }
}

impl GraphNode for EnvNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        self.env.render(out);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.env.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.env.note_off(ctx);
    }

    fn is_active(&self) -> bool {
        self.env.is_active()
    }
}
