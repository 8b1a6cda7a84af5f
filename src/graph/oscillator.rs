use crate::dsp::oscillator::OscillatorBlock;
use crate::graph::node::{GraphNode, RenderCtx};

/*
Reference Oscillator
====================

A sine wave is the purest tone there is: a single frequency with no
harmonics. That makes it the easiest signal to tune against. When two
sines sit a few hertz apart you hear the difference as a slow "beating"
(a periodic swell in loudness), and tuning by ear means turning the peg
until the beating slows down and disappears.

The node follows the pitch in the RenderCtx, so the voice that owns it
decides the frequency.
*/

pub struct OscNode {
    osc: OscillatorBlock,
}

impl OscNode {
    pub fn sine() -> Self {
        Self {
            osc: OscillatorBlock::sine(),
        }
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.osc.render(out, ctx);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        // Start every tone at a zero crossing
        self.osc.reset();
    }
}
