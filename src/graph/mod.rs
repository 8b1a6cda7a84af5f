//! Composable building blocks for tone voices.
//!
//! Graph nodes wrap the DSP primitives with note events and block-based
//! rendering. A reference voice is a sine oscillator amplified by a gain
//! envelope:
//!
//! ```ignore
//! let voice = OscNode::sine().amplify(EnvNode::new(ToneShape::PLUCK));
//! ```

/// Multiply two signals together (amplitude control).
pub mod amplify;
/// Envelope node exposing the gain envelope.
pub mod envelope;
/// Fluent combinators (`.amplify()`).
pub mod extensions;
/// Core traits shared by all graph nodes.
pub mod node;
/// Audio-band sine oscillator.
pub mod oscillator;

pub use node::{GraphNode, RenderCtx};
