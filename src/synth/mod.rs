// Purpose: Voice lifecycle and mixing on the audio thread
// This layer sits above graph nodes and below the tone engine

pub mod message;
pub mod mixer;
pub mod shape;
pub mod voice;

pub use message::{ToneMessage, VoiceId};
pub use mixer::ToneMixer;
pub use shape::ToneShape;
