// Purpose - getting the mixed tones out of the process

pub mod output;

pub use output::CpalBackend;
