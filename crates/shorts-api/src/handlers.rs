//! Request handlers.

pub mod health;
pub mod jobs;
pub mod tts;

pub use health::*;
pub use jobs::*;
pub use tts::*;
