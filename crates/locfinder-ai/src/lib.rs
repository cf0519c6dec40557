//! Text generation for locfinder's location insights.

pub mod client;
pub mod mock;
pub mod prompt;

pub use client::{GeminiClient, TextGenerator};
pub use mock::MockTextGenerator;
pub use prompt::{build_prompt, LOCATION_STEREOTYPE_PROMPT};
