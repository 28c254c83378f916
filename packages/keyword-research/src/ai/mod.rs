//! Reference TextGenerator implementations.
//!
//! Enabled with the `openai` feature.

mod openai;

pub use openai::OpenAiGenerator;
