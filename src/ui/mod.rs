//! Terminal UI: transcript rendering and choice prompts

pub mod prompt;
pub mod render;

pub use prompt::{Choice, Prompt, ScriptedPrompt, TerminalPrompt};
