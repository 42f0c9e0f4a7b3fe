//! Prompt templates for the strategist and planner stages

pub mod embedded;
mod loader;

pub use loader::{PromptContext, PromptLoader};
