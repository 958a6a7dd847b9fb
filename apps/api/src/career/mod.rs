//! Career assistant operations built on the index, the LLM client, the ranker
//! and the fallback coordinator.

pub mod assistant;
pub mod core_info;
pub mod courses;
pub mod handlers;
pub mod prompts;
pub mod text;

pub use assistant::{CareerAssistant, CareerSettings};
