//! Intent and context engine: classifies each visitor message, reconstructs
//! conversation state from the client-supplied history, and assembles the
//! prompt and suggested actions for a reply.

mod actions;
mod context;
mod conversation;
mod intent;
mod prompt;
mod service;

pub use actions::{generate_action_buttons, Action};
pub use context::{
    extract_project_names, extract_technology, mentions_project, ContextBuilder,
    ConversationContext, ProjectContext, TECH_VOCABULARY,
};
pub use conversation::{analyze_stage, extract_interests, Interest, Stage, Topic, TopicMatcher};
pub use intent::{Intent, IntentClassifier, IntentRule};
pub use prompt::{fallback_reply, generate_dynamic_prompt, project_summary, system_prompt};
pub use service::{ChatService, CHAT_FAILURE_MESSAGE};
