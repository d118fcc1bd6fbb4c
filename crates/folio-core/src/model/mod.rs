mod chat;
mod project;

pub use chat::*;
pub use project::*;
