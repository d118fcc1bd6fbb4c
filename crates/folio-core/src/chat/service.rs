use std::sync::Arc;

use super::actions::generate_action_buttons;
use super::context::{ContextBuilder, ConversationContext};
use super::prompt::{fallback_reply, generate_dynamic_prompt, system_prompt};
use crate::config::{FolioConfig, ProfileConfig};
use crate::error::Result;
use crate::llm::LlmService;
use crate::model::{trim_history, ChatMessage, ChatReply};
use crate::projects::{ProjectCatalog, ProjectSource};

/// Shown to the visitor when a turn fails.
pub const CHAT_FAILURE_MESSAGE: &str = "Sorry, I couldn't process that right now. Please try again.";

/// One chat turn end to end: trim, classify, enrich, prompt, reply, suggest.
pub struct ChatService<S> {
    builder: ContextBuilder,
    catalog: Arc<ProjectCatalog<S>>,
    llm: Option<LlmService>,
    profile: ProfileConfig,
    github_url: String,
    system_prompt: String,
    history_limit: usize,
}

impl<S: ProjectSource> ChatService<S> {
    pub fn new(
        config: &FolioConfig,
        catalog: Arc<ProjectCatalog<S>>,
        llm: Option<LlmService>,
    ) -> Self {
        let github_url = config.profile.github_url(&config.github.username);
        Self {
            builder: ContextBuilder::from_config(config),
            catalog,
            llm,
            system_prompt: system_prompt(&config.profile, &github_url),
            profile: config.profile.clone(),
            github_url,
            history_limit: config.chat.history_limit,
        }
    }

    pub fn llm(&self) -> Option<&LlmService> {
        self.llm.as_ref()
    }

    pub fn catalog(&self) -> &ProjectCatalog<S> {
        &self.catalog
    }

    pub fn builder(&self) -> &ContextBuilder {
        &self.builder
    }

    /// Context for `query` given prior `history`, without producing a reply.
    pub async fn context(&self, query: &str, history: &[ChatMessage]) -> ConversationContext {
        let mut messages = history.to_vec();
        messages.push(ChatMessage::user(query));
        self.builder.build(&messages, query, &self.catalog).await
    }

    /// Produce the assistant reply for `query`. Only an LLM failure is an error;
    /// missing project data degrades the context instead.
    ///
    /// Stage, topics and interests come from the full history; only the LLM
    /// sees the trimmed window.
    pub async fn respond(&self, query: &str, history: &[ChatMessage]) -> Result<ChatReply> {
        let ctx = self.context(query, history).await;
        let trimmed = trim_history(history, self.history_limit);
        tracing::info!(
            intent = %ctx.intent,
            stage = %ctx.stage,
            history = history.len(),
            sent = trimmed.len(),
            projects = ctx.project_data.is_some(),
            "chat turn"
        );

        let message = match &self.llm {
            Some(llm) => {
                let prompt = generate_dynamic_prompt(query, &ctx, &self.profile, &self.github_url);
                llm.chat(&self.system_prompt, &trimmed, &prompt)
                    .await
                    .inspect_err(|e| tracing::error!(error = %e, "LLM chat failed"))?
            }
            None => fallback_reply(&ctx, &self.profile, &self.github_url),
        };

        let suggested_actions = generate_action_buttons(&ctx)
            .into_iter()
            .map(|a| a.label().to_string())
            .collect();

        Ok(ChatReply {
            message,
            suggested_actions,
        })
    }
}
