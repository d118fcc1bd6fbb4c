use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{FolioError, Result};
use crate::model::{ChatMessage, Role};

/// Chat completion against one configured provider (Ollama, OpenAI, Gemini
/// or Anthropic). Sends the system prompt, the trimmed history and the
/// assembled turn prompt; returns the assistant text.
pub struct LlmService {
    provider: LlmProvider,
    config: LlmConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for LlmService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmService")
            .field("provider", &self.provider)
            .field("model", &self.config.model)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LlmProvider {
    Ollama,
    OpenAI,
    Gemini,
    Anthropic,
}

impl LlmService {
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let provider = match config.provider.as_str() {
            "ollama" => LlmProvider::Ollama,
            "openai" => LlmProvider::OpenAI,
            "gemini" => LlmProvider::Gemini,
            "anthropic" | "claude" => LlmProvider::Anthropic,
            other => {
                return Err(FolioError::Config(format!(
                    "unknown LLM provider: '{other}' (expected 'ollama', 'openai', 'gemini', or 'anthropic')"
                )));
            }
        };

        match provider {
            LlmProvider::OpenAI => {
                resolve_api_key(config, "OPENAI_API_KEY")?;
            }
            LlmProvider::Gemini => {
                resolve_api_key(config, "GEMINI_API_KEY")?;
            }
            LlmProvider::Anthropic => {
                resolve_api_key(config, "ANTHROPIC_API_KEY")?;
            }
            LlmProvider::Ollama => {}
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FolioError::Config(format!("failed to build LLM HTTP client: {e}")))?;

        Ok(Self {
            provider,
            config: config.clone(),
            client,
        })
    }

    /// `"openai/gpt-4o-mini"`, for logs and the health endpoint.
    pub fn describe(&self) -> String {
        format!("{}/{}", self.config.provider, self.config.model)
    }

    /// One assistant turn: `history` is prior conversation, `prompt` the
    /// context-enriched user message for this turn.
    pub async fn chat(&self, system: &str, history: &[ChatMessage], prompt: &str) -> Result<String> {
        tracing::debug!(
            provider = ?self.provider,
            history = history.len(),
            prompt_chars = prompt.len(),
            "LLM chat request"
        );
        let text = match self.provider {
            LlmProvider::Ollama => self.chat_ollama(system, history, prompt).await,
            LlmProvider::OpenAI => self.chat_openai(system, history, prompt).await,
            LlmProvider::Gemini => self.chat_gemini(system, history, prompt).await,
            LlmProvider::Anthropic => self.chat_anthropic(system, history, prompt).await,
        }?;

        let text = text.trim();
        if text.is_empty() {
            return Err(FolioError::Llm("LLM returned an empty reply".into()));
        }
        Ok(text.to_string())
    }

    async fn post_json(
        &self,
        name: &str,
        req: reqwest::RequestBuilder,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let resp = req
            .json(body)
            .send()
            .await
            .map_err(|e| FolioError::Llm(format!("{name} request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(FolioError::Llm(format!("{name} error {status}: {text}")));
        }

        resp.json()
            .await
            .map_err(|e| FolioError::Llm(format!("{name} response parse error: {e}")))
    }

    /// Ollama: POST {base_url}/api/chat
    async fn chat_ollama(&self, system: &str, history: &[ChatMessage], prompt: &str) -> Result<String> {
        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("http://localhost:11434");
        let url = format!("{}/api/chat", base_url.trim_end_matches('/'));

        let body = self.ollama_body(system, history, prompt);
        let json = self.post_json("Ollama", self.client.post(&url), &body).await?;

        json["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| FolioError::Llm("Ollama response missing message content".into()))
    }

    fn ollama_body(&self, system: &str, history: &[ChatMessage], prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "messages": openai_messages(system, history, prompt),
            "stream": false,
            "options": {
                "num_predict": self.config.max_tokens,
                "temperature": self.config.temperature,
            }
        })
    }

    /// OpenAI: POST {base_url}/v1/chat/completions
    async fn chat_openai(&self, system: &str, history: &[ChatMessage], prompt: &str) -> Result<String> {
        let api_key = resolve_api_key(&self.config, "OPENAI_API_KEY")?;
        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("https://api.openai.com");
        let url = format!("{}/v1/chat/completions", base_url.trim_end_matches('/'));

        let body = self.openai_body(system, history, prompt);
        let req = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"));
        let json = self.post_json("OpenAI", req, &body).await?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| FolioError::Llm("OpenAI response missing content".into()))
    }

    fn openai_body(&self, system: &str, history: &[ChatMessage], prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "messages": openai_messages(system, history, prompt),
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        })
    }

    /// Anthropic: POST {base_url}/v1/messages
    async fn chat_anthropic(&self, system: &str, history: &[ChatMessage], prompt: &str) -> Result<String> {
        let api_key = resolve_api_key(&self.config, "ANTHROPIC_API_KEY")?;
        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("https://api.anthropic.com");
        let url = format!("{}/v1/messages", base_url.trim_end_matches('/'));

        let body = self.anthropic_body(system, history, prompt);
        let req = self
            .client
            .post(&url)
            .header("x-api-key", &api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json");
        let json = self.post_json("Anthropic", req, &body).await?;

        // {"content": [{"type": "text", "text": "..."}]}
        json["content"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| FolioError::Llm("Anthropic response missing text content".into()))
    }

    fn anthropic_body(&self, system: &str, history: &[ChatMessage], prompt: &str) -> serde_json::Value {
        let mut messages: Vec<serde_json::Value> = history
            .iter()
            .map(|m| serde_json::json!({"role": m.role.to_string(), "content": m.content}))
            .collect();
        messages.push(serde_json::json!({"role": "user", "content": prompt}));

        serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": system,
            "messages": messages,
        })
    }

    /// Gemini: POST {base_url}/v1beta/models/{model}:generateContent
    async fn chat_gemini(&self, system: &str, history: &[ChatMessage], prompt: &str) -> Result<String> {
        let api_key = resolve_api_key(&self.config, "GEMINI_API_KEY")?;
        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("https://generativelanguage.googleapis.com");
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            base_url.trim_end_matches('/'),
            self.config.model,
            api_key,
        );

        let body = self.gemini_body(system, history, prompt);
        let json = self.post_json("Gemini", self.client.post(&url), &body).await?;

        json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| FolioError::Llm("Gemini response missing text".into()))
    }

    fn gemini_body(&self, system: &str, history: &[ChatMessage], prompt: &str) -> serde_json::Value {
        let mut contents: Vec<serde_json::Value> = history
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                };
                serde_json::json!({"role": role, "parts": [{"text": m.content}]})
            })
            .collect();
        contents.push(serde_json::json!({"role": "user", "parts": [{"text": prompt}]}));

        serde_json::json!({
            "contents": contents,
            "systemInstruction": {"parts": [{"text": system}]},
            "generationConfig": {
                "maxOutputTokens": self.config.max_tokens,
                "temperature": self.config.temperature,
            }
        })
    }
}

/// System message, then history, then the turn prompt as the last user message.
fn openai_messages(system: &str, history: &[ChatMessage], prompt: &str) -> Vec<serde_json::Value> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(serde_json::json!({"role": "system", "content": system}));
    for m in history {
        messages.push(serde_json::json!({"role": m.role.to_string(), "content": m.content}));
    }
    messages.push(serde_json::json!({"role": "user", "content": prompt}));
    messages
}

/// Resolve an API key from config, a custom env var, or a default env var.
fn resolve_api_key(config: &LlmConfig, default_env_var: &str) -> Result<String> {
    if let Some(ref key) = config.api_key {
        if !key.is_empty() {
            return Ok(key.clone());
        }
    }

    let env_var_name = config.env_var.as_deref().unwrap_or(default_env_var);

    std::env::var(env_var_name).map_err(|_| {
        FolioError::Config(format!(
            "{} LLM provider requires an API key (set llm.api_key or {})",
            config.provider, env_var_name
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(provider: &str) -> LlmService {
        let config = LlmConfig {
            enabled: true,
            provider: provider.into(),
            model: "test-model".into(),
            api_key: Some("sk-test".into()),
            max_tokens: 512,
            ..Default::default()
        };
        LlmService::from_config(&config).unwrap()
    }

    fn history() -> Vec<ChatMessage> {
        vec![
            ChatMessage::user("Hi"),
            ChatMessage::assistant("Hello! Ask me anything."),
        ]
    }

    #[test]
    fn test_from_config_ollama() {
        let config = LlmConfig {
            enabled: true,
            provider: "ollama".into(),
            model: "llama3.2".into(),
            ..Default::default()
        };
        assert!(LlmService::from_config(&config).is_ok());
    }

    #[test]
    fn test_from_config_unknown_provider() {
        let config = LlmConfig {
            provider: "banana".into(),
            ..Default::default()
        };
        let result = LlmService::from_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unknown LLM provider"));
    }

    #[test]
    fn test_from_config_openai_without_key_errors() {
        let config = LlmConfig {
            provider: "openai".into(),
            api_key: None,
            env_var: Some("FOLIO_TEST_MISSING_OPENAI_KEY".into()),
            ..Default::default()
        };
        let result = LlmService::from_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key"));
    }

    #[test]
    fn test_from_config_anthropic_without_key_errors() {
        let config = LlmConfig {
            provider: "anthropic".into(),
            api_key: None,
            env_var: Some("FOLIO_TEST_MISSING_ANTHROPIC_KEY".into()),
            ..Default::default()
        };
        assert!(LlmService::from_config(&config).is_err());
    }

    #[test]
    fn test_claude_alias() {
        assert_eq!(service("claude").provider, LlmProvider::Anthropic);
    }

    #[test]
    fn test_resolve_api_key_custom_env_var() {
        std::env::set_var("FOLIO_TEST_LLM_KEY", "from-env");
        let config = LlmConfig {
            provider: "gemini".into(),
            api_key: None,
            env_var: Some("FOLIO_TEST_LLM_KEY".into()),
            ..Default::default()
        };
        assert_eq!(resolve_api_key(&config, "GEMINI_API_KEY").unwrap(), "from-env");
        std::env::remove_var("FOLIO_TEST_LLM_KEY");
    }

    #[test]
    fn test_resolve_api_key_empty_config_key_falls_through() {
        let config = LlmConfig {
            api_key: Some(String::new()),
            env_var: Some("FOLIO_TEST_UNSET_KEY".into()),
            ..Default::default()
        };
        assert!(resolve_api_key(&config, "UNUSED").is_err());
    }

    #[test]
    fn test_openai_body_message_order() {
        let body = service("openai").openai_body("SYSTEM", &history(), "PROMPT");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "SYSTEM");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[2]["role"], "assistant");
        assert_eq!(messages[3]["content"], "PROMPT");
        assert_eq!(body["max_tokens"], 512);
    }

    #[test]
    fn test_ollama_body() {
        let body = service("ollama").ollama_body("SYSTEM", &[], "PROMPT");
        assert_eq!(body["stream"], false);
        assert_eq!(body["options"]["num_predict"], 512);
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_anthropic_body_system_separate() {
        let body = service("anthropic").anthropic_body("SYSTEM", &history(), "PROMPT");
        assert_eq!(body["system"], "SYSTEM");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[2]["content"], "PROMPT");
    }

    #[test]
    fn test_gemini_body_roles() {
        let body = service("gemini").gemini_body("SYSTEM", &history(), "PROMPT");
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["parts"][0]["text"], "PROMPT");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "SYSTEM");
    }

    #[test]
    fn test_debug_hides_key() {
        let rendered = format!("{:?}", service("openai"));
        assert!(!rendered.contains("sk-test"));
        assert!(rendered.contains("test-model"));
    }

    #[test]
    fn test_describe() {
        assert_eq!(service("openai").describe(), "openai/test-model");
    }
}
