use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::conversation::{analyze_stage, extract_interests, Interest, Stage, Topic, TopicMatcher};
use super::intent::{Intent, IntentClassifier};
use crate::config::FolioConfig;
use crate::model::{ChatMessage, ProjectRecord, ProjectStats};
use crate::projects::query::{self, normalize_name};
use crate::projects::{ProjectCatalog, ProjectSource};

/// Technologies recognised in a message when next to a trigger phrase.
pub const TECH_VOCABULARY: &[&str] = &[
    "react",
    "nextjs",
    "next.js",
    "typescript",
    "javascript",
    "node.js",
    "nodejs",
    "python",
    "rust",
    "mongodb",
    "mysql",
    "postgresql",
    "postgres",
    "redis",
    "docker",
    "aws",
    "blockchain",
    "ethereum",
    "microservices",
    "api",
];

/// Shortest normalized known name that counts as a mention.
const MIN_MENTION_CHARS: usize = 4;

/// Words after "tell me about" / "what is" that never name a project.
const PHRASE_STOPWORDS: &[&str] = &[
    "the", "your", "a", "an", "my", "this", "that", "these", "those", "our", "its", "some",
    "any", "all", "one", "what", "how", "best", "project", "projects",
];

static PROJECT_PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:tell me about|what is|show me|details about)\s+([a-z][a-z\s]*)").unwrap()
});

/// First content word after a "tell me about X" style trigger, if it is long
/// enough to stand for a project name.
fn phrase_candidate(lower: &str) -> Option<String> {
    let captured = PROJECT_PHRASE_RE.captures(lower)?.get(1)?.as_str();
    captured
        .split_whitespace()
        .find(|w| !PHRASE_STOPWORDS.contains(w))
        .filter(|w| w.chars().count() >= MIN_MENTION_CHARS)
        .map(str::to_string)
}

/// Project data attached to a context when the turn is about projects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContext {
    pub all_projects: Vec<ProjectRecord>,
    pub featured_projects: Vec<ProjectRecord>,
    pub project_stats: ProjectStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_project: Option<ProjectRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_projects: Option<Vec<ProjectRecord>>,
}

/// Per-turn snapshot derived from history plus the current message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContext {
    pub intent: Intent,
    pub stage: Stage,
    pub topics_discussed: BTreeSet<Topic>,
    pub user_interests: BTreeSet<Interest>,
    /// Number of messages the context was derived from.
    pub message_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_data: Option<ProjectContext>,
}

impl ConversationContext {
    pub fn has_topic(&self, topic: Topic) -> bool {
        self.topics_discussed.contains(&topic)
    }
}

/// Whether the message names one of `names`, ignoring case, spaces, hyphens
/// and underscores.
pub fn mentions_project(message: &str, names: &[String]) -> bool {
    let normalized = normalize_name(message);
    names.iter().any(|name| {
        let name = normalize_name(name);
        name.chars().count() >= MIN_MENTION_CHARS && normalized.contains(&name)
    })
}

/// Candidate project names in the message, most specific first: the
/// "tell me about X" phrase, then any known name it mentions.
pub fn extract_project_names(message: &str, names: &[String]) -> Vec<String> {
    let lower = message.to_lowercase();
    let mut candidates = Vec::new();

    if let Some(captured) = phrase_candidate(&lower) {
        candidates.push(captured);
    }

    let normalized = normalize_name(&lower);
    for name in names {
        let key = normalize_name(name);
        if key.chars().count() >= MIN_MENTION_CHARS
            && normalized.contains(&key)
            && !candidates.contains(name)
        {
            candidates.push(name.clone());
        }
    }
    candidates
}

/// First vocabulary technology that sits next to a trigger phrase:
/// "<tech> project", "projects using <tech>", "built with <tech>",
/// "<tech> development" or "work with <tech>".
pub fn extract_technology(message: &str) -> Option<&'static str> {
    let lower = message.to_lowercase();
    TECH_VOCABULARY.iter().copied().find(|tech| {
        [
            format!("{tech} project"),
            format!("projects using {tech}"),
            format!("built with {tech}"),
            format!("{tech} development"),
            format!("work with {tech}"),
        ]
        .iter()
        .any(|phrase| lower.contains(phrase.as_str()))
    })
}

/// Composes intent, stage, topics and interests, and pulls project data from
/// the catalog when the turn is about projects.
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    classifier: IntentClassifier,
    topics: TopicMatcher,
    project_keywords: Vec<String>,
}

impl ContextBuilder {
    pub fn new(
        classifier: IntentClassifier,
        topics: TopicMatcher,
        project_keywords: Vec<String>,
    ) -> Self {
        Self {
            classifier,
            topics,
            project_keywords,
        }
    }

    /// Built-in rules plus configured extra rules, project keywords and the
    /// owner's employer name.
    pub fn from_config(config: &FolioConfig) -> Self {
        let employer: Vec<String> = Some(config.profile.employer.clone())
            .filter(|e| !e.trim().is_empty())
            .into_iter()
            .collect();
        let classifier = IntentClassifier::default()
            .with_extra_rules(&config.chat.extra_rules)
            .with_project_names(&config.chat.project_keywords)
            .with_keywords(Intent::AskCurrentRole, &employer);

        Self::new(
            classifier,
            TopicMatcher::new(&config.profile),
            config.chat.project_keywords.clone(),
        )
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    /// `history` includes the current message as its last entry. A catalog
    /// failure leaves `project_data` empty; it is never an error.
    pub async fn build<S: ProjectSource>(
        &self,
        history: &[ChatMessage],
        message: &str,
        catalog: &ProjectCatalog<S>,
    ) -> ConversationContext {
        let mut intent = self.classifier.detect(message);
        let stage = analyze_stage(history);
        let topics_discussed = self.topics.extract(history);
        let user_interests = extract_interests(history);

        let mut known = self.project_keywords.clone();
        known.extend(catalog.cached_names().await);

        let technology = extract_technology(message);
        let wants_projects = intent.is_project_related()
            || topics_discussed.contains(&Topic::Projects)
            || mentions_project(message, &known)
            || technology.is_some();

        let mut project_data = None;
        if wants_projects {
            match catalog.try_projects().await {
                Ok(all_projects) => {
                    let mut data = ProjectContext {
                        featured_projects: query::featured(&all_projects),
                        project_stats: query::stats(&all_projects),
                        requested_project: None,
                        related_projects: None,
                        all_projects,
                    };

                    for p in &data.all_projects {
                        known.push(p.title.clone());
                        known.push(p.repo_name().to_string());
                    }
                    let requested = extract_project_names(message, &known)
                        .iter()
                        .find_map(|name| query::find_by_name(&data.all_projects, name).cloned());
                    if let Some(project) = requested {
                        tracing::debug!(project = %project.title, "resolved requested project");
                        data.requested_project = Some(project);
                        intent = Intent::AskSpecificProject;
                    }

                    if let Some(tech) = technology {
                        let related = query::by_technology(&data.all_projects, tech);
                        if !related.is_empty() {
                            tracing::debug!(tech, count = related.len(), "resolved related projects");
                            data.related_projects = Some(related);
                            intent = Intent::AskTechnologyProjects;
                        }
                    }

                    project_data = Some(data);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "project data unavailable for chat context");
                }
            }
        }

        ConversationContext {
            intent,
            stage,
            topics_discussed,
            user_interests,
            message_count: history.len(),
            project_data,
        }
    }
}
