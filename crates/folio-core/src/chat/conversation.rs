use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ProfileConfig;
use crate::model::{ChatMessage, Role};

/// How far the conversation has progressed, by message count alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Initial,
    Exploring,
    DeepDive,
    Closing,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Exploring => "exploring",
            Self::DeepDive => "deep_dive",
            Self::Closing => "closing",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 0-2 messages: initial, 3-6: exploring, 7-12: deep dive, 13+: closing.
pub fn analyze_stage(history: &[ChatMessage]) -> Stage {
    match history.len() {
        0..=2 => Stage::Initial,
        3..=6 => Stage::Exploring,
        7..=12 => Stage::DeepDive,
        _ => Stage::Closing,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    CurrentRole,
    Experience,
    Skills,
    Projects,
    Education,
    Achievements,
    Contact,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CurrentRole => "current_role",
            Self::Experience => "experience",
            Self::Skills => "skills",
            Self::Projects => "projects",
            Self::Education => "education",
            Self::Achievements => "achievements",
            Self::Contact => "contact",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interest {
    CloudInfrastructure,
    Frontend,
    Backend,
    AiMl,
    Blockchain,
    SystemDesign,
}

impl Interest {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CloudInfrastructure => "cloud_infrastructure",
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::AiMl => "ai_ml",
            Self::Blockchain => "blockchain",
            Self::SystemDesign => "system_design",
        }
    }
}

impl fmt::Display for Interest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static TOPIC_PATTERNS: LazyLock<Vec<(Topic, Regex)>> = LazyLock::new(|| {
    [
        (Topic::CurrentRole, r"(?i)current|founding\s*engineer"),
        (Topic::Experience, r"(?i)experience|work|job|career"),
        (Topic::Skills, r"(?i)skill|tech|language|framework"),
        (Topic::Projects, r"(?i)project|built|created"),
        (Topic::Education, r"(?i)education|degree|university"),
        (Topic::Achievements, r"(?i)achievement|award|hackathon"),
        (Topic::Contact, r"(?i)contact|email|phone"),
    ]
    .into_iter()
    .map(|(topic, pattern)| (topic, Regex::new(pattern).unwrap()))
    .collect()
});

static INTEREST_PATTERNS: LazyLock<Vec<(Interest, Regex)>> = LazyLock::new(|| {
    [
        (Interest::CloudInfrastructure, r"(?i)aws|cloud|infrastructure"),
        (Interest::Frontend, r"(?i)frontend|react|\bui\b|\bux\b"),
        (Interest::Backend, r"(?i)backend|api|server|database"),
        (Interest::AiMl, r"(?i)\bai\b|machine\s*learning|llm"),
        (Interest::Blockchain, r"(?i)blockchain|web3|crypto"),
        (Interest::SystemDesign, r"(?i)system\s*design|architecture|scale"),
    ]
    .into_iter()
    .map(|(interest, pattern)| (interest, Regex::new(pattern).unwrap()))
    .collect()
});

/// Topic detection over both roles. The owner's employer and school names
/// count as `current_role` and `education` mentions.
#[derive(Debug, Clone, Default)]
pub struct TopicMatcher {
    employer: Option<String>,
    school: Option<String>,
}

impl TopicMatcher {
    pub fn new(profile: &ProfileConfig) -> Self {
        let name = |s: &str| Some(s.trim().to_lowercase()).filter(|s| !s.is_empty());
        Self {
            employer: name(&profile.employer),
            school: profile.school.as_deref().and_then(name),
        }
    }

    pub fn extract(&self, history: &[ChatMessage]) -> BTreeSet<Topic> {
        let mut topics = BTreeSet::new();
        for message in history {
            let content = message.content.to_lowercase();
            for (topic, re) in TOPIC_PATTERNS.iter() {
                if re.is_match(&content) {
                    topics.insert(*topic);
                }
            }
            if self.employer.as_ref().is_some_and(|e| content.contains(e.as_str())) {
                topics.insert(Topic::CurrentRole);
            }
            if self.school.as_ref().is_some_and(|s| content.contains(s.as_str())) {
                topics.insert(Topic::Education);
            }
        }
        topics
    }
}

/// Interests expressed by the visitor; assistant messages are ignored.
pub fn extract_interests(history: &[ChatMessage]) -> BTreeSet<Interest> {
    let mut interests = BTreeSet::new();
    for message in history.iter().filter(|m| m.role == Role::User) {
        for (interest, re) in INTEREST_PATTERNS.iter() {
            if re.is_match(&message.content) {
                interests.insert(*interest);
            }
        }
    }
    interests
}
