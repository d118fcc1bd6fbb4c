use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::config::IntentRuleConfig;
use crate::error::{FolioError, Result};

/// What a visitor message is asking for. Exactly one per message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    AskExperience,
    AskSkills,
    AskProjects,
    AskSpecificProject,
    AskTechnologyProjects,
    AskEducation,
    AskContact,
    AskAvailability,
    TechnicalQuestion,
    AskAchievements,
    AskCurrentRole,
    AskResume,
    AskRates,
    AskTimeline,
    SmallTalk,
    CasualChat,
    Unknown,
}

impl Intent {
    pub const ALL: [Intent; 18] = [
        Intent::Greeting,
        Intent::AskExperience,
        Intent::AskSkills,
        Intent::AskProjects,
        Intent::AskSpecificProject,
        Intent::AskTechnologyProjects,
        Intent::AskEducation,
        Intent::AskContact,
        Intent::AskAvailability,
        Intent::TechnicalQuestion,
        Intent::AskAchievements,
        Intent::AskCurrentRole,
        Intent::AskResume,
        Intent::AskRates,
        Intent::AskTimeline,
        Intent::SmallTalk,
        Intent::CasualChat,
        Intent::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::AskExperience => "ask_experience",
            Self::AskSkills => "ask_skills",
            Self::AskProjects => "ask_projects",
            Self::AskSpecificProject => "ask_specific_project",
            Self::AskTechnologyProjects => "ask_technology_projects",
            Self::AskEducation => "ask_education",
            Self::AskContact => "ask_contact",
            Self::AskAvailability => "ask_availability",
            Self::TechnicalQuestion => "technical_question",
            Self::AskAchievements => "ask_achievements",
            Self::AskCurrentRole => "ask_current_role",
            Self::AskResume => "ask_resume",
            Self::AskRates => "ask_rates",
            Self::AskTimeline => "ask_timeline",
            Self::SmallTalk => "small_talk",
            Self::CasualChat => "casual_chat",
            Self::Unknown => "unknown",
        }
    }

    /// Intents that pull project data into the context.
    pub fn is_project_related(&self) -> bool {
        matches!(
            self,
            Self::AskProjects | Self::AskSpecificProject | Self::AskTechnologyProjects
        )
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        Intent::ALL
            .iter()
            .find(|i| i.as_str() == s)
            .copied()
            .ok_or_else(|| FolioError::InvalidInput(format!("unknown intent: '{s}'")))
    }
}

/// One row of the classification table: an intent and the patterns that
/// select it. Patterns are case-insensitive.
#[derive(Debug, Clone)]
pub struct IntentRule {
    pub intent: Intent,
    patterns: Vec<Regex>,
}

impl IntentRule {
    pub fn new(intent: Intent, patterns: &[&str]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| compile(p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { intent, patterns })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

/// Literal phrase, anchored on word boundaries where it starts or ends with a
/// word character.
fn keyword_pattern(keyword: &str) -> String {
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let start = if is_word(keyword.chars().next()) { r"\b" } else { "" };
    let end = if is_word(keyword.chars().last()) { r"\b" } else { "" };
    format!("{start}{}{end}", regex::escape(keyword))
}

fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| FolioError::InvalidInput(format!("invalid intent pattern '{pattern}': {e}")))
}

/// Follow-ups like "any other projects?" deliberately land on `unknown`, whose
/// reply points at the full list instead of inventing more work.
static MORE_PROJECTS_RE: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"^(any other|more|what else|anything else)(\s+(project|work))?s?\??$").unwrap(),
        Regex::new(r"^(do you have )?(any other|more|additional)(\s+(project|work))?s?\??$")
            .unwrap(),
    ]
});

/// Built-in table, in evaluation order. Project names are not listed here;
/// they are added from configuration with [`IntentClassifier::with_keywords`].
const BUILTIN_TABLE: &[(Intent, &[&str])] = &[
    (
        Intent::Greeting,
        &[
            r"^(hi|hey|hello|howdy|greetings|yo|sup)[!.\s]*$",
            r"^(good\s+(morning|afternoon|evening|day))[!.\s]*$",
            r"^(hi|hello|hey)\s+there[!.\s]*$",
        ],
    ),
    (
        Intent::AskExperience,
        &[
            r"experience|work|job|career|employment|position|role",
            r"where.*work|what.*do|current.*role",
            r"tell.*about.*work|describe.*experience",
        ],
    ),
    (
        Intent::AskSkills,
        &[
            r"skills|technologies|tech\s+stack|languages|frameworks",
            r"what.*know|what.*use|familiar.*with",
            r"expertise|proficient|competent",
        ],
    ),
    (
        Intent::AskProjects,
        &[
            r"projects|portfolio|built|created|developed",
            r"show.*work|examples|demos",
            r"what.*made|what.*build",
            r"your.*projects|recent.*projects",
        ],
    ),
    (
        Intent::AskSpecificProject,
        &[r"(tell me about|what is|show me|details about)\s+(the\s+|your\s+)?[\w.\s-]+?\s+project\b"],
    ),
    (
        Intent::AskTechnologyProjects,
        &[
            r"(react|nextjs|typescript|rust|python|node|mongodb|blockchain) projects",
            r"projects.*using.*(react|nextjs|typescript|rust|python|node|mongodb)",
            r"built.*with.*(react|nextjs|typescript|rust|python|node|mongodb)",
            r"what.*built.*in.*(react|nextjs|typescript|rust|python|node|mongodb)",
        ],
    ),
    (
        Intent::AskEducation,
        &[
            r"education|degree|university|college|study|qualification",
            r"where.*study|academic|school|cgpa|grades",
        ],
    ),
    (
        Intent::AskContact,
        &[
            r"contact|email|phone|reach|connect|linkedin|github",
            r"how.*contact|get.*touch|message",
            r"what.*email|what.*phone|what.*number",
            r"ur\s+email|ur\s+phone|your\s+email|your\s+phone",
        ],
    ),
    (
        Intent::AskAvailability,
        &[
            r"available|hire|freelance|open.*to|looking|remote",
            r"when.*start|join|opportunity",
        ],
    ),
    (
        Intent::TechnicalQuestion,
        &[
            r"how.*implement|explain|difference.*between|what.*is",
            r"code|algorithm|system.*design|architecture",
            r"best.*practice|optimize|performance",
        ],
    ),
    (
        Intent::AskAchievements,
        &[
            r"achievements|awards|recognition|accomplish|hackathon|won",
            r"proud|notable|highlight",
        ],
    ),
    (
        Intent::AskCurrentRole,
        &[
            r"current|now|present|today|founding.*engineer",
            r"what.*doing.*now|tell.*current",
        ],
    ),
    (
        Intent::AskResume,
        &[r"resume|cv|download|pdf|document", r"send.*resume|share.*cv"],
    ),
    (
        Intent::AskRates,
        &[
            r"rate|rates|cost|pricing|payment|terms|charge|fee|hourly|budget",
            r"how.*much|what.*cost|what.*charge",
            r"payment.*terms|billing|invoice",
        ],
    ),
    (
        Intent::AskTimeline,
        &[
            r"timeline|deadline|timeframe|duration|when.*available|start.*date",
            r"how.*long|estimated.*time|delivery|completion",
            r"availability.*timeline|project.*timeline",
        ],
    ),
    (
        Intent::SmallTalk,
        &[
            r"how.*are.*you|how.*doing|what.*up",
            r"nice|cool|awesome|great|interesting",
            r"thanks|thank.*you|appreciate",
        ],
    ),
    (
        Intent::CasualChat,
        &[
            r"tell.*about.*yourself|who.*are.*you",
            r"introduce|introduction",
        ],
    ),
];

static BUILTIN_RULES: LazyLock<Vec<IntentRule>> = LazyLock::new(|| {
    BUILTIN_TABLE
        .iter()
        .map(|(intent, patterns)| IntentRule::new(*intent, patterns).unwrap())
        .collect()
});

/// Ordered, data-driven intent classifier. The first rule with a matching
/// pattern wins; no match is [`Intent::Unknown`].
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(BUILTIN_RULES.clone())
    }
}

impl IntentClassifier {
    pub fn new(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// Add a whole-phrase alternation of `keywords` to the rule for `intent`,
    /// keeping that rule's position. A rule is appended if none exists.
    pub fn with_keywords(mut self, intent: Intent, keywords: &[String]) -> Self {
        let alternatives: Vec<String> = keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .map(|k| keyword_pattern(&k))
            .collect();
        if alternatives.is_empty() {
            return self;
        }

        let pattern = format!("(?:{})", alternatives.join("|"));
        let re = match compile(&pattern) {
            Ok(re) => re,
            Err(e) => {
                tracing::warn!(%intent, error = %e, "skipping keyword rule");
                return self;
            }
        };

        match self.rules.iter_mut().find(|r| r.intent == intent) {
            Some(rule) => rule.patterns.push(re),
            None => self.rules.push(IntentRule {
                intent,
                patterns: vec![re],
            }),
        }
        self
    }

    /// Names that identify a specific project ("shopwise", "task manager").
    pub fn with_project_names(self, names: &[String]) -> Self {
        self.with_keywords(Intent::AskSpecificProject, names)
    }

    /// Configured rules, evaluated ahead of everything already in the table.
    /// Entries with an unknown intent or an invalid pattern are logged and skipped.
    pub fn with_extra_rules(mut self, extra: &[IntentRuleConfig]) -> Self {
        let mut prepend = Vec::with_capacity(extra.len());
        for rule in extra {
            let parsed = rule
                .intent
                .parse::<Intent>()
                .and_then(|intent| IntentRule::new(intent, &[rule.pattern.as_str()]));
            match parsed {
                Ok(r) => prepend.push(r),
                Err(e) => tracing::warn!("config: chat.extra_rules: {e}"),
            }
        }
        prepend.append(&mut self.rules);
        self.rules = prepend;
        self
    }

    pub fn detect(&self, message: &str) -> Intent {
        let normalized = message.trim().to_lowercase();
        if normalized.is_empty() {
            return Intent::Unknown;
        }

        if MORE_PROJECTS_RE.iter().any(|re| re.is_match(&normalized)) {
            return Intent::Unknown;
        }

        self.rules
            .iter()
            .find(|rule| rule.matches(&normalized))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Unknown)
    }
}
