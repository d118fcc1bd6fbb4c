use std::fmt;

use serde::Serialize;

use super::context::ConversationContext;
use super::conversation::{Stage, Topic};
use super::intent::Intent;

/// A follow-up button offered with a reply. Serialized as its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Action {
    #[serde(rename = "View All Projects")]
    ViewAllProjects,
    #[serde(rename = "GitHub Profile")]
    GithubProfile,
    #[serde(rename = "View Live Demo")]
    ViewLiveDemo,
    #[serde(rename = "View Code")]
    ViewCode,
    #[serde(rename = "Download Resume")]
    DownloadResume,
    #[serde(rename = "Send Email for Resume")]
    SendEmailForResume,
    #[serde(rename = "LinkedIn Profile")]
    LinkedinProfile,
    #[serde(rename = "Send Email")]
    SendEmail,
    #[serde(rename = "See Project Examples")]
    SeeProjectExamples,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ViewAllProjects => "View All Projects",
            Self::GithubProfile => "GitHub Profile",
            Self::ViewLiveDemo => "View Live Demo",
            Self::ViewCode => "View Code",
            Self::DownloadResume => "Download Resume",
            Self::SendEmailForResume => "Send Email for Resume",
            Self::LinkedinProfile => "LinkedIn Profile",
            Self::SendEmail => "Send Email",
            Self::SeeProjectExamples => "See Project Examples",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Suggested follow-ups for a turn, first occurrence kept.
pub fn generate_action_buttons(ctx: &ConversationContext) -> Vec<Action> {
    let mut actions = Vec::new();
    let projects_discussed = ctx.has_topic(Topic::Projects);

    if matches!(ctx.intent, Intent::AskProjects | Intent::AskSpecificProject) || projects_discussed {
        actions.extend([Action::ViewAllProjects, Action::GithubProfile]);
    }

    if ctx.intent == Intent::AskSpecificProject {
        if let Some(project) = ctx
            .project_data
            .as_ref()
            .and_then(|d| d.requested_project.as_ref())
        {
            if project.has_live_link() {
                actions.push(Action::ViewLiveDemo);
            }
            actions.push(Action::ViewCode);
        }
    }

    if ctx.intent == Intent::AskResume || ctx.stage == Stage::DeepDive {
        actions.extend([Action::DownloadResume, Action::SendEmailForResume]);
    }

    if ctx.intent == Intent::AskContact || ctx.stage == Stage::Closing {
        actions.extend([
            Action::LinkedinProfile,
            Action::SendEmail,
            Action::DownloadResume,
        ]);
    }

    if ctx.intent == Intent::AskSkills && !projects_discussed {
        actions.push(Action::SeeProjectExamples);
    }

    if ctx.intent == Intent::AskExperience || ctx.has_topic(Topic::Experience) {
        actions.push(Action::DownloadResume);
    }

    let mut seen = Vec::with_capacity(actions.len());
    actions.retain(|a| {
        if seen.contains(a) {
            false
        } else {
            seen.push(*a);
            true
        }
    });
    actions
}
