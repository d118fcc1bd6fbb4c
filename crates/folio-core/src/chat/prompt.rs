//! Prompt templates. Everything project-specific is rendered from
//! `ConversationContext::project_data`; the templates themselves carry no
//! project names.

use std::fmt::Write as _;

use super::context::ConversationContext;
use super::conversation::Topic;
use super::intent::Intent;
use crate::config::ProfileConfig;
use crate::model::ProjectRecord;

const GENERIC_README: &str =
    "This project showcases modern development practices with a robust architecture.";

/// First `max` characters, with "..." when something was cut.
fn excerpt(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str("...");
    out
}

/// Deterministic variant choice: the same history length picks the same phrase.
fn pick<'a>(variants: &[&'a str], ctx: &ConversationContext) -> &'a str {
    variants[ctx.message_count % variants.len()]
}

fn first_name(profile: &ProfileConfig) -> &str {
    profile.name.split_whitespace().next().unwrap_or(&profile.name)
}

fn project_detail(project: &ProjectRecord) -> String {
    let mut out = format!(
        "**{}** is one of my key projects! {}\n\n**Tech Stack:** {}\n\n{}\n\n",
        project.title,
        project.description,
        project.technologies.join(", "),
        if project.readme_preview.is_empty() {
            GENERIC_README
        } else {
            project.readme_preview.as_str()
        }
    );
    if let Some(link) = project.link.as_deref().filter(|l| !l.is_empty()) {
        let _ = writeln!(out, "Live Demo: {link}");
    }
    let _ = write!(out, "GitHub: {}", project.github);
    out
}

/// Project block for the prompt, or `None` when the context carries no
/// project data.
pub fn project_summary(ctx: &ConversationContext) -> Option<String> {
    let data = ctx.project_data.as_ref()?;

    if let Some(project) = &data.requested_project {
        return Some(format!(
            "{}\n\nWhat specific aspect would you like to know more about?",
            project_detail(project)
        ));
    }

    if let Some(related) = data.related_projects.as_ref().filter(|r| !r.is_empty()) {
        let list = related
            .iter()
            .take(3)
            .map(|p| {
                let demo = p
                    .link
                    .as_deref()
                    .filter(|l| !l.is_empty())
                    .map(|l| format!(" ([Live Demo]({l}))"))
                    .unwrap_or_default();
                format!("• **{}**: {}{demo}", p.title, excerpt(&p.description, 100))
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        return Some(format!(
            "Here are my projects using that technology:\n\n{list}\n\nWould you like details about any specific project?"
        ));
    }

    if !data.featured_projects.is_empty() {
        let list = data
            .featured_projects
            .iter()
            .take(3)
            .map(|p| {
                format!(
                    "• **{}** - {} - {}",
                    p.title,
                    p.technologies
                        .iter()
                        .take(3)
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(", "),
                    excerpt(&p.description, 80)
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        return Some(format!(
            "Here are some of my key projects:\n\n{list}\n\nWant to dive deeper into any of these or see more projects?"
        ));
    }

    Some(
        "I've built several interesting projects across different technologies. What type of project interests you most?"
            .to_string(),
    )
}

/// Templated answer for the detected intent. Used as response guidance in the
/// prompt and as the reply itself when no LLM is configured.
pub fn fallback_reply(ctx: &ConversationContext, profile: &ProfileConfig, github_url: &str) -> String {
    let name = first_name(profile);
    let data = ctx.project_data.as_ref();

    match ctx.intent {
        Intent::Greeting => {
            let variants = [
                format!("Hey there! 👋 I'm {name}. How can I help you today?"),
                "Hi! Welcome to my portfolio. What would you like to know about my work?".to_string(),
                format!("Hello! I'm {name}, great to connect with you. What brings you here?"),
                "Hey! Thanks for stopping by. Interested in hearing about my projects or experience?"
                    .to_string(),
            ];
            variants[ctx.message_count % variants.len()].clone()
        }

        Intent::AskExperience => {
            let mut reply = format!("Right now I'm working as {}.", profile.current_role);
            if !profile.previous_roles.is_empty() {
                let _ = write!(reply, " Before that: {}.", profile.previous_roles.join("; "));
            }
            reply.push_str(" Want to hear more about any specific role?");
            reply
        }

        Intent::AskSkills => format!(
            "I work across the full stack. Core skills: {}. Any particular area you'd like to dive deeper into?",
            profile.skills.join(", ")
        ),

        Intent::AskProjects => match data.filter(|d| !d.featured_projects.is_empty()) {
            Some(d) => {
                let summary = d
                    .featured_projects
                    .iter()
                    .take(3)
                    .map(|p| {
                        format!(
                            "• **{}** - {} - {}",
                            p.title,
                            p.technologies
                                .iter()
                                .take(3)
                                .cloned()
                                .collect::<Vec<_>>()
                                .join(", "),
                            excerpt(&p.description, 100)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                format!(
                    "Here are my key projects ({} total on GitHub):\n\n{summary}\n\nThese are the main ones I've been working on. Want to dive deeper into any of these?",
                    d.all_projects.len()
                )
            }
            None => format!(
                "I don't have project data available right now, but you can check my GitHub at {github_url} for all my projects."
            ),
        },

        Intent::AskSpecificProject => match data.and_then(|d| d.requested_project.as_ref()) {
            Some(project) => format!(
                "{}\n\nWhat specific aspect would you like to know more about - the technical implementation, challenges faced, or features?",
                project_detail(project)
            ),
            None => "I'd love to tell you about that project! Could you specify which one you're interested in?"
                .to_string(),
        },

        Intent::AskTechnologyProjects => {
            match data.and_then(|d| d.related_projects.as_ref()).filter(|r| !r.is_empty()) {
                Some(related) => {
                    let list = related
                        .iter()
                        .take(3)
                        .map(|p| format!("• **{}**: {}", p.title, excerpt(&p.description, 120)))
                        .collect::<Vec<_>>()
                        .join("\n\n");
                    format!(
                        "Here are my projects using that technology:\n\n{list}\n\nWould you like details about any specific project or see the live demos?"
                    )
                }
                None => format!(
                    "I use various technologies across my projects. What specific technology are you curious about? I work with {}, and more.",
                    profile.skills.iter().take(5).cloned().collect::<Vec<_>>().join(", ")
                ),
            }
        }

        Intent::AskEducation => format!("I studied {}.", profile.education),

        Intent::AskContact => {
            let mut reply = format!("Sure! Here's how you can reach me:\n\nEmail: {}\n", profile.email);
            if let Some(linkedin) = &profile.linkedin {
                let _ = writeln!(reply, "LinkedIn: {linkedin}");
            }
            let _ = writeln!(reply, "GitHub: {github_url}");
            if let Some(youtube) = &profile.youtube {
                let _ = writeln!(reply, "YouTube: {youtube}");
            }
            reply.push_str("\nFeel free to reach out anytime! What's the best way for us to connect?");
            reply
        }

        Intent::AskAvailability => format!(
            "{}! I'm particularly interested in roles where I can work on scalable systems and make a real impact. What kind of opportunity did you have in mind?",
            profile
                .availability
                .as_deref()
                .unwrap_or("Yes, I'm open to exciting opportunities")
        ),

        Intent::TechnicalQuestion => "That's a great technical question! Could you be more specific about what aspect you'd like me to explain? I can share my experience and approach."
            .to_string(),

        Intent::AskAchievements => {
            if profile.achievements.is_empty() {
                "I'm proud of the production systems I've shipped. Want to hear about one of them?".to_string()
            } else {
                format!("A few highlights: {}.", profile.achievements.join("; "))
            }
        }

        Intent::AskCurrentRole => format!(
            "I'm currently {}. It's been an incredible journey building from scratch!",
            profile.current_role
        ),

        Intent::AskResume => {
            let download = match &profile.resume_url {
                Some(url) => format!("You can download it directly from {url}"),
                None => "You can download it from my portfolio using the Resume button".to_string(),
            };
            format!(
                "I'd be happy to share my resume! {download}, or I can send it to you via email at {}. Which would you prefer?",
                profile.email
            )
        }

        Intent::AskRates => format!(
            "For rates and payment terms, I typically work on a project or hourly basis depending on the engagement. I'm flexible on payment terms, milestone-based or monthly invoicing. Let's connect via email at {} to discuss your specific needs and budget!",
            profile.email
        ),

        Intent::AskTimeline => "I can typically start within 1-2 weeks. Project timelines depend on scope and complexity; I've delivered MVPs in 4-6 weeks and full-scale systems in 2-3 months. What's your target timeline and key deliverables?"
            .to_string(),

        Intent::SmallTalk => pick(
            &[
                "I'm doing great, thanks for asking! Excited to chat with you about tech and opportunities.",
                "All good here! Been working on some interesting challenges lately. How about you?",
                "Doing well! Always happy to connect with fellow tech enthusiasts.",
            ],
            ctx,
        )
        .to_string(),

        Intent::CasualChat => format!(
            "I'm {}, {}. Currently {}. What would you like to know specifically?",
            profile.name,
            profile.headline.to_lowercase(),
            profile.current_role
        ),

        Intent::Unknown => match data.filter(|_| ctx.has_topic(Topic::Projects)) {
            Some(d) => format!(
                "Those are the main projects I have on GitHub ({} total). You can explore them all at {github_url}.\n\nWould you like me to tell you more about any specific project, or are you interested in something else like my experience or technical skills?",
                d.all_projects.len()
            ),
            None => pick(
                &[
                    "Interesting question! Could you elaborate a bit? I can share about my experience, projects, skills, or anything else you'd like to know.",
                    "I'd be happy to help! Are you looking to know about my technical background, current work, or something else?",
                    "Great question! Feel free to ask about my current work, technical skills, projects, or availability for opportunities.",
                ],
                ctx,
            )
            .to_string(),
        },
    }
}

/// Per-turn instructions sent as the final user message to the LLM.
pub fn generate_dynamic_prompt(
    message: &str,
    ctx: &ConversationContext,
    profile: &ProfileConfig,
    github_url: &str,
) -> String {
    let topics = if ctx.topics_discussed.is_empty() {
        "none".to_string()
    } else {
        ctx.topics_discussed
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut prompt = format!(
        "You are {}. The user's intent appears to be: {}.\n\nConversation stage: {}\nTopics already discussed: {topics}\n",
        profile.name, ctx.intent, ctx.stage
    );

    if let Some(projects) = project_summary(ctx) {
        let _ = write!(
            prompt,
            "\nREAL PROJECT DATA FROM GITHUB:\n{projects}\n\nSTRICT PROJECT RULES:\n\
             - ONLY mention projects from the above data\n\
             - NEVER create fake projects or GitHub links\n\
             - If asked for more projects beyond the real data, politely redirect to exploring existing projects\n\
             - Use exact project names and descriptions provided\n"
        );
    }

    let _ = write!(
        prompt,
        "\nRespond in a way that:\n\
         1. Is appropriate for the intent and conversation stage\n\
         2. Is concise and natural (1-3 sentences for greetings, 2-4 for explanations)\n\
         3. Matches the user's energy level\n\
         4. Uses ONLY real project data when available (never invent projects)\n\
         5. Suggests next steps when appropriate\n\n\
         Base response guideline: {}\n\n\
         User message: {message}\n\n\
         Remember to:\n\
         - Be conversational but professional\n\
         - Don't repeat information already discussed\n\
         - Guide the conversation toward your strengths\n\
         - Use specific project details when available\n\
         - Keep initial responses brief and expand based on interest\n\
         - NEVER invent or hallucinate projects - only use real GitHub data",
        fallback_reply(ctx, profile, github_url)
    );

    prompt
}

/// Persona and conversation guidelines, built from the owner's profile.
pub fn system_prompt(profile: &ProfileConfig, github_url: &str) -> String {
    let mut background = String::new();
    let _ = writeln!(background, "• Name: {}", profile.name);
    let _ = writeln!(background, "• Headline: {}", profile.headline);
    let _ = writeln!(background, "• Current: {}", profile.current_role);
    for role in &profile.previous_roles {
        let _ = writeln!(background, "• Previous: {role}");
    }
    let _ = writeln!(background, "• Education: {}", profile.education);
    if !profile.skills.is_empty() {
        let _ = writeln!(background, "• Key Skills: {}", profile.skills.join(", "));
    }
    if !profile.achievements.is_empty() {
        let _ = writeln!(background, "• Achievements: {}", profile.achievements.join("; "));
    }
    let _ = writeln!(background, "• Email: {} (ALWAYS share when asked)", profile.email);
    if let Some(linkedin) = &profile.linkedin {
        let _ = writeln!(background, "• LinkedIn: {linkedin}");
    }
    let _ = writeln!(background, "• GitHub: {github_url}");
    if let Some(youtube) = &profile.youtube {
        let _ = writeln!(background, "• YouTube: {youtube}");
    }
    match &profile.resume_url {
        Some(url) => {
            let _ = writeln!(background, "• Resume: {url} (can also be sent via email)");
        }
        None => {
            let _ = writeln!(background, "• Resume: can be sent via email");
        }
    }
    if let Some(availability) = &profile.availability {
        let _ = writeln!(background, "• Availability: {availability}");
    }

    format!(
        "You are {name}, responding through an intelligent chat system on your portfolio website.\n\n\
         CORE PRINCIPLES:\n\
         1. Match the user's energy - brief for brief, detailed for detailed\n\
         2. Be genuinely conversational, not robotic\n\
         3. Guide strategically toward your strengths\n\
         4. Remember and reference context naturally\n\
         5. Suggest logical next steps when appropriate\n\n\
         YOUR BACKGROUND (use naturally, don't dump all at once):\n\
         {background}\n\
         CONVERSATION FLOW:\n\
         Stage 1 (Initial): Be welcoming, understand their interest\n\
         Stage 2 (Exploring): Share relevant details, guide toward strengths\n\
         Stage 3 (Deep Dive): Provide specifics, showcase expertise\n\
         Stage 4 (Closing): Suggest connection, next steps\n\n\
         NEVER:\n\
         × Dump your entire resume unprompted\n\
         × Repeat information already shared\n\
         × Be overly formal or robotic\n\
         × Make up information not in your background\n\
         × Mention projects that are not in the project data you are given\n\n\
         ALWAYS:\n\
         ✓ Sound like a real person having a conversation\n\
         ✓ Be enthusiastic about technology\n\
         ✓ Reference previous messages naturally\n\
         ✓ Suggest relevant actions (view projects, download resume, connect)",
        name = profile.name,
    )
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::chat::context::ProjectContext;
    use crate::chat::conversation::Stage;
    use crate::model::ProjectStats;

    const GITHUB: &str = "https://github.com/owner";

    fn project(title: &str, techs: &[&str]) -> ProjectRecord {
        ProjectRecord {
            title: title.to_string(),
            technologies: techs.iter().map(|t| t.to_string()).collect(),
            description: format!("{title} is a thing I built."),
            readme_content: None,
            readme_preview: String::new(),
            link: None,
            github: format!("{GITHUB}/{title}"),
            image: None,
            priority: 1,
            show: true,
        }
    }

    fn ctx(intent: Intent, message_count: usize) -> ConversationContext {
        ConversationContext {
            intent,
            stage: Stage::Initial,
            topics_discussed: BTreeSet::new(),
            user_interests: BTreeSet::new(),
            message_count,
            project_data: None,
        }
    }

    fn with_projects(mut c: ConversationContext, projects: Vec<ProjectRecord>) -> ConversationContext {
        c.project_data = Some(ProjectContext {
            featured_projects: projects.clone(),
            project_stats: ProjectStats::default(),
            requested_project: None,
            related_projects: None,
            all_projects: projects,
        });
        c
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("abcdef", 3), "abc...");
        assert_eq!(excerpt("ééééé", 2), "éé...");
    }

    #[test]
    fn test_greeting_deterministic() {
        let profile = ProfileConfig::default();
        let a = fallback_reply(&ctx(Intent::Greeting, 1), &profile, GITHUB);
        let b = fallback_reply(&ctx(Intent::Greeting, 1), &profile, GITHUB);
        assert_eq!(a, b);
        let first = fallback_reply(&ctx(Intent::Greeting, 0), &profile, GITHUB);
        assert!(first.contains("I'm Rishabh"));
    }

    #[test]
    fn test_prompt_without_projects_has_no_project_block() {
        let profile = ProfileConfig::default();
        let prompt = generate_dynamic_prompt("hi", &ctx(Intent::Greeting, 1), &profile, GITHUB);
        assert!(prompt.contains("intent appears to be: greeting"));
        assert!(prompt.contains("Conversation stage: initial"));
        assert!(prompt.contains("Topics already discussed: none"));
        assert!(!prompt.contains("REAL PROJECT DATA"));
        assert!(prompt.contains("User message: hi"));
    }

    #[test]
    fn test_prompt_only_mentions_supplied_projects() {
        let profile = ProfileConfig::default();
        let c = with_projects(
            ctx(Intent::AskProjects, 3),
            vec![project("Alpha Tracker", &["Rust"]), project("Beta Board", &["React.js"])],
        );
        let prompt = generate_dynamic_prompt("what have you built?", &c, &profile, GITHUB);
        assert!(prompt.contains("REAL PROJECT DATA FROM GITHUB"));
        assert!(prompt.contains("Alpha Tracker"));
        assert!(prompt.contains("Beta Board"));
        for absent in ["ShopWise", "TaskManager", "Manga Downloader", "Environment Initiative"] {
            assert!(!prompt.contains(absent), "prompt leaked {absent}");
        }
        assert!(!system_prompt(&profile, GITHUB).contains("ShopWise"));
    }

    #[test]
    fn test_requested_project_detail() {
        let mut p = project("Alpha Tracker", &["Rust", "Tokio"]);
        p.link = Some("https://alpha.example.com".into());
        let mut c = with_projects(ctx(Intent::AskSpecificProject, 3), vec![p.clone()]);
        c.project_data.as_mut().unwrap().requested_project = Some(p);

        let summary = project_summary(&c).unwrap();
        assert!(summary.starts_with("**Alpha Tracker** is one of my key projects!"));
        assert!(summary.contains("**Tech Stack:** Rust, Tokio"));
        assert!(summary.contains(GENERIC_README));
        assert!(summary.contains("Live Demo: https://alpha.example.com"));
    }

    #[test]
    fn test_related_projects_summary() {
        let p = project("Beta Board", &["React.js"]);
        let mut c = with_projects(ctx(Intent::AskTechnologyProjects, 1), vec![p.clone()]);
        c.project_data.as_mut().unwrap().related_projects = Some(vec![p]);
        let summary = project_summary(&c).unwrap();
        assert!(summary.starts_with("Here are my projects using that technology"));
        let reply = fallback_reply(&c, &ProfileConfig::default(), GITHUB);
        assert!(reply.contains("Beta Board"));
    }

    #[test]
    fn test_unknown_after_projects_points_to_github() {
        let mut c = with_projects(ctx(Intent::Unknown, 5), vec![project("Alpha Tracker", &[])]);
        c.topics_discussed.insert(Topic::Projects);
        let reply = fallback_reply(&c, &ProfileConfig::default(), GITHUB);
        assert!(reply.contains("(1 total)"));
        assert!(reply.contains(GITHUB));
    }

    #[test]
    fn test_ask_projects_without_data() {
        let reply = fallback_reply(&ctx(Intent::AskProjects, 1), &ProfileConfig::default(), GITHUB);
        assert!(reply.contains("don't have project data"));
        assert!(reply.contains(GITHUB));
    }

    #[test]
    fn test_every_intent_has_a_reply() {
        let profile = ProfileConfig::default();
        for intent in Intent::ALL {
            assert!(!fallback_reply(&ctx(intent, 2), &profile, GITHUB).is_empty());
        }
    }

    #[test]
    fn test_system_prompt_from_profile() {
        let profile = ProfileConfig::default();
        let prompt = system_prompt(&profile, GITHUB);
        assert!(prompt.starts_with("You are Rishabh Kumar Choudhary"));
        assert!(prompt.contains(&profile.email));
        assert!(prompt.contains("GitHub: https://github.com/owner"));
        assert!(prompt.contains("CONVERSATION FLOW"));
    }
}
