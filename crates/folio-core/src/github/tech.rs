/// Canonical display names for GitHub languages and topics.
const TECH_MAPPING: &[(&str, &str)] = &[
    ("javascript", "JavaScript"),
    ("typescript", "TypeScript"),
    ("react", "React.js"),
    ("nextjs", "Next.js"),
    ("nodejs", "Node.js"),
    ("mongodb", "MongoDB"),
    ("mysql", "MySQL"),
    ("postgresql", "PostgreSQL"),
    ("redis", "Redis"),
    ("docker", "Docker"),
    ("rust", "Rust"),
    ("python", "Python"),
    ("java", "Java"),
    ("cpp", "C++"),
    ("c++", "C++"),
    ("c", "C"),
    ("go", "Go"),
    ("blockchain", "Blockchain"),
    ("ethereum", "Ethereum"),
    ("express", "Express.js"),
    ("tailwindcss", "Tailwind CSS"),
    ("bootstrap", "Bootstrap"),
    ("sass", "Sass"),
    ("css", "CSS"),
    ("html", "HTML"),
    ("vue", "Vue.js"),
    ("angular", "Angular"),
    ("flask", "Flask"),
    ("django", "Django"),
    ("php", "PHP"),
    ("laravel", "Laravel"),
    ("spring", "Spring Boot"),
    ("jwt", "JWT"),
    ("api", "API"),
    ("rest", "REST API"),
    ("graphql", "GraphQL"),
    ("websocket", "WebSocket"),
    ("socket-io", "Socket.IO"),
    ("firebase", "Firebase"),
    ("aws", "AWS"),
    ("heroku", "Heroku"),
    ("vercel", "Vercel"),
    ("netlify", "Netlify"),
];

fn canonical(token: &str) -> Option<&'static str> {
    let lower = token.to_lowercase();
    TECH_MAPPING
        .iter()
        .find(|(key, _)| *key == lower)
        .map(|(_, name)| *name)
}

/// "machine-learning" -> "Machine Learning"
fn title_case_topic(topic: &str) -> String {
    topic
        .split('-')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Derive a technology list from a repository's primary language and topics.
/// Deduplicated, first-seen order: language first, then topics.
pub fn map_technologies(language: Option<&str>, topics: &[String]) -> Vec<String> {
    let mut technologies: Vec<String> = Vec::new();
    let mut push = |tech: String| {
        if !technologies.contains(&tech) {
            technologies.push(tech);
        }
    };

    if let Some(lang) = language {
        match canonical(lang) {
            Some(name) => push(name.to_string()),
            None => push(lang.to_string()),
        }
    }

    for topic in topics {
        match canonical(topic) {
            Some(name) => push(name.to_string()),
            None => push(title_case_topic(topic)),
        }
    }

    technologies
}
