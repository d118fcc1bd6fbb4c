//! Built-in data for the site owner: profile, repository overrides, and the
//! fallback project list. Every value here can be replaced from `folio.toml`.

use super::ProfileConfig;
use crate::model::{ProjectOverride, ProjectRecord};

pub(super) fn default_profile() -> ProfileConfig {
    ProfileConfig {
        name: "Rishabh Kumar Choudhary".to_string(),
        headline: "Software engineer building full-stack products and cloud infrastructure"
            .to_string(),
        current_role: "Founding Engineer at ContraVault AI (Oct 2024 - present), owning the \
                       technical infrastructure from AWS setup to real-time data streaming"
            .to_string(),
        employer: "ContraVault".to_string(),
        previous_roles: vec![
            "Software Developer Intern at Blozum (WhatsApp bots and automation tools)".to_string(),
        ],
        education: "B.Tech in ECE (IoT specialization) from NSUT, CGPA 7.94".to_string(),
        school: Some("NSUT".to_string()),
        skills: vec![
            "Node.js".to_string(),
            "Python".to_string(),
            "TypeScript".to_string(),
            "Go".to_string(),
            "React/Next.js".to_string(),
            "AWS (ECS, Lambda, DynamoDB)".to_string(),
            "System design".to_string(),
        ],
        achievements: vec![
            "Best Project Award on Blockchain at HackNSUT".to_string(),
            "Top 30 of 3,548 teams at Innerve Hacks 2022".to_string(),
        ],
        email: "rishabh26072003@gmail.com".to_string(),
        linkedin: Some("https://linkedin.com/in/rishabhxchoudhary".to_string()),
        youtube: Some("@rishabhxchoudhary".to_string()),
        resume_url: Some("/resume.pdf".to_string()),
        availability: Some("Open to remote opportunities".to_string()),
    }
}

pub(super) fn default_project_keywords() -> Vec<String> {
    [
        "shopwise",
        "shop wise",
        "environment initiative",
        "manga downloader",
        "taskmanager",
        "task manager",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn default_project_overrides() -> Vec<ProjectOverride> {
    vec![
        ProjectOverride {
            repo: "Environment-Initiative-App".to_string(),
            technologies: Some(strings(&[
                "MongoDB",
                "Express.js",
                "React.js",
                "Node.js",
                "Blockchain",
                "Ethereum",
            ])),
            image: Some("/images/environment-initiative-app.png".to_string()),
            link: Some("https://environment-initiative-app-frontend.vercel.app/".to_string()),
            priority: Some(1),
            ..Default::default()
        },
        ProjectOverride {
            repo: "ShopWise".to_string(),
            technologies: Some(strings(&[
                "TypeScript",
                "Next.js",
                "MongoDB",
                "Docker",
                "Redis",
                "JWT",
            ])),
            image: Some("/images/shopwise.png".to_string()),
            link: Some("https://shop-wise.vercel.app/".to_string()),
            priority: Some(2),
            ..Default::default()
        },
        ProjectOverride {
            repo: "Manga-Downloader-in-Rust".to_string(),
            title: Some("Manga Downloader in Rust".to_string()),
            technologies: Some(strings(&[
                "Rust",
                "Tokio",
                "Async/Await",
                "CLI",
                "Multithreading",
            ])),
            image: Some("/images/manga.png".to_string()),
            priority: Some(3),
            ..Default::default()
        },
        ProjectOverride {
            repo: "TaskManager".to_string(),
            technologies: Some(strings(&[
                "Next.js",
                "TypeScript",
                "Node.js",
                "MongoDB",
                "Tailwind CSS",
                "REST API",
            ])),
            image: Some("/images/taskmanager.png".to_string()),
            link: Some("https://task-manager-nu-one.vercel.app/".to_string()),
            priority: Some(4),
            ..Default::default()
        },
        ProjectOverride {
            repo: "RishabhxChoudhary-PortFolio".to_string(),
            show: Some(false),
            ..Default::default()
        },
        ProjectOverride {
            repo: "nextjs-portfolio".to_string(),
            show: Some(false),
            ..Default::default()
        },
    ]
}

pub fn default_fallback_projects() -> Vec<ProjectRecord> {
    let base = "https://github.com/rishabhxchoudhary";
    vec![
        ProjectRecord {
            title: "Environment Initiative App".to_string(),
            technologies: strings(&[
                "MongoDB",
                "Express.js",
                "React.js",
                "Node.js",
                "Blockchain",
                "Ethereum",
            ]),
            description: "A full-stack web application supporting environmental initiatives \
                          with blockchain-based Ethereum donations and immutable transaction \
                          recording."
                .to_string(),
            readme_content: None,
            readme_preview: "Developed a comprehensive platform for environmental initiatives \
                             featuring blockchain integration for transparent donations..."
                .to_string(),
            link: Some("https://environment-initiative-app-frontend.vercel.app/".to_string()),
            github: format!("{base}/Environment-Initiative-App"),
            image: Some("/images/environment-initiative-app.png".to_string()),
            priority: 1,
            show: true,
        },
        ProjectRecord {
            title: "ShopWise".to_string(),
            technologies: strings(&["TypeScript", "Next.js", "MongoDB", "Docker", "Redis", "JWT"]),
            description: "A scalable e-commerce platform with microservices architecture, \
                          implementing Redis caching and JWT-based authentication."
                .to_string(),
            readme_content: None,
            readme_preview: "Built a scalable e-commerce platform with microservices \
                             architecture, implementing Redis caching for product catalogs..."
                .to_string(),
            link: Some("https://shop-wise.vercel.app/".to_string()),
            github: format!("{base}/ShopWise"),
            image: Some("/images/shopwise.png".to_string()),
            priority: 2,
            show: true,
        },
        ProjectRecord {
            title: "Manga Downloader in Rust".to_string(),
            technologies: strings(&["Rust", "Tokio", "Async/Await", "CLI", "Multithreading"]),
            description: "A high-performance CLI tool using Rust's async runtime for concurrent \
                          chapter downloads with parallel image fetching."
                .to_string(),
            readme_content: None,
            readme_preview: "Engineered a high-performance CLI tool using Rust's async runtime \
                             (Tokio) for concurrent chapter downloads..."
                .to_string(),
            link: None,
            github: format!("{base}/Manga-Downloader-in-Rust"),
            image: Some("/images/manga.png".to_string()),
            priority: 3,
            show: true,
        },
        ProjectRecord {
            title: "TaskManager".to_string(),
            technologies: strings(&[
                "Next.js",
                "TypeScript",
                "Node.js",
                "MongoDB",
                "Tailwind CSS",
                "REST API",
            ]),
            description: "A full-stack task management application with real-time updates, \
                          drag-and-drop functionality, and advanced filtering."
                .to_string(),
            readme_content: None,
            readme_preview: "Built a full-stack task management application with real-time \
                             updates, drag-and-drop functionality..."
                .to_string(),
            link: Some("https://task-manager-nu-one.vercel.app/".to_string()),
            github: format!("{base}/TaskManager"),
            image: Some("/images/taskmanager.png".to_string()),
            priority: 4,
            show: true,
        },
    ]
}
