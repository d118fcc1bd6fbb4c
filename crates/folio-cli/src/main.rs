use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use folio_core::chat::{ChatService, ContextBuilder};
use folio_core::config::FolioConfig;
use folio_core::github::GithubClient;
use folio_core::llm::LlmService;
use folio_core::model::{ChatMessage, ProjectRecord, ProjectStats, ProjectsResponse};
use folio_core::projects::{query, create_source, ProjectCatalog, ProjectsOrigin};
use owo_colors::OwoColorize;

#[derive(Parser)]
#[command(name = "folio", about = "Folio: portfolio chat assistant and project showcase", version)]
enum Cli {
    /// Ask the portfolio assistant a question
    Ask {
        /// The visitor message
        message: String,
        /// JSON file holding prior conversation ([{"role":"user","content":"..."}])
        #[arg(long)]
        history: Option<String>,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Classify a message without answering it (no network)
    Intent {
        /// The visitor message
        message: String,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// List or query showcase projects
    Projects {
        /// Bypass the cache and fetch from GitHub
        #[arg(long)]
        refresh: bool,
        /// Find one project by (fuzzy) name
        #[arg(long)]
        name: Option<String>,
        /// Projects using a technology
        #[arg(long)]
        tech: Option<String>,
        /// Only the featured subset
        #[arg(long)]
        featured: bool,
        /// Technology statistics
        #[arg(long)]
        stats: bool,
        /// Free-text search over titles, descriptions and technologies
        #[arg(long)]
        search: Option<String>,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the GitHub API quota
    RateLimit {
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration (secrets masked)
    Config,
}

/// What `folio projects` prints, picked from its flags.
#[derive(Debug, PartialEq)]
enum ProjectView {
    All,
    Name(String),
    Tech(String),
    Featured,
    Stats,
    Search(String),
}

impl ProjectView {
    fn from_flags(
        name: Option<String>,
        tech: Option<String>,
        featured: bool,
        stats: bool,
        search: Option<String>,
    ) -> Result<Self> {
        let mut views = Vec::new();
        if let Some(n) = name {
            views.push(Self::Name(n));
        }
        if let Some(t) = tech {
            views.push(Self::Tech(t));
        }
        if featured {
            views.push(Self::Featured);
        }
        if stats {
            views.push(Self::Stats);
        }
        if let Some(q) = search {
            views.push(Self::Search(q));
        }
        match views.len() {
            0 => Ok(Self::All),
            1 => Ok(views.remove(0)),
            _ => anyhow::bail!("use only one of --name, --tech, --featured, --stats, --search"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".parse().unwrap()),
        )
        .compact()
        .init();

    let cli = Cli::parse();
    let config = FolioConfig::load(Some(&std::env::current_dir()?))
        .unwrap_or_else(|_| FolioConfig::default_config());

    run(cli, &config).await
}

async fn run(cli: Cli, config: &FolioConfig) -> Result<()> {
    match cli {
        Cli::Ask {
            message,
            history,
            json,
        } => cmd_ask(config, &message, history.as_deref(), json).await,
        Cli::Intent { message, json } => cmd_intent(config, &message, json),
        Cli::Projects {
            refresh,
            name,
            tech,
            featured,
            stats,
            search,
            json,
        } => {
            let view = ProjectView::from_flags(name, tech, featured, stats, search)?;
            cmd_projects(config, refresh, view, json).await
        }
        Cli::RateLimit { json } => cmd_rate_limit(config, json).await,
        Cli::Config => cmd_config(config),
    }
}

fn make_origin(config: &FolioConfig) -> Arc<ProjectsOrigin<GithubClient>> {
    Arc::new(ProjectsOrigin::new(
        GithubClient::from_config(&config.github),
        &config.github,
        Duration::from_secs(config.cache.origin_ttl_secs),
    ))
}

fn load_history(path: &Path) -> Result<Vec<ChatMessage>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read history file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid history in {}", path.display()))
}

async fn cmd_ask(config: &FolioConfig, message: &str, history: Option<&str>, json: bool) -> Result<()> {
    let history = match history {
        Some(path) => load_history(Path::new(path))?,
        None => Vec::new(),
    };

    let source = create_source(config, make_origin(config))?;
    let catalog = Arc::new(ProjectCatalog::new(
        source,
        Duration::from_secs(config.cache.catalog_ttl_secs),
    ));
    let llm = if config.llm.enabled {
        Some(LlmService::from_config(&config.llm).context("failed to create LLM service")?)
    } else {
        None
    };
    let chat = ChatService::new(config, catalog, llm);

    let ctx = chat.context(message, &history).await;
    let reply = chat
        .respond(message, &history)
        .await
        .context("chat turn failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
        return Ok(());
    }

    println!(
        "{} {} {}",
        ctx.intent.to_string().magenta(),
        ctx.stage.to_string().dimmed(),
        match chat.llm() {
            Some(llm) => llm.describe(),
            None => "templated".to_string(),
        }
        .dimmed()
    );
    println!();
    println!("{}", reply.message);
    if !reply.suggested_actions.is_empty() {
        println!();
        for action in &reply.suggested_actions {
            println!("  {} {}", "›".cyan(), action);
        }
    }
    Ok(())
}

fn cmd_intent(config: &FolioConfig, message: &str, json: bool) -> Result<()> {
    let builder = ContextBuilder::from_config(config);
    let intent = builder.classifier().detect(message);

    if json {
        println!("{}", serde_json::json!({ "message": message, "intent": intent }));
    } else {
        println!("{}", intent.to_string().magenta());
    }
    Ok(())
}

async fn cmd_projects(config: &FolioConfig, refresh: bool, view: ProjectView, json: bool) -> Result<()> {
    let origin = make_origin(config);
    let listing = origin.fetch(refresh).await;
    if !json {
        print_listing_notice(&listing);
    }
    let projects = &listing.projects;

    match view {
        ProjectView::All if json => println!("{}", serde_json::to_string_pretty(&listing)?),
        ProjectView::All => print_projects(&query::top(projects, projects.len())),
        ProjectView::Name(name) => match query::find_by_name(projects, &name) {
            Some(p) if json => println!("{}", serde_json::to_string_pretty(p)?),
            Some(p) => print_project_detail(p),
            None => anyhow::bail!("no project matching '{name}'"),
        },
        ProjectView::Tech(tech) => emit(&query::by_technology(projects, &tech), json)?,
        ProjectView::Featured => emit(&query::featured(projects), json)?,
        ProjectView::Search(text) => emit(&query::search(projects, &text), json)?,
        ProjectView::Stats => {
            let stats = query::stats(projects);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats);
            }
        }
    }
    Ok(())
}

fn emit(projects: &[ProjectRecord], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(projects)?);
    } else {
        print_projects(projects);
    }
    Ok(())
}

fn print_listing_notice(listing: &ProjectsResponse) {
    if listing.fallback {
        eprintln!(
            "{} GitHub unavailable, showing built-in projects",
            "Fallback:".yellow()
        );
    } else if listing.stale {
        eprintln!("{} GitHub unavailable, showing cached projects", "Stale:".yellow());
    }
    if let Some(ref err) = listing.error {
        eprintln!("  {}", err.dimmed());
    }
}

fn print_projects(projects: &[ProjectRecord]) {
    if projects.is_empty() {
        println!("No projects found.");
        return;
    }

    println!(
        "  {}  {}  {}",
        format!("{:<4}", "Pri").dimmed(),
        format!("{:<32}", "Title").dimmed(),
        "Technologies".dimmed(),
    );
    println!("{}", "─".repeat(78).dimmed());

    for p in projects {
        let live = if p.has_live_link() { " ●" } else { "" };
        println!(
            "  {}  {:<32}  {}{}",
            format!("{:<4}", p.priority).dimmed(),
            p.title,
            p.technologies.join(", ").cyan(),
            live.green(),
        );
    }

    println!("{}", "─".repeat(78).dimmed());
    println!(
        "  {} project{}",
        projects.len(),
        if projects.len() == 1 { "" } else { "s" }
    );
}

fn print_project_detail(p: &ProjectRecord) {
    println!("{}", p.title.bold());
    if !p.technologies.is_empty() {
        println!("{}", p.technologies.join(", ").magenta());
    }
    println!();
    println!("{}", p.description);
    println!();
    println!("{}", "--- Links ---".dimmed());
    println!("  {}   {}", "GitHub:".dimmed(), p.github.cyan());
    if let Some(link) = p.link.as_deref().filter(|l| !l.is_empty()) {
        println!("  {}     {}", "Live:".dimmed(), link.cyan());
    }
}

fn print_stats(stats: &ProjectStats) {
    println!("{}", "Project Stats".bold());
    println!("  {}     {}", "Projects:".dimmed(), stats.total_projects);
    println!("  {}   {}", "Live demos:".dimmed(), stats.has_live_projects);
    println!();
    println!("{}", "--- Top technologies ---".dimmed());
    for tc in &stats.top_technologies {
        println!("  {:<20} {}", tc.name, tc.count.to_string().cyan());
    }
}

async fn cmd_rate_limit(config: &FolioConfig, json: bool) -> Result<()> {
    let origin = make_origin(config);
    let core = origin
        .rate_limit()
        .await
        .context("failed to fetch GitHub rate limit")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&core)?);
        return Ok(());
    }

    let remaining = format!("{}/{}", core.remaining, core.limit);
    let remaining = if core.remaining < 100 {
        remaining.red().to_string()
    } else {
        remaining.green().to_string()
    };
    println!("{}", "GitHub Rate Limit".bold());
    println!("  {}      {}", "Remaining:".dimmed(), remaining);
    println!("  {}           {}", "Used:".dimmed(), core.used);
    println!("  {}         {}", "Resets:".dimmed(), core.reset_date);
    println!(
        "  {}  {}",
        "Authenticated:".dimmed(),
        if origin.is_authenticated() {
            "yes".green().to_string()
        } else {
            "no (60/hour)".yellow().to_string()
        }
    );
    Ok(())
}

fn cmd_config(config: &FolioConfig) -> Result<()> {
    let mut effective = config.clone();
    for warning in effective.validate() {
        eprintln!("{} {}", "warning:".yellow(), warning);
    }
    print!("{}", effective.to_toml_string()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_view_defaults_to_all() {
        let view = ProjectView::from_flags(None, None, false, false, None).unwrap();
        assert_eq!(view, ProjectView::All);
    }

    #[test]
    fn test_project_view_single_flag() {
        let view = ProjectView::from_flags(None, Some("react".into()), false, false, None).unwrap();
        assert_eq!(view, ProjectView::Tech("react".into()));
        let view = ProjectView::from_flags(None, None, false, true, None).unwrap();
        assert_eq!(view, ProjectView::Stats);
    }

    #[test]
    fn test_project_view_rejects_combinations() {
        assert!(ProjectView::from_flags(Some("x".into()), None, true, false, None).is_err());
    }

    #[test]
    fn test_cli_parses_projects_flags() {
        let cli = Cli::try_parse_from(["folio", "projects", "--tech", "rust", "--json"]).unwrap();
        match cli {
            Cli::Projects { tech, json, refresh, .. } => {
                assert_eq!(tech.as_deref(), Some("rust"));
                assert!(json);
                assert!(!refresh);
            }
            _ => panic!("expected projects command"),
        }
    }

    #[test]
    fn test_cli_parses_rate_limit() {
        assert!(matches!(
            Cli::try_parse_from(["folio", "rate-limit"]).unwrap(),
            Cli::RateLimit { json: false }
        ));
    }

    #[test]
    fn test_load_history_file() {
        let path = std::env::temp_dir().join(format!("folio-history-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[{"role":"user","content":"Hi"},{"role":"assistant","content":"Hello!"}]"#,
        )
        .unwrap();
        let history = load_history(&path).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1], ChatMessage::assistant("Hello!"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_history_rejects_garbage() {
        let path = std::env::temp_dir().join(format!("folio-bad-history-{}.json", std::process::id()));
        std::fs::write(&path, "not json").unwrap();
        assert!(load_history(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
