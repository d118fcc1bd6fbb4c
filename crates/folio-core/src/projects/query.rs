//! Pure lookups over a priority-sorted project list. Hidden records
//! (`show = false`) never come back from any of these.

use crate::model::{ProjectRecord, ProjectStats, TechCount};

/// Size of the featured subset.
pub const FEATURED_COUNT: usize = 4;

/// Default size for `top`.
pub const DEFAULT_TOP_COUNT: usize = 6;

/// Number of technologies reported in stats.
pub const TOP_TECHNOLOGIES: usize = 8;

/// Shortest normalized name query that may match by containment.
const MIN_NAME_QUERY: usize = 3;

/// Lower-case and drop whitespace, hyphens and underscores:
/// "Shop-Wise App" -> "shopwiseapp".
pub fn normalize_name(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lower-case alphanumerics plus `+` and `#`: "React.js" -> "reactjs", "C++" -> "c++".
fn tech_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric() || *c == '+' || *c == '#')
        .flat_map(char::to_lowercase)
        .collect()
}

fn visible(projects: &[ProjectRecord]) -> impl Iterator<Item = &ProjectRecord> {
    projects.iter().filter(|p| p.show)
}

/// First project whose normalized title or repository name contains the
/// normalized query, or is contained in it.
pub fn find_by_name<'a>(projects: &'a [ProjectRecord], name: &str) -> Option<&'a ProjectRecord> {
    let query = normalize_name(name);
    if query.chars().count() < MIN_NAME_QUERY {
        return None;
    }

    visible(projects).find(|p| {
        [normalize_name(&p.title), normalize_name(p.repo_name())]
            .iter()
            .filter(|candidate| !candidate.is_empty())
            .any(|candidate| candidate.contains(&query) || query.contains(candidate.as_str()))
    })
}

/// Whether a project technology token matches a queried technology.
///
/// Matches on prefix in either direction ("react" ~ "React.js", "postgres" ~
/// "PostgreSQL") or on a whole word ("api" ~ "REST API"). Single-character
/// tokens only match exactly, so "C" never matches "react".
pub fn technology_matches(technology: &str, query: &str) -> bool {
    let tech = tech_key(technology);
    let query = tech_key(query);
    if tech.is_empty() || query.is_empty() {
        return false;
    }
    if tech == query {
        return true;
    }
    if query.len() >= 2 && tech.starts_with(&query) {
        return true;
    }
    if tech.len() >= 2 && query.starts_with(&tech) {
        return true;
    }
    technology
        .split(|c: char| c.is_whitespace() || c == '/' || c == '-')
        .any(|word| tech_key(word) == query)
}

/// All visible projects using the technology, source order preserved.
pub fn by_technology(projects: &[ProjectRecord], tech: &str) -> Vec<ProjectRecord> {
    visible(projects)
        .filter(|p| p.technologies.iter().any(|t| technology_matches(t, tech)))
        .cloned()
        .collect()
}

/// Visible projects by ascending priority (stable), first `limit`.
pub fn top(projects: &[ProjectRecord], limit: usize) -> Vec<ProjectRecord> {
    let mut shown: Vec<ProjectRecord> = visible(projects).cloned().collect();
    shown.sort_by_key(|p| p.priority);
    shown.truncate(limit);
    shown
}

pub fn featured(projects: &[ProjectRecord]) -> Vec<ProjectRecord> {
    top(projects, FEATURED_COUNT)
}

/// Case-insensitive search over title, description, technologies and README preview.
pub fn search(projects: &[ProjectRecord], query: &str) -> Vec<ProjectRecord> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return Vec::new();
    }
    visible(projects)
        .filter(|p| {
            p.title.to_lowercase().contains(&q)
                || p.description.to_lowercase().contains(&q)
                || p.technologies.iter().any(|t| t.to_lowercase().contains(&q))
                || p.readme_preview.to_lowercase().contains(&q)
        })
        .cloned()
        .collect()
}

/// Technology frequency (top 8, ties by first appearance) and live-demo count.
pub fn stats(projects: &[ProjectRecord]) -> ProjectStats {
    let mut counts: Vec<TechCount> = Vec::new();
    let mut total = 0;
    let mut live = 0;

    for project in visible(projects) {
        total += 1;
        if project.has_live_link() {
            live += 1;
        }
        for tech in &project.technologies {
            match counts.iter_mut().find(|c| &c.name == tech) {
                Some(entry) => entry.count += 1,
                None => counts.push(TechCount {
                    name: tech.clone(),
                    count: 1,
                }),
            }
        }
    }

    // stable: equal counts keep first-seen order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_TECHNOLOGIES);

    ProjectStats {
        total_projects: total,
        top_technologies: counts,
        has_live_projects: live,
    }
}
