mod client;
mod readme;
mod source;
mod tech;

pub use client::{parse_rate_limit_headers, GithubClient};
pub use readme::{clean_preview, PREVIEW_CHARS};
pub use source::{GithubRepo, RepoListing, RepoSource};
pub use tech::map_technologies;
