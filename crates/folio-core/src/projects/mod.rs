mod catalog;
mod origin;
pub mod query;
mod source;

pub use catalog::ProjectCatalog;
pub use origin::ProjectsOrigin;
pub use source::{create_source, FeedSource, HttpProjectSource, ProjectSource};
