//! Content models and loading

pub mod filter;
pub mod frontmatter;
pub mod loader;
pub mod markdown;
pub mod post;

pub use filter::{filter_posts, SortOrder};
pub use frontmatter::FrontMatter;
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
pub use post::{Post, Project};
