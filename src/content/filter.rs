//! Post filtering and ordering
//!
//! The blog index shows the post collection narrowed to an optional tag and
//! ordered by publication date. Filtering is a pure function over the loaded
//! collection; the collection itself is never touched.

use chrono::NaiveDate;
use serde::Deserialize;

use super::Post;
use crate::helpers::parse_post_date;

/// Ordering applied to the filtered posts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Latest date first
    #[default]
    Newest,
    /// Earliest date first
    Oldest,
}

impl SortOrder {
    /// Query-parameter spelling of this order
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            other => anyhow::bail!("unknown sort order: {}", other),
        }
    }
}

/// Select and order the posts to display.
///
/// Keeps only posts carrying `tag` when one is given (case-sensitive exact
/// match), then orders by parsed date. The sort is stable: posts with equal
/// dates keep their relative order from the input.
///
/// A date string that parses to no calendar date is treated as older than
/// every parseable date, so such posts sort last under `Newest` and first
/// under `Oldest`.
pub fn filter_posts(posts: &[Post], tag: Option<&str>, order: SortOrder) -> Vec<Post> {
    let mut selected: Vec<Post> = posts
        .iter()
        .filter(|post| match tag {
            Some(tag) => post.has_tag(tag),
            None => true,
        })
        .cloned()
        .collect();

    // Option<NaiveDate> orders None before any Some, which is exactly the
    // "unparseable is oldest" rule.
    match order {
        SortOrder::Newest => selected.sort_by(|a, b| sort_key(b).cmp(&sort_key(a))),
        SortOrder::Oldest => selected.sort_by(|a, b| sort_key(a).cmp(&sort_key(b))),
    }

    selected
}

fn sort_key(post: &Post) -> Option<NaiveDate> {
    parse_post_date(&post.date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str, date: &str, tags: &[&str]) -> Post {
        let mut post = Post::new(slug.to_string(), slug.to_uppercase(), date.to_string());
        post.tags = tags.iter().map(|t| t.to_string()).collect();
        post
    }

    fn slugs(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_tag_filter_exact_match() {
        let posts = vec![
            post("a", "2024-01-01", &["x"]),
            post("b", "2024-06-01", &["y"]),
            post("c", "2024-03-01", &["x", "y"]),
        ];

        let filtered = filter_posts(&posts, Some("x"), SortOrder::Newest);
        assert_eq!(slugs(&filtered), vec!["c", "a"]);

        // Case-sensitive: "X" matches nothing
        assert!(filter_posts(&posts, Some("X"), SortOrder::Newest).is_empty());
    }

    #[test]
    fn test_no_tag_keeps_all() {
        let posts = vec![
            post("a", "2024-01-01", &["x"]),
            post("b", "2024-06-01", &["y"]),
        ];

        assert_eq!(
            slugs(&filter_posts(&posts, None, SortOrder::Newest)),
            vec!["b", "a"]
        );
        assert_eq!(
            slugs(&filter_posts(&posts, None, SortOrder::Oldest)),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_orders_are_reverses_for_distinct_dates() {
        let posts = vec![
            post("a", "2023-05-05", &[]),
            post("b", "2024-06-01", &[]),
            post("c", "2022-01-01", &[]),
        ];

        let newest = filter_posts(&posts, None, SortOrder::Newest);
        let mut oldest = filter_posts(&posts, None, SortOrder::Oldest);
        oldest.reverse();
        assert_eq!(slugs(&newest), slugs(&oldest));
    }

    #[test]
    fn test_stable_on_equal_dates() {
        let posts = vec![
            post("first", "2024-01-01", &[]),
            post("second", "2024-01-01", &[]),
            post("third", "2024-01-01", &[]),
        ];

        let newest = filter_posts(&posts, None, SortOrder::Newest);
        assert_eq!(slugs(&newest), vec!["first", "second", "third"]);
        let oldest = filter_posts(&posts, None, SortOrder::Oldest);
        assert_eq!(slugs(&oldest), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unparseable_dates_sort_as_oldest() {
        let posts = vec![
            post("bad", "someday", &[]),
            post("old", "2020-01-01", &[]),
            post("new", "2024-01-01", &[]),
        ];

        let newest = filter_posts(&posts, None, SortOrder::Newest);
        assert_eq!(slugs(&newest), vec!["new", "old", "bad"]);
        let oldest = filter_posts(&posts, None, SortOrder::Oldest);
        assert_eq!(slugs(&oldest), vec!["bad", "old", "new"]);
    }

    #[test]
    fn test_input_never_mutated() {
        let posts = vec![
            post("a", "2024-01-01", &["x"]),
            post("b", "2023-01-01", &["y"]),
        ];
        let before = slugs(&posts).join(",");

        let _ = filter_posts(&posts, Some("x"), SortOrder::Oldest);
        let _ = filter_posts(&posts, None, SortOrder::Newest);

        assert_eq!(posts.len(), 2);
        assert_eq!(slugs(&posts).join(","), before);
    }

    #[test]
    fn test_idempotent() {
        let posts = vec![
            post("a", "2024-01-01", &["x"]),
            post("b", "2024-06-01", &["x"]),
            post("c", "junk", &["x"]),
        ];

        let once = filter_posts(&posts, Some("x"), SortOrder::Newest);
        let twice = filter_posts(&posts, Some("x"), SortOrder::Newest);
        assert_eq!(slugs(&once), slugs(&twice));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let posts = vec![
            post("a", "2024-01-01", &["x"]),
            post("b", "2024-06-01", &["y"]),
        ];

        let by_tag = filter_posts(&posts, Some("x"), SortOrder::Newest);
        assert_eq!(slugs(&by_tag), vec!["a"]);

        assert_eq!(
            slugs(&filter_posts(&posts, None, SortOrder::Newest)),
            vec!["b", "a"]
        );
        assert_eq!(
            slugs(&filter_posts(&posts, None, SortOrder::Oldest)),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_sort_order_from_str() {
        assert_eq!("newest".parse::<SortOrder>().unwrap(), SortOrder::Newest);
        assert_eq!("oldest".parse::<SortOrder>().unwrap(), SortOrder::Oldest);
        assert!("latest".parse::<SortOrder>().is_err());
    }
}
