//! emotekit-scrub library.
//!
//! Walks an existing repository's history and rewrites any commit whose
//! author/committer identity or message text leaks a private identity,
//! using the scrub rules from `emotekit-core`.

pub mod rewrite;

pub use rewrite::{HistoryRewriter, RewriteError, RewriteSummary};
