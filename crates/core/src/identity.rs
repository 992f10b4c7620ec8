//! Commit identity scrubbing.
//!
//! [`IdentityScrubber`] rewrites leaked author/committer identities on a
//! [`CommitRecord`] and replaces enumerated identity strings inside the
//! commit message. All fields are raw byte strings because git does not
//! guarantee UTF-8 in signatures or messages; untouched fields keep their
//! exact bytes.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A commit's identity fields and message, as handed over by the history
/// rewrite driver. Mutated in place by [`IdentityScrubber::scrub_commit`].
///
/// Absent fields are represented as empty byte strings and never match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitRecord {
    pub author_name: Vec<u8>,
    pub author_email: Vec<u8>,
    pub committer_name: Vec<u8>,
    pub committer_email: Vec<u8>,
    pub message: Vec<u8>,
}

/// The fixed scrub rule set: which identities count as leaked and what they
/// are replaced with.
///
/// This is a plain value type; [`ScrubRules::default`] carries the rule set
/// the utilities ship with, and tests or the CLI may adjust individual
/// fields before handing it to the scrubber.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScrubRules {
    /// Token marking a leaked identity when found in a name or email
    /// (matched case-insensitively).
    pub marker: Vec<u8>,

    /// Build-host token marking a leaked identity when found in a name
    /// (matched case-insensitively).
    pub host_marker: Vec<u8>,

    /// Email domain suffix marking a leaked identity (matched
    /// case-insensitively against the end of the email).
    pub leaked_domain: Vec<u8>,

    /// Replacement author/committer name.
    pub replacement_name: Vec<u8>,

    /// Replacement author/committer email.
    pub replacement_email: Vec<u8>,

    /// Literal message substitutions, applied in order. Matching is exact;
    /// the casing variants to cover are enumerated up front.
    pub message_substitutions: Vec<(Vec<u8>, Vec<u8>)>,
}

impl Default for ScrubRules {
    fn default() -> Self {
        Self {
            marker: b"minuo".to_vec(),
            host_marker: b"jack-compute-host".to_vec(),
            leaked_domain: b"@minuo.ai".to_vec(),
            replacement_name: b"orbinyan".to_vec(),
            replacement_email: b"17157590+orbinyan@users.noreply.github.com".to_vec(),
            message_substitutions: vec![
                (b"jack-minuo".to_vec(), b"orbinyan".to_vec()),
                (b"Jack-minuo".to_vec(), b"orbinyan".to_vec()),
                (b"JACK-MINUO".to_vec(), b"orbinyan".to_vec()),
                (b"@minuo.ai".to_vec(), b"@users.noreply.github.com".to_vec()),
            ],
        }
    }
}

/// What [`IdentityScrubber::scrub_commit`] changed on a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrubOutcome {
    pub author_rewritten: bool,
    pub committer_rewritten: bool,
    pub message_rewritten: bool,
}

impl ScrubOutcome {
    /// Whether any field of the record was modified.
    pub fn changed(&self) -> bool {
        self.author_rewritten || self.committer_rewritten || self.message_rewritten
    }
}

/// Scrubs leaked identities from commit records according to a
/// [`ScrubRules`] set.
#[derive(Debug, Clone)]
pub struct IdentityScrubber {
    rules: ScrubRules,
}

impl IdentityScrubber {
    /// Create a scrubber with the given rules.
    pub fn new(rules: ScrubRules) -> Self {
        Self { rules }
    }

    /// The rules this scrubber applies.
    pub fn rules(&self) -> &ScrubRules {
        &self.rules
    }

    /// Whether a name/email pair matches the leaked-identity rules.
    ///
    /// Case-insensitive: the marker token is searched in both name and
    /// email, the host token in the name only, and the leaked domain is
    /// matched as an email suffix.
    pub fn needs_scrub(&self, name: &[u8], email: &[u8]) -> bool {
        let name = name.to_ascii_lowercase();
        let email = email.to_ascii_lowercase();
        contains(&name, &self.rules.marker)
            || contains(&email, &self.rules.marker)
            || contains(&name, &self.rules.host_marker)
            || email.ends_with(&self.rules.leaked_domain)
    }

    /// Scrub a commit record in place.
    ///
    /// The author identity, the committer identity, and the message are
    /// handled independently: a leaked author does not force a committer
    /// rewrite and vice versa. Returns which parts were modified.
    pub fn scrub_commit(&self, commit: &mut CommitRecord) -> ScrubOutcome {
        let mut outcome = ScrubOutcome::default();

        if self.needs_scrub(&commit.author_name, &commit.author_email) {
            debug!("scrubbing author identity");
            commit.author_name = self.rules.replacement_name.clone();
            commit.author_email = self.rules.replacement_email.clone();
            outcome.author_rewritten = true;
        }
        if self.needs_scrub(&commit.committer_name, &commit.committer_email) {
            debug!("scrubbing committer identity");
            commit.committer_name = self.rules.replacement_name.clone();
            commit.committer_email = self.rules.replacement_email.clone();
            outcome.committer_rewritten = true;
        }

        if !commit.message.is_empty() {
            let mut message = commit.message.clone();
            for (needle, replacement) in &self.rules.message_substitutions {
                message = replace_all(&message, needle, replacement);
            }
            if message != commit.message {
                debug!("scrubbing identity strings in commit message");
                commit.message = message;
                outcome.message_rewritten = true;
            }
        }

        outcome
    }
}

impl Default for IdentityScrubber {
    fn default() -> Self {
        Self::new(ScrubRules::default())
    }
}

/// Byte-substring search. An empty needle never matches.
fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|window| window == needle)
}

/// Replace every non-overlapping occurrence of `needle`, left to right.
fn replace_all(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Vec<u8> {
    if needle.is_empty() {
        return haystack.to_vec();
    }
    let mut out = Vec::with_capacity(haystack.len());
    let mut i = 0;
    while i < haystack.len() {
        if haystack.len() - i >= needle.len() && &haystack[i..i + needle.len()] == needle {
            out.extend_from_slice(replacement);
            i += needle.len();
        } else {
            out.push(haystack[i]);
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaked_commit() -> CommitRecord {
        CommitRecord {
            author_name: b"Jack-minuo".to_vec(),
            author_email: b"jack@minuo.ai".to_vec(),
            committer_name: b"Jack-minuo".to_vec(),
            committer_email: b"jack@minuo.ai".to_vec(),
            message: b"Fix build on jack-compute-host\n\nReported-by: jack-minuo <jack@minuo.ai>\n"
                .to_vec(),
        }
    }

    #[test]
    fn test_marker_in_name_matches_case_insensitively() {
        let scrubber = IdentityScrubber::default();
        assert!(scrubber.needs_scrub(b"Jack-MINUO", b"jack@example.com"));
        assert!(scrubber.needs_scrub(b"jack", b"jack@Minuo.example.com"));
        assert!(scrubber.needs_scrub(b"nightly on JACK-COMPUTE-HOST", b""));
        assert!(scrubber.needs_scrub(b"Jack", b"jack@MINUO.AI"));
        assert!(!scrubber.needs_scrub(b"Alice", b"alice@example.com"));
    }

    #[test]
    fn test_domain_is_suffix_match_only() {
        // Isolate the domain rule with a marker that cannot fire.
        let rules = ScrubRules {
            marker: b"xyzzy".to_vec(),
            ..Default::default()
        };
        let scrubber = IdentityScrubber::new(rules);
        assert!(scrubber.needs_scrub(b"Bob", b"bob@minuo.ai"));
        assert!(scrubber.needs_scrub(b"Bob", b"bob@MINUO.AI"));
        assert!(!scrubber.needs_scrub(b"Bob", b"bob@minuo.ai.example.com"));
    }

    #[test]
    fn test_host_marker_only_applies_to_name() {
        let scrubber = IdentityScrubber::default();
        assert!(!scrubber.needs_scrub(b"Bob", b"bob@jack-compute-host.example.com"));
    }

    #[test]
    fn test_empty_fields_never_match() {
        let scrubber = IdentityScrubber::default();
        assert!(!scrubber.needs_scrub(b"", b""));

        let mut commit = CommitRecord::default();
        let outcome = scrubber.scrub_commit(&mut commit);
        assert!(!outcome.changed());
        assert_eq!(commit, CommitRecord::default());
    }

    #[test]
    fn test_scrub_replaces_both_identities() {
        let scrubber = IdentityScrubber::default();
        let mut commit = leaked_commit();
        let outcome = scrubber.scrub_commit(&mut commit);

        assert!(outcome.author_rewritten);
        assert!(outcome.committer_rewritten);
        assert_eq!(commit.author_name, b"orbinyan");
        assert_eq!(
            commit.author_email,
            b"17157590+orbinyan@users.noreply.github.com"
        );
        assert_eq!(commit.committer_name, commit.author_name);
        assert_eq!(commit.committer_email, commit.author_email);
    }

    #[test]
    fn test_author_and_committer_are_independent() {
        let scrubber = IdentityScrubber::default();
        let mut commit = CommitRecord {
            author_name: b"Alice".to_vec(),
            author_email: b"alice@example.com".to_vec(),
            committer_name: b"jack-minuo".to_vec(),
            committer_email: b"jack@minuo.ai".to_vec(),
            message: b"Merge branch 'feature'\n".to_vec(),
        };
        let outcome = scrubber.scrub_commit(&mut commit);

        assert!(!outcome.author_rewritten);
        assert!(outcome.committer_rewritten);
        assert_eq!(commit.author_name, b"Alice");
        assert_eq!(commit.author_email, b"alice@example.com");
        assert_eq!(commit.committer_name, b"orbinyan");
    }

    #[test]
    fn test_message_substitutions() {
        let scrubber = IdentityScrubber::default();
        let mut commit = CommitRecord {
            message: b"jack-minuo and Jack-minuo and JACK-MINUO pushed to jack@minuo.ai".to_vec(),
            ..Default::default()
        };
        let outcome = scrubber.scrub_commit(&mut commit);

        assert!(outcome.message_rewritten);
        assert_eq!(
            commit.message,
            b"orbinyan and orbinyan and orbinyan pushed to jack@users.noreply.github.com".to_vec()
        );
    }

    #[test]
    fn test_message_matches_exact_casing_variants_only() {
        let scrubber = IdentityScrubber::default();
        let mut commit = CommitRecord {
            // Not one of the enumerated variants.
            message: b"JaCk-MiNuO did this".to_vec(),
            ..Default::default()
        };
        let outcome = scrubber.scrub_commit(&mut commit);
        assert!(!outcome.message_rewritten);
        assert_eq!(commit.message, b"JaCk-MiNuO did this");
    }

    #[test]
    fn test_non_matching_commit_is_byte_identical() {
        let scrubber = IdentityScrubber::default();
        let original = CommitRecord {
            author_name: b"Alice".to_vec(),
            author_email: b"alice@example.com".to_vec(),
            committer_name: b"Bob".to_vec(),
            committer_email: b"bob@example.com".to_vec(),
            message: b"Refactor \xf0 parser\n".to_vec(),
        };
        let mut commit = original.clone();
        let outcome = scrubber.scrub_commit(&mut commit);
        assert!(!outcome.changed());
        assert_eq!(commit, original);
    }

    #[test]
    fn test_scrub_is_idempotent() {
        let scrubber = IdentityScrubber::default();
        let mut commit = leaked_commit();
        scrubber.scrub_commit(&mut commit);
        let after_first = commit.clone();

        let outcome = scrubber.scrub_commit(&mut commit);
        assert!(!outcome.changed());
        assert_eq!(commit, after_first);
    }

    #[test]
    fn test_custom_replacement_identity() {
        let rules = ScrubRules {
            replacement_name: b"ghost".to_vec(),
            replacement_email: b"ghost@users.noreply.github.com".to_vec(),
            ..Default::default()
        };
        let scrubber = IdentityScrubber::new(rules);
        let mut commit = leaked_commit();
        scrubber.scrub_commit(&mut commit);
        assert_eq!(commit.author_name, b"ghost");
        assert_eq!(commit.author_email, b"ghost@users.noreply.github.com");
    }
}
