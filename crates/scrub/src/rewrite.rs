//! History rewriting via `git2`.
//!
//! [`HistoryRewriter`] plays the host role for the identity scrubber: it
//! walks every commit reachable from the local branches in
//! parent-before-child order, runs the scrubber over each commit's
//! signatures and message, and rebuilds the commit when the record changed
//! or any parent was rebuilt. Trees are never touched, so untouched
//! commits keep their exact object ids and the working tree stays valid
//! after branch refs move.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use git2::{BranchType, Commit, Oid, Repository, Signature, Sort, Time};
use thiserror::Error;
use tracing::{debug, info};

use emotekit_core::identity::{CommitRecord, IdentityScrubber};

/// Errors from the history rewrite.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// The path does not exist or is not a git repository.
    #[error("git repository not found at '{0}'")]
    RepositoryNotFound(String),

    /// A `git2` library error.
    #[error("git2 error: {0}")]
    Git2Error(#[from] git2::Error),

    /// A branch ref could not be moved to its rewritten tip.
    #[error("failed to update ref '{refname}': {detail}")]
    RefUpdate {
        refname: String,
        detail: String,
    },
}

/// Counters describing what a rewrite pass did (or, for a dry run, would
/// have done).
#[derive(Debug, Clone, Default)]
pub struct RewriteSummary {
    /// Commits reachable from local branches.
    pub commits_visited: usize,
    /// Commits rebuilt, including ones rebuilt only because a parent was.
    pub commits_rewritten: usize,
    /// Commits whose author identity matched the scrub rules.
    pub authors_scrubbed: usize,
    /// Commits whose committer identity matched the scrub rules.
    pub committers_scrubbed: usize,
    /// Commits whose message text was substituted.
    pub messages_scrubbed: usize,
    /// Short names of branch refs moved to rewritten tips.
    pub branches_moved: Vec<String>,
}

/// Rewrites repository history with a configured [`IdentityScrubber`].
pub struct HistoryRewriter {
    repo: Repository,
    repo_path: PathBuf,
    scrubber: IdentityScrubber,
}

impl HistoryRewriter {
    /// Open an existing repository at `repo_path`.
    pub fn open<P: AsRef<Path>>(repo_path: P, scrubber: IdentityScrubber) -> Result<Self, RewriteError> {
        let path = repo_path.as_ref();
        info!(path = %path.display(), "opening git repository");
        let repo = Repository::open(path)
            .map_err(|_| RewriteError::RepositoryNotFound(path.display().to_string()))?;
        Ok(Self {
            repo,
            repo_path: path.to_path_buf(),
            scrubber,
        })
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// Number of commits reachable from local branches (progress bar length).
    pub fn commit_count(&self) -> Result<usize, RewriteError> {
        let mut walk = self.walk()?;
        let mut count = 0;
        for oid in &mut walk {
            oid?;
            count += 1;
        }
        Ok(count)
    }

    /// Rewrite the history, invoking `on_commit` once per visited commit.
    ///
    /// With `dry_run` set, the walk runs and the summary is filled in but
    /// no objects are written and no refs move.
    pub fn rewrite<F: FnMut()>(
        &self,
        dry_run: bool,
        mut on_commit: F,
    ) -> Result<RewriteSummary, RewriteError> {
        let branches = self.local_branches()?;
        let mut summary = RewriteSummary::default();

        // Old commit id -> rebuilt commit id. Parents are guaranteed to be
        // mapped before their children by the reverse topological walk.
        let mut rewritten: HashMap<Oid, Oid> = HashMap::new();

        for oid in self.walk()? {
            let oid = oid?;
            summary.commits_visited += 1;
            on_commit();

            let commit = self.repo.find_commit(oid)?;
            let (mut record, author_when, committer_when) = {
                let author = commit.author();
                let committer = commit.committer();
                (
                    CommitRecord {
                        author_name: author.name_bytes().to_vec(),
                        author_email: author.email_bytes().to_vec(),
                        committer_name: committer.name_bytes().to_vec(),
                        committer_email: committer.email_bytes().to_vec(),
                        message: commit.message_raw_bytes().to_vec(),
                    },
                    author.when(),
                    committer.when(),
                )
            };

            let outcome = self.scrubber.scrub_commit(&mut record);
            let parent_rebuilt = commit.parent_ids().any(|p| rewritten.contains_key(&p));
            if !outcome.changed() && !parent_rebuilt {
                continue;
            }

            summary.commits_rewritten += 1;
            summary.authors_scrubbed += usize::from(outcome.author_rewritten);
            summary.committers_scrubbed += usize::from(outcome.committer_rewritten);
            summary.messages_scrubbed += usize::from(outcome.message_rewritten);

            if dry_run {
                // Mark the commit so descendants still count as rewritten.
                rewritten.insert(oid, oid);
                continue;
            }

            let tree = commit.tree()?;
            let author = rebuilt_signature(&record.author_name, &record.author_email, author_when)?;
            let committer =
                rebuilt_signature(&record.committer_name, &record.committer_email, committer_when)?;
            let parents: Vec<Commit> = commit
                .parent_ids()
                .map(|p| self.repo.find_commit(rewritten.get(&p).copied().unwrap_or(p)))
                .collect::<Result<_, _>>()?;
            let parent_refs: Vec<&Commit> = parents.iter().collect();
            let message = String::from_utf8_lossy(&record.message);

            let new_oid =
                self.repo
                    .commit(None, &author, &committer, &message, &tree, &parent_refs)?;
            debug!(old = %oid, new = %new_oid, "rebuilt commit");
            rewritten.insert(oid, new_oid);
        }

        if !dry_run {
            for (refname, short_name, tip) in &branches {
                let Some(&new_tip) = rewritten.get(tip) else {
                    continue;
                };
                if new_tip == *tip {
                    continue;
                }
                let mut reference = self.repo.find_reference(refname)?;
                reference
                    .set_target(new_tip, "emotekit-scrub: identity scrub rewrite")
                    .map_err(|e| RewriteError::RefUpdate {
                        refname: refname.clone(),
                        detail: e.to_string(),
                    })?;
                info!(branch = %short_name, old = %tip, new = %new_tip, "moved branch to rewritten tip");
                summary.branches_moved.push(short_name.clone());
            }
        }

        info!(
            visited = summary.commits_visited,
            rewritten = summary.commits_rewritten,
            dry_run,
            "history rewrite complete"
        );
        Ok(summary)
    }

    /// Local branches as (full refname, short name, tip id).
    fn local_branches(&self) -> Result<Vec<(String, String, Oid)>, RewriteError> {
        let mut branches = Vec::new();
        for branch in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch?;
            let short_name = branch.name()?.unwrap_or("<non-utf8>").to_string();
            let reference = branch.into_reference();
            let refname = match reference.name() {
                Some(name) => name.to_string(),
                None => continue,
            };
            let Some(tip) = reference.target() else {
                continue;
            };
            branches.push((refname, short_name, tip));
        }
        Ok(branches)
    }

    /// Reverse topological walk over everything reachable from local
    /// branches, so parents are visited before children.
    fn walk(&self) -> Result<git2::Revwalk<'_>, RewriteError> {
        let mut walk = self.repo.revwalk()?;
        for (_, _, tip) in self.local_branches()? {
            walk.push(tip)?;
        }
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
        Ok(walk)
    }
}

/// Build a signature from possibly-replaced raw bytes, keeping the original
/// timestamp. Rebuilt commits go through git2's UTF-8 API, so invalid UTF-8
/// is carried over lossily here.
fn rebuilt_signature(name: &[u8], email: &[u8], when: Time) -> Result<Signature<'static>, git2::Error> {
    Signature::new(
        &String::from_utf8_lossy(name),
        &String::from_utf8_lossy(email),
        &when,
    )
}
