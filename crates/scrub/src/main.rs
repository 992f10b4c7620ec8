//! emotekit-scrub entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use emotekit_core::identity::{IdentityScrubber, ScrubRules};
use emotekit_scrub::HistoryRewriter;

/// History rewrite tool scrubbing leaked committer/author identities.
#[derive(Parser, Debug)]
#[command(
    name = "emotekit-scrub",
    version,
    about = "Rewrite repository history, replacing leaked author/committer identities"
)]
struct Args {
    /// Path to the git repository to rewrite.
    repo: PathBuf,

    /// Walk the history and report counts without moving any refs.
    #[arg(long)]
    dry_run: bool,

    /// Override the replacement identity name.
    #[arg(long)]
    replacement_name: Option<String>,

    /// Override the replacement identity email.
    #[arg(long)]
    replacement_email: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut rules = ScrubRules::default();
    if let Some(name) = args.replacement_name {
        rules.replacement_name = name.into_bytes();
    }
    if let Some(email) = args.replacement_email {
        rules.replacement_email = email.into_bytes();
    }

    let rewriter = HistoryRewriter::open(&args.repo, IdentityScrubber::new(rules))
        .context("failed to open repository")?;
    let total = rewriter.commit_count().context("failed to walk history")?;

    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.blue} [{bar:40}] {pos}/{len} commits")
            .unwrap()
            .progress_chars("=> "),
    );

    let summary = rewriter
        .rewrite(args.dry_run, || bar.inc(1))
        .context("history rewrite failed")?;
    bar.finish_and_clear();

    let bold = Style::new().bold();
    let green = Style::new().green();
    println!();
    if args.dry_run {
        println!("{}", bold.apply_to("Dry run — no refs were moved"));
    }
    println!("Commits visited    : {}", summary.commits_visited);
    println!("Commits rewritten  : {}", summary.commits_rewritten);
    println!("Authors scrubbed   : {}", summary.authors_scrubbed);
    println!("Committers scrubbed: {}", summary.committers_scrubbed);
    println!("Messages scrubbed  : {}", summary.messages_scrubbed);
    if !args.dry_run {
        if summary.branches_moved.is_empty() {
            println!("{} no branches needed rewriting", green.apply_to("✓"));
        } else {
            println!(
                "{} branches moved: {}",
                green.apply_to("✓"),
                summary.branches_moved.join(", ")
            );
        }
    }

    Ok(())
}
