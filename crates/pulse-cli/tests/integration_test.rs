//! Integration tests for the blog-pulse command layer.
//!
//! These tests write a small Markdown blog to disk, load it, and run the
//! commands end to end without touching global logging or stdout.

use std::fs;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use clap::Parser;
use tempfile::TempDir;

use pulse_cli::{execute, load_documents, Cli};
use pulse_types::Settings;

fn write_post(root: &Path, relative: &str, frontmatter: &str, body: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, format!("---\n{frontmatter}---\n{body}\n")).unwrap();
}

fn blog() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let root = dir.path();

    write_post(
        root,
        "rust/ownership.md",
        "title: Ownership\npubDate: \"2026-02-01\"\ntags: [rust, memory]\ncategory: tech\n",
        "Borrowing rules explained.",
    );
    write_post(
        root,
        "rust/lifetimes.md",
        "title: Lifetimes\npubDate: \"2026-02-02\"\nupdatedDate: \"2026-02-20\"\ntags: [rust, memory]\ncategory: tech\n",
        "Lifetimes tie references together.",
    );
    write_post(
        root,
        "rust/traits.mdx",
        "title: Traits\npubDate: \"2026-02-03\"\ntags: [rust]\ncategory: tech\n",
        "Shared behaviour.",
    );
    write_post(
        root,
        "life/bread.md",
        "title: Bread\npubDate: \"2026-02-10\"\ntags: [cooking]\ncategory: life\n",
        "Flour, water, salt.",
    );
    fs::write(root.join("draft.md"), "no frontmatter here\n").unwrap();
    dir
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 28, 0, 0, 0).unwrap()
}

fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.activity.timezone = "UTC".to_string();
    settings
}

fn run(args: &[&str], root: &Path) -> serde_json::Value {
    let documents = load_documents(root).expect("Failed to load posts");
    let cli = Cli::parse_from(args);
    execute(&settings(), &documents, cli.command, now()).expect("Command failed")
}

#[test]
fn test_markdown_blog_stats() {
    let dir = blog();
    let stats = run(&["blog-pulse", "stats", "--from", "2026-02-01"], dir.path());

    assert_eq!(stats["totalPosts"], 4);
    assert_eq!(stats["totalUpdates"], 1);
    assert_eq!(stats["activeDays"], 5);
    assert_eq!(stats["longestStreak"], 3);
    assert_eq!(stats["currentStreak"], 1);
    // 4 posts over 28 days
    assert_eq!(stats["averagePostsPerWeek"], 1.0);
}

#[test]
fn test_markdown_blog_ledger_and_weekly() {
    let dir = blog();
    let ledger = run(
        &["blog-pulse", "ledger", "--from", "2026-02-01", "--active-only"],
        dir.path(),
    );
    let days = ledger.as_array().unwrap();
    assert_eq!(days.len(), 5);
    assert_eq!(days[0]["date"], "2026-02-01");
    assert_eq!(days[0]["posts"][0]["postId"], "rust/ownership");

    let weekly = run(&["blog-pulse", "weekly", "--from", "2026-02-01"], dir.path());
    let total: u64 = weekly
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["publications"].as_u64().unwrap())
        .sum();
    assert_eq!(total, 4);
}

#[test]
fn test_markdown_blog_related() {
    let dir = blog();
    let related = run(
        &["blog-pulse", "related", "rust/ownership", "--no-diversify"],
        dir.path(),
    );
    let ids: Vec<&str> = related
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["rust/lifetimes", "rust/traits", "life/bread"]);
}

#[test]
fn test_markdown_blog_tags_and_latest() {
    let dir = blog();
    let tags = run(&["blog-pulse", "tags", "--counts"], dir.path());
    assert_eq!(tags[0]["tag"], "rust");
    assert_eq!(tags[0]["count"], 3);

    let latest = run(&["blog-pulse", "latest", "-n", "1"], dir.path());
    assert_eq!(latest[0]["id"], "life/bread");
}

#[test]
fn test_unknown_post_is_an_error() {
    let dir = blog();
    let documents = load_documents(dir.path()).unwrap();
    let cli = Cli::parse_from(["blog-pulse", "random", "nope"]);
    assert!(execute(&settings(), &documents, cli.command, now()).is_err());
}
