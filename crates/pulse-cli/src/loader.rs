//! Post collection loading.
//!
//! A collection is either a directory of Markdown posts with YAML
//! frontmatter or a JSON array of documents. Markdown ids are the path
//! relative to the posts directory, without extension, `/`-separated.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use gray_matter::engine::YAML;
use gray_matter::Matter;
use serde::Deserialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use pulse_types::{parse_collection, Document};

const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Frontmatter fields read from a post.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Frontmatter {
    title: String,
    #[serde(default)]
    description: Option<String>,
    pub_date: String,
    #[serde(default)]
    updated_date: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    pinned: bool,
    #[serde(default)]
    pinned_order: Option<i64>,
}

/// Load a collection from a directory or a `.json` file.
pub fn load_documents(path: &Path) -> Result<Vec<Document>> {
    if path.is_dir() {
        return load_markdown_dir(path);
    }
    if !path.exists() {
        bail!("Posts path does not exist: {}", path.display());
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => load_json_collection(path),
        _ => bail!(
            "Unsupported posts path {} (expected a directory or .json file)",
            path.display()
        ),
    }
}

/// Load a JSON array of documents.
pub fn load_json_collection(path: &Path) -> Result<Vec<Document>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let documents = parse_collection(&raw)
        .with_context(|| format!("Failed to parse document collection {}", path.display()))?;
    debug!(path = %path.display(), documents = documents.len(), "Loaded JSON collection");
    Ok(documents)
}

/// Load every `.md`/`.mdx` file under `root`, in path order.
///
/// Unreadable entries, files that are not UTF-8 and files without usable
/// frontmatter are skipped with a warning.
pub fn load_markdown_dir(root: &Path) -> Result<Vec<Document>> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(root = %root.display(), error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_markdown(path))
        .collect();
    paths.sort();

    let matter = Matter::<YAML>::new();
    let mut documents = Vec::with_capacity(paths.len());

    for path in &paths {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable post");
                continue;
            }
        };
        let id = document_id(root, path)?;

        match parse_post(&matter, &id, &raw) {
            Ok(document) => documents.push(document),
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping post"),
        }
    }

    debug!(
        root = %root.display(),
        files = paths.len(),
        documents = documents.len(),
        "Loaded markdown posts"
    );
    Ok(documents)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MARKDOWN_EXTENSIONS.contains(&ext))
}

/// Relative path without extension, joined with `/`.
fn document_id(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .with_context(|| format!("{} is outside {}", path.display(), root.display()))?
        .with_extension("");

    let parts: Vec<String> = relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

fn parse_post(matter: &Matter<YAML>, id: &str, raw: &str) -> Result<Document> {
    let parsed = matter
        .parse::<Frontmatter>(raw)
        .map_err(|e| anyhow!("invalid frontmatter: {e}"))?;
    let front = parsed.data.context("missing frontmatter")?;

    Ok(Document {
        id: id.to_string(),
        title: front.title,
        description: front.description,
        pub_date: front.pub_date,
        updated_date: front.updated_date,
        tags: front.tags,
        category: front.category,
        author: front.author,
        pinned: front.pinned,
        pinned_order: front.pinned_order,
        word_count: Some(parsed.content.split_whitespace().count()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, contents: &str) {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    const HELLO: &str = "---\ntitle: Hello\npubDate: \"2026-01-15\"\ntags:\n  - rust\n  - cli\ncategory: notes\n---\none two three four\n";

    #[test]
    fn test_load_markdown_dir() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "hello.md", HELLO);
        write(
            dir.path(),
            "deep/dive.mdx",
            "---\ntitle: Dive\npubDate: \"2026-02-01T09:00:00+08:00\"\nupdatedDate: \"2026-02-03\"\nauthor: kim\npinned: true\npinnedOrder: 2\n---\nbody\n",
        );
        write(dir.path(), "notes.txt", "not a post");

        let docs = load_markdown_dir(dir.path()).unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["deep/dive", "hello"]);

        let dive = &docs[0];
        assert_eq!(dive.updated_date.as_deref(), Some("2026-02-03"));
        assert_eq!(dive.author.as_deref(), Some("kim"));
        assert!(dive.pinned);
        assert_eq!(dive.pinned_order, Some(2));
        assert!(dive.tags.is_empty());

        let hello = &docs[1];
        assert_eq!(hello.title, "Hello");
        assert_eq!(hello.tags, vec!["rust".to_string(), "cli".to_string()]);
        assert_eq!(hello.category.as_deref(), Some("notes"));
        assert_eq!(hello.word_count, Some(4));
    }

    #[test]
    fn test_posts_without_frontmatter_are_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "good.md", HELLO);
        write(dir.path(), "bare.md", "# Just a heading\n");
        write(dir.path(), "untitled.md", "---\npubDate: \"2026-01-01\"\n---\nbody\n");

        let docs = load_markdown_dir(dir.path()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "good");
    }

    #[test]
    fn test_non_utf8_post_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "good.md", HELLO);
        let mut latin1 = b"---\ntitle: Caf".to_vec();
        latin1.push(0xE9);
        latin1.extend_from_slice(b"\npubDate: \"2026-01-16\"\n---\nbody\n");
        fs::write(dir.path().join("latin1.md"), latin1).unwrap();

        let docs = load_markdown_dir(dir.path()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "good");
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        write(dir.path(), "good.md", HELLO);
        write(dir.path(), "locked/hidden.md", HELLO);
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let result = load_markdown_dir(dir.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let docs = result.unwrap();
        // Root ignores permission bits, so the locked post may still load
        assert!(docs.iter().any(|d| d.id == "good"));
    }

    #[test]
    fn test_load_json_collection() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "posts.json",
            r#"[
                {"id": "a", "title": "A", "pubDate": "2026-01-01", "tags": ["x"]},
                {"id": "b", "title": "B", "pubDate": "2026-01-02", "updatedDate": "2026-01-05"}
            ]"#,
        );

        let docs = load_documents(&dir.path().join("posts.json")).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].tags, vec!["x".to_string()]);
        assert_eq!(docs[1].updated_date.as_deref(), Some("2026-01-05"));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "posts.json", "{ not json");
        assert!(load_documents(&dir.path().join("posts.json")).is_err());
    }

    #[test]
    fn test_missing_and_unsupported_paths() {
        let dir = TempDir::new().unwrap();
        assert!(load_documents(&dir.path().join("nope")).is_err());

        write(dir.path(), "posts.yaml", "- id: a");
        assert!(load_documents(&dir.path().join("posts.yaml")).is_err());
    }

    #[test]
    fn test_document_id_uses_forward_slashes() {
        let root = Path::new("/blog");
        let id = document_id(root, Path::new("/blog/2026/01/first-post.md")).unwrap();
        assert_eq!(id, "2026/01/first-post");
    }
}
