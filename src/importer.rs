use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{error, info, warn};

use crate::config::PostDefaults;
use crate::db;
use crate::error::ImportError;
use crate::parser;

const MARKDOWN_EXT: &str = "md";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Imported { title: String, slug: String },
    /// A post with the same slug is already stored.
    Skipped { title: String, slug: String },
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub file_name: String,
    pub outcome: FileOutcome,
}

#[derive(Debug, Default)]
pub struct ImportSummary {
    pub found: usize,
    pub reports: Vec<FileReport>,
}

impl ImportSummary {
    pub fn imported(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Imported { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn print(&self) {
        println!(
            "Import finished: found {}, imported {} ({} skipped, {} failed).",
            self.found,
            self.imported(),
            self.skipped(),
            self.failed(),
        );
        for r in &self.reports {
            if let FileOutcome::Failed { reason } = &r.outcome {
                println!("  failed: {} ({})", r.file_name, reason);
            }
        }
    }
}

pub fn check_directory(dir: &Path) -> Result<(), ImportError> {
    if !dir.exists() {
        return Err(ImportError::DirectoryNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(ImportError::NotADirectory(dir.to_path_buf()));
    }
    Ok(())
}

/// `*.md` regular files directly inside `dir`, in directory order.
pub fn list_markdown_files(dir: &Path) -> Result<Vec<PathBuf>, ImportError> {
    check_directory(dir)?;
    let read_err = |source| ImportError::ReadFile {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        let is_md = path.extension().is_some_and(|ext| ext == MARKDOWN_EXT);
        if is_md && path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// Import every Markdown file in `dir`. Each file is committed on its own;
/// a failing file is recorded and the run moves on.
pub fn import_directory(
    conn: &Connection,
    dir: &Path,
    defaults: &PostDefaults,
) -> Result<ImportSummary, ImportError> {
    let files = list_markdown_files(dir)?;
    db::init_schema(conn)?;
    println!("Found {} markdown files in {}", files.len(), dir.display());

    let mut summary = ImportSummary {
        found: files.len(),
        reports: Vec::with_capacity(files.len()),
    };

    for path in &files {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!(file = %file_name, "Processing file");

        let outcome = match import_file(conn, path, defaults) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(file = %file_name, "Failed to import: {}", e);
                FileOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };
        match &outcome {
            FileOutcome::Imported { title, slug } => {
                info!(slug = %slug, "Imported post '{}'", title)
            }
            FileOutcome::Skipped { title, slug } => {
                warn!(slug = %slug, "Post '{}' already exists, skipping", title)
            }
            FileOutcome::Failed { .. } => {}
        }
        summary.reports.push(FileReport { file_name, outcome });
    }

    Ok(summary)
}

/// Parse one file and insert it unless its slug is taken. The transaction
/// rolls back on drop, so any early return leaves the store untouched.
pub fn import_file(
    conn: &Connection,
    path: &Path,
    defaults: &PostDefaults,
) -> Result<FileOutcome, ImportError> {
    let post = parser::parse_file(path, defaults)?;

    let tx = conn.unchecked_transaction()?;
    if db::slug_exists(&tx, &post.slug)? {
        return Ok(FileOutcome::Skipped {
            title: post.title,
            slug: post.slug,
        });
    }
    db::insert_post(&tx, &post)?;
    tx.commit()?;

    Ok(FileOutcome::Imported {
        title: post.title,
        slug: post.slug,
    })
}

/// Delete every stored post. Returns rows removed.
pub fn clear_posts(conn: &Connection) -> Result<usize, ImportError> {
    db::init_schema(conn)?;
    let deleted = db::delete_all_posts(conn)?;
    info!(deleted, "Deleted all posts");
    Ok(deleted)
}
