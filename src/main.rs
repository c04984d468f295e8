mod config;
mod db;
mod error;
mod importer;
mod parser;

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use tracing::error;

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "blog_importer", about = "Import Markdown blog posts into SQLite")]
struct Cli {
    /// SQLite database file (overrides BLOG_IMPORT_DATABASE_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete all posts, then import every *.md file (full rebuild)
    Run {
        /// Directory of Markdown files (default: configured blog_dir)
        dir: Option<PathBuf>,
    },
    /// Import *.md files, skipping slugs that already exist
    Import {
        dir: Option<PathBuf>,
    },
    /// Delete all posts
    Clear,
    /// Stored posts, newest first
    List {
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Print one stored post
    Show {
        slug: String,
    },
    /// Post counts
    Stats,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let t0 = Instant::now();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { dir } => {
            if let Some(settings) = load_reporting(cli.db) {
                run_rebuild(&settings, dir);
            }
            println!("Import task finished!");
        }
        Commands::Import { dir } => {
            if let Some(settings) = load_reporting(cli.db) {
                run_import(&settings, dir);
            }
            println!("Import task finished!");
        }
        Commands::Clear => {
            if let Some(conn) = load_reporting(cli.db).and_then(|s| open_reporting(&s)) {
                clear(&conn);
            }
        }
        Commands::List { limit } => {
            let conn = open(&load_settings(cli.db)?)?;
            let rows = db::fetch_overview(&conn, limit)?;
            if rows.is_empty() {
                println!("No posts stored. Run 'import' first.");
                return Ok(());
            }

            println!(
                "{:>5} | {:<32} | {:<40} | {:<10} | {:<19}",
                "ID", "Slug", "Title", "Status", "Created"
            );
            println!("{}", "-".repeat(118));
            for r in &rows {
                println!(
                    "{:>5} | {:<32} | {:<40} | {:<10} | {:<19}",
                    r.id,
                    truncate(&r.slug, 32),
                    truncate(&r.title, 40),
                    r.status,
                    r.created_at
                );
            }
            println!("\n{} posts", rows.len());
        }
        Commands::Show { slug } => {
            let conn = open(&load_settings(cli.db)?)?;
            match db::fetch_post(&conn, &slug)? {
                Some(p) => {
                    println!("Title:   {}", p.title);
                    println!("Slug:    {}", p.slug);
                    println!("Author:  {}", p.author);
                    println!("Tags:    {}", p.tags);
                    println!("Status:  {}", p.status);
                    if !p.cover_image.is_empty() {
                        println!("Cover:   {}", p.cover_image);
                    }
                    println!("Excerpt: {}", p.excerpt);
                }
                None => println!("No post with slug '{}'.", slug),
            }
        }
        Commands::Stats => {
            let conn = open(&load_settings(cli.db)?)?;
            let s = db::get_stats(&conn)?;
            println!("Total:     {}", s.total);
            for (status, n) in &s.by_status {
                println!("  {:<9}{}", format!("{}:", status), n);
            }
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    Ok(())
}

fn load_settings(db_override: Option<PathBuf>) -> anyhow::Result<Settings> {
    let mut settings = Settings::load()?;
    if let Some(path) = db_override {
        settings.database_path = path;
    }
    Ok(settings)
}

fn load_reporting(db_override: Option<PathBuf>) -> Option<Settings> {
    load_settings(db_override)
        .map_err(|e| error!("Could not load settings: {:#}", e))
        .ok()
}

fn open(settings: &Settings) -> anyhow::Result<Connection> {
    let conn = db::connect(&settings.database_path)?;
    db::init_schema(&conn)?;
    Ok(conn)
}

/// Like `open`, but reports the failure instead of returning it.
fn open_reporting(settings: &Settings) -> Option<Connection> {
    open(settings)
        .map_err(|e| error!("Could not open database: {:#}", e))
        .ok()
}

/// Delete everything, then import. The delete runs even when the
/// directory turns out to be missing.
fn run_rebuild(settings: &Settings, dir: Option<PathBuf>) {
    let Some(conn) = open_reporting(settings) else {
        return;
    };
    println!("Deleting all posts...");
    clear(&conn);
    println!("Importing blog files...");
    import(&conn, settings, &blog_dir(settings, dir));
}

/// Import only. A missing directory is reported before the database is touched.
fn run_import(settings: &Settings, dir: Option<PathBuf>) {
    let dir = blog_dir(settings, dir);
    if let Err(e) = importer::check_directory(&dir) {
        error!("Import aborted: {}", e);
        return;
    }
    if let Some(conn) = open_reporting(settings) {
        import(&conn, settings, &dir);
    }
}

fn blog_dir(settings: &Settings, dir: Option<PathBuf>) -> PathBuf {
    dir.unwrap_or_else(|| settings.blog_dir.clone())
}

fn clear(conn: &Connection) {
    match importer::clear_posts(conn) {
        Ok(n) => println!("Deleted all posts ({} removed).", n),
        Err(e) => error!("Failed to delete posts: {}", e),
    }
}

fn import(conn: &Connection, settings: &Settings, dir: &Path) {
    match importer::import_directory(conn, dir, &settings.defaults) {
        Ok(summary) => summary.print(),
        Err(e) => error!("Import aborted: {}", e),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_takes_optional_dir_and_db() {
        let cli = Cli::parse_from(["blog_importer", "run", "posts", "--db", "x.sqlite"]);
        assert_eq!(cli.db, Some(PathBuf::from("x.sqlite")));
        assert!(matches!(cli.command, Commands::Run { dir: Some(d) } if d == PathBuf::from("posts")));

        let cli = Cli::parse_from(["blog_importer", "import"]);
        assert!(matches!(cli.command, Commands::Import { dir: None }));
    }

    #[test]
    fn list_default_limit() {
        let cli = Cli::parse_from(["blog_importer", "list"]);
        assert!(matches!(cli.command, Commands::List { limit: 50 }));
    }

    fn scratch_settings(root: &Path) -> Settings {
        Settings {
            database_path: root.join("data/blog.sqlite"),
            blog_dir: root.join("blog_files"),
            defaults: crate::config::PostDefaults::default(),
        }
    }

    #[test]
    fn import_from_missing_dir_leaves_no_database() {
        let root = tempfile::tempdir().unwrap();
        let settings = scratch_settings(root.path());

        run_import(&settings, None);
        run_import(&settings, Some(root.path().join("nope")));

        assert!(!settings.database_path.exists());
        assert!(!root.path().join("data").exists());
    }

    #[test]
    fn import_creates_database_for_existing_dir() {
        let root = tempfile::tempdir().unwrap();
        let settings = scratch_settings(root.path());
        std::fs::create_dir(&settings.blog_dir).unwrap();
        std::fs::write(settings.blog_dir.join("hello.md"), "# Hello World\nSome body text.")
            .unwrap();

        run_import(&settings, None);

        let conn = open(&settings).unwrap();
        assert!(db::fetch_post(&conn, "hello-world").unwrap().is_some());
    }

    #[test]
    fn truncate_long_titles() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer title", 8), "a longer...");
    }
}
