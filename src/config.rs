use std::path::PathBuf;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

const CONFIG_FILE: &str = "blog_import";
const ENV_PREFIX: &str = "BLOG_IMPORT";

/// Metadata stamped on every imported post.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PostDefaults {
    pub author: String,
    pub tags: String,
    pub cover_image: String,
    pub status: String,
}

impl Default for PostDefaults {
    fn default() -> Self {
        PostDefaults {
            author: "admin".into(),
            tags: "技术博客,openJiuwen".into(),
            cover_image: String::new(),
            status: "published".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_path: PathBuf,
    pub blog_dir: PathBuf,
    pub defaults: PostDefaults,
}

impl Settings {
    /// Defaults, then `blog_import.toml` if present, then `BLOG_IMPORT_*` env vars.
    pub fn load() -> Result<Self> {
        Self::from_sources(Some(File::with_name(CONFIG_FILE).required(false)), env_source())
    }

    fn from_sources(
        file: Option<File<config::FileSourceFile, config::FileFormat>>,
        env: Environment,
    ) -> Result<Self> {
        let defaults = PostDefaults::default();
        let mut builder = Config::builder()
            .set_default("database_path", "data/blog.sqlite")?
            .set_default("blog_dir", "blog_files")?
            .set_default("defaults.author", defaults.author)?
            .set_default("defaults.tags", defaults.tags)?
            .set_default("defaults.cover_image", defaults.cover_image)?
            .set_default("defaults.status", defaults.status)?;
        if let Some(file) = file {
            builder = builder.add_source(file);
        }
        let settings = builder.add_source(env).build()?.try_deserialize()?;
        Ok(settings)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
