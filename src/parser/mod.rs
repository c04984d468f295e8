pub mod excerpt;
pub mod slug;
pub mod title;

use std::path::Path;

use crate::config::PostDefaults;
use crate::db::PostRow;
use crate::error::ImportError;

/// Markdown text + file name → post row: title, excerpt, slug, fixed metadata.
pub fn parse_post(content: &str, file_name: &str, defaults: &PostDefaults) -> PostRow {
    let title = title::extract(content, file_name);
    let slug = slug::slugify(&title);
    PostRow {
        excerpt: excerpt::build(content),
        content: content.to_string(),
        title,
        slug,
        author: defaults.author.clone(),
        tags: defaults.tags.clone(),
        cover_image: defaults.cover_image.clone(),
        status: defaults.status.clone(),
    }
}

pub fn parse_file(path: &Path, defaults: &PostDefaults) -> Result<PostRow, ImportError> {
    let content = std::fs::read_to_string(path).map_err(|source| ImportError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(parse_post(&content, &file_name, defaults))
}
