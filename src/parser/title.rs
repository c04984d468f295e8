use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

static H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^# (.+)$").unwrap());

/// Text of the first `# ` heading, or the file stem when there is none.
pub fn extract(content: &str, file_name: &str) -> String {
    H1_RE
        .captures(content)
        .map(|cap| cap[1].trim().to_string())
        .unwrap_or_else(|| file_stem(file_name))
}

fn file_stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}
