//! Storage of uploaded leaf images

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Reduce a client-supplied file name to a safe ASCII name.
///
/// Path separators become `_`, anything outside `[A-Za-z0-9._-]` is dropped
/// and leading dots or underscores are trimmed. May return an empty string.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ' ' => '_',
            other => other,
        })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Destination for an upload; a random prefix keeps uploads from clobbering each other
pub fn upload_path(dir: &Path, original_name: &str) -> PathBuf {
    let safe = sanitize_filename(original_name);
    let safe = if safe.is_empty() { "upload".to_string() } else { safe };
    let prefix = Uuid::new_v4().simple().to_string();
    dir.join(format!("{}_{}", &prefix[..8], safe))
}

pub async fn save_upload(dir: &Path, original_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = upload_path(dir, original_name);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}
