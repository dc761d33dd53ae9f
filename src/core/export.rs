//! Handover document export.
//!
//! The finished document is written as a Markdown file the user can print
//! or convert to PDF with their own tooling.

use std::path::{Path, PathBuf};

use chrono::Local;

use super::interview::UserContext;

/// Write the handover document to `dir`, returning the path written.
///
/// The filename embeds the employee name and a timestamp so repeated
/// exports never clobber each other.
pub fn export_document(dir: &Path, user: &UserContext, document: &str) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let filename = format!("handover-{}-{stamp}.md", slug(&user.name));
    let path = dir.join(filename);
    std::fs::write(&path, document)?;

    tracing::debug!(path = %path.display(), "handover exported");
    Ok(path)
}

/// Filesystem-safe slug: lowercase alphanumerics, everything else collapsed
/// to single dashes.
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_dash = true;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("session");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alex() -> UserContext {
        UserContext::new("Alex Chen", "Senior Backend Engineer", "Platform Infrastructure")
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Alex Chen"), "alex-chen");
        assert_eq!(slug("  J. R. O'Neil  "), "j-r-o-neil");
        assert_eq!(slug("···"), "session");
    }

    #[test]
    fn test_export_writes_document_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let doc = "# Handover\n\n1. Executive Summary\n";

        let path = export_document(dir.path(), &alex(), doc).unwrap();

        assert!(path.file_name().unwrap().to_str().unwrap().starts_with("handover-alex-chen-"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), doc);
    }

    #[test]
    fn test_export_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports").join("2026");

        let path = export_document(&nested, &alex(), "doc").unwrap();
        assert!(path.exists());
    }
}
