//! File intake: extension allow-listing and the per-role file slots.
//!
//! A candidate path becomes a [`FileSlot`] only if its name passes the
//! [`AllowList`] and it points at a regular file. A rejected candidate leaves
//! every existing slot untouched.

use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_ACCEPT: &str = ".pdf,.txt,.docx";

/// Which upload a slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRole {
    Resume,
    JobDescription,
}

impl SlotRole {
    pub fn label(self) -> &'static str {
        match self {
            SlotRole::Resume => "Resume",
            SlotRole::JobDescription => "Job Description",
        }
    }

    /// Multipart field name used for this role.
    pub fn field_name(self) -> &'static str {
        match self {
            SlotRole::Resume => "resume",
            SlotRole::JobDescription => "job_description",
        }
    }
}

/// Ordered set of lowercase extensions (each with a leading dot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    extensions: Vec<String>,
}

impl AllowList {
    /// Parse a comma-separated list such as `.pdf,.txt,.docx`.
    pub fn parse(spec: &str) -> Self {
        let mut extensions: Vec<String> = Vec::new();
        for raw in spec.split(',') {
            let ext = raw.trim().to_lowercase();
            if ext.is_empty() || ext == "." {
                continue;
            }
            let ext = if ext.starts_with('.') {
                ext
            } else {
                format!(".{ext}")
            };
            if !extensions.contains(&ext) {
                extensions.push(ext);
            }
        }
        Self { extensions }
    }

    pub fn accepts(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.extensions.iter().any(|ext| lower.ends_with(ext.as_str()))
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Human-readable form, e.g. `.pdf / .txt / .docx`.
    pub fn describe(&self) -> String {
        self.extensions().join(" / ")
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::parse(DEFAULT_ACCEPT)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("{name} is not an accepted file type ({allowed})")]
    Extension { name: String, allowed: String },
    #[error("{path} has no file name")]
    NoFileName { path: String },
    #[error("cannot read {path}: {reason}")]
    Unreadable { path: String, reason: String },
    #[error("{path} is not a regular file")]
    NotAFile { path: String },
}

/// One selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSlot {
    pub name: String,
    pub size_bytes: u64,
    pub path: PathBuf,
}

impl FileSlot {
    /// Accept `candidate` if it passes the allow-list and is a readable regular file.
    pub fn try_select(candidate: &Path, allow: &AllowList) -> Result<FileSlot, Rejection> {
        let name = candidate
            .file_name()
            .and_then(|n| n.to_str())
            .map(|s| s.to_string())
            .ok_or_else(|| Rejection::NoFileName {
                path: candidate.display().to_string(),
            })?;

        if !allow.accepts(&name) {
            return Err(Rejection::Extension {
                name,
                allowed: allow.describe(),
            });
        }

        let meta = std::fs::metadata(candidate).map_err(|e| Rejection::Unreadable {
            path: candidate.display().to_string(),
            reason: e.to_string(),
        })?;
        if !meta.is_file() {
            return Err(Rejection::NotAFile {
                path: candidate.display().to_string(),
            });
        }

        Ok(FileSlot {
            name,
            size_bytes: meta.len(),
            path: candidate.to_path_buf(),
        })
    }

    /// Display form used by the slot widgets: `resume.pdf (12 KB)`.
    pub fn display_name(&self) -> String {
        format!(
            "{} ({} KB)",
            self.name,
            (self.size_bytes as f64 / 1024.0).round() as u64
        )
    }

    /// MIME type sent with the multipart part.
    pub fn mime_type(&self) -> &'static str {
        let lower = self.name.to_lowercase();
        if lower.ends_with(".pdf") {
            "application/pdf"
        } else if lower.ends_with(".txt") {
            "text/plain"
        } else if lower.ends_with(".docx") {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        } else {
            "application/octet-stream"
        }
    }
}

/// Turn typed or dropped text into a candidate path.
///
/// Terminals deliver a dropped file as a paste of its path, sometimes quoted,
/// with backslash-escaped spaces, or as a `file://` URL.
pub fn candidate_from_input(raw: &str) -> Option<PathBuf> {
    let mut s = raw.trim();
    if s.len() >= 2
        && ((s.starts_with('\'') && s.ends_with('\'')) || (s.starts_with('"') && s.ends_with('"')))
    {
        s = &s[1..s.len() - 1];
    }
    let s = s.strip_prefix("file://").unwrap_or(s);
    if s.is_empty() {
        return None;
    }
    Some(PathBuf::from(s.replace("\\ ", " ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_normalizes_entries() {
        let allow = AllowList::parse(" .PDF, txt,,.docx, .pdf ");
        assert_eq!(allow.extensions(), &[".pdf", ".txt", ".docx"]);
    }

    #[test]
    fn accepts_is_case_insensitive_suffix_match() {
        let allow = AllowList::default();
        assert!(allow.accepts("Resume.PDF"));
        assert!(allow.accepts("jd.docx"));
        assert!(!allow.accepts("notes.csv"));
        assert!(!allow.accepts("pdf"));
        assert!(!allow.accepts("archive.pdf.zip"));
    }

    #[test]
    fn rejected_names_never_touch_the_filesystem() {
        let allow = AllowList::default();
        let err = FileSlot::try_select(Path::new("/does/not/exist/notes.csv"), &allow).unwrap_err();
        assert!(matches!(err, Rejection::Extension { .. }));
    }

    #[test]
    fn accepted_file_carries_name_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.pdf");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(&[0u8; 2048]).unwrap();

        let slot = FileSlot::try_select(&path, &AllowList::default()).unwrap();
        assert_eq!(slot.name, "resume.pdf");
        assert_eq!(slot.size_bytes, 2048);
        assert_eq!(slot.display_name(), "resume.pdf (2 KB)");
        assert_eq!(slot.mime_type(), "application/pdf");
    }

    #[test]
    fn missing_or_directory_candidates_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let allow = AllowList::parse(".txt");
        let missing = dir.path().join("gone.txt");
        assert!(matches!(
            FileSlot::try_select(&missing, &allow),
            Err(Rejection::Unreadable { .. })
        ));

        let sub = dir.path().join("folder.txt");
        std::fs::create_dir(&sub).unwrap();
        assert!(matches!(
            FileSlot::try_select(&sub, &allow),
            Err(Rejection::NotAFile { .. })
        ));
    }

    #[test]
    fn dropped_paths_are_unquoted() {
        assert_eq!(
            candidate_from_input("  '/tmp/my resume.pdf'\n"),
            Some(PathBuf::from("/tmp/my resume.pdf"))
        );
        assert_eq!(
            candidate_from_input("/tmp/my\\ cv.txt"),
            Some(PathBuf::from("/tmp/my cv.txt"))
        );
        assert_eq!(
            candidate_from_input("file:///home/u/jd.docx"),
            Some(PathBuf::from("/home/u/jd.docx"))
        );
        assert_eq!(candidate_from_input("   "), None);
    }
}
