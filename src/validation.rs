//! Input checks the presentation layer runs before asking the store to mutate.
//! The store itself does not validate.

use crate::remote::UploadFile;
use std::path::Path;

/// Characters that may not appear in a folder or file name.
pub const FORBIDDEN_NAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Extensions accepted for upload, lowercase with the leading dot.
pub const ALLOWED_UPLOAD_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".txt"];

/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Validate an item name, returning it trimmed.
pub fn validate_item_name(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Name is required".to_string());
    }
    if let Some(c) = trimmed.chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c)) {
        return Err(format!("Name cannot contain '{}'", c));
    }
    // Trailing spaces are already trimmed away; only the dot can remain.
    if trimmed.ends_with('.') {
        return Err("Name cannot end with a period or space".to_string());
    }
    Ok(trimmed.to_string())
}

/// Split `name` into stem and extension (with its dot). Names without a dot, or
/// whose only dot is the first character, have no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(i) if i > 0 => name.split_at(i),
        _ => (name, ""),
    }
}

/// Extension of `name`, lowercased, with its dot.
pub fn extension_of(name: &str) -> String {
    split_extension(name).1.to_ascii_lowercase()
}

/// Files accepted for upload plus one `"<name>: <reason>"` message per rejection.
#[derive(Debug, Default)]
pub struct UploadCandidates {
    pub accepted: Vec<UploadFile>,
    pub rejected: Vec<String>,
}

impl UploadCandidates {
    /// Check `files` against the upload rules. `already_selected` holds files
    /// picked earlier; a file with the same name and size as one of those, or as
    /// one accepted earlier in `files`, is a duplicate.
    pub fn screen(files: Vec<UploadFile>, already_selected: &[UploadFile]) -> Self {
        let mut out = UploadCandidates::default();
        for file in files {
            out.admit(file, already_selected);
        }
        out
    }

    /// Screen files on disk. Type and size are judged from the path and its
    /// metadata, so a file is only read once it passes both. Paths that are not
    /// readable regular files are rejected rather than failing the batch.
    pub fn screen_paths<P: AsRef<Path>>(paths: &[P], already_selected: &[UploadFile]) -> Self {
        let mut out = UploadCandidates::default();
        for path in paths {
            let path = path.as_ref();
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => {
                    out.rejected.push(format!("{}: Not a file", path.display()));
                    continue;
                }
            };
            let size = match std::fs::metadata(path) {
                Ok(meta) if meta.is_file() => meta.len(),
                Ok(_) => {
                    out.rejected.push(format!("{}: Not a regular file", name));
                    continue;
                }
                Err(e) => {
                    out.rejected.push(format!("{}: {}", name, e));
                    continue;
                }
            };
            if let Some(reason) = rule_rejection(&name, size) {
                out.rejected.push(format!("{}: {}", name, reason));
                continue;
            }
            match UploadFile::from_path(path) {
                Ok(file) => out.admit(file, already_selected),
                Err(e) => out.rejected.push(format!("{}: {}", name, e)),
            }
        }
        out
    }

    fn admit(&mut self, file: UploadFile, already_selected: &[UploadFile]) {
        let reason = rule_rejection(&file.name, file.size()).or_else(|| {
            let duplicate = already_selected
                .iter()
                .chain(&self.accepted)
                .any(|f| f.name == file.name && f.size() == file.size());
            duplicate.then(|| "File is already selected".to_string())
        });
        match reason {
            Some(reason) => self.rejected.push(format!("{}: {}", file.name, reason)),
            None => self.accepted.push(file),
        }
    }
}

/// Type and size rules, which need only the name and the byte count.
fn rule_rejection(name: &str, size: u64) -> Option<String> {
    if !ALLOWED_UPLOAD_EXTENSIONS.contains(&extension_of(name).as_str()) {
        return Some(format!(
            "File type not allowed. Allowed types: {}",
            ALLOWED_UPLOAD_EXTENSIONS.join(", ")
        ));
    }
    (size > MAX_UPLOAD_BYTES).then(|| "File exceeds the 10 MB limit".to_string())
}
