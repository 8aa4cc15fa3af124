//! File staging
//!
//! Accumulates user-selected report pages into named buckets before
//! submission: one `Selected` bucket in single mode, `Old`/`New` in
//! comparison mode. Append order is preserved, duplicates are allowed,
//! and no content validation happens here — the file dialog's extension
//! filter is a hint, not an enforcement point.

use std::fmt;

/// Which analysis operation the staged files are destined for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadMode {
    #[default]
    Single,
    Comparison,
}

/// Named staging buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Selected,
    Old,
    New,
}

/// A user-selected file held in memory, not yet submitted
#[derive(Clone, PartialEq)]
pub struct StagedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl StagedFile {
    /// Stage raw bytes under a file name, deriving the MIME hint from
    /// the extension
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = mime_for_name(&name).to_string();
        Self { name, mime, bytes }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Human-readable size for the upload list
    pub fn human_size(&self) -> String {
        let bytes = self.size();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}

impl fmt::Debug for StagedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagedFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("size", &self.size())
            .finish()
    }
}

/// MIME hint by extension; unknown extensions stay opaque
pub fn mime_for_name(name: &str) -> &'static str {
    let ext = name.rsplit('.').next().unwrap_or_default().to_lowercase();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

/// In-memory staging area for the current upload
#[derive(Debug, Clone, Default)]
pub struct FileStaging {
    mode: UploadMode,
    selected: Vec<StagedFile>,
    old: Vec<StagedFile>,
    new: Vec<StagedFile>,
}

impl FileStaging {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> UploadMode {
        self.mode
    }

    /// Switch modes; all buckets are cleared, never silently carried over
    pub fn set_mode(&mut self, mode: UploadMode) {
        self.mode = mode;
        self.selected.clear();
        self.old.clear();
        self.new.clear();
    }

    /// Append files to a bucket, preserving input order
    pub fn add(&mut self, bucket: Bucket, files: Vec<StagedFile>) {
        self.bucket_mut(bucket).extend(files);
    }

    /// Remove the entry at `index`; later entries shift down by one
    pub fn remove(&mut self, bucket: Bucket, index: usize) {
        let files = self.bucket_mut(bucket);
        if index < files.len() {
            files.remove(index);
        }
    }

    pub fn clear(&mut self, bucket: Bucket) {
        self.bucket_mut(bucket).clear();
    }

    pub fn files(&self, bucket: Bucket) -> &[StagedFile] {
        match bucket {
            Bucket::Selected => &self.selected,
            Bucket::Old => &self.old,
            Bucket::New => &self.new,
        }
    }

    /// Whether the active mode's required buckets are all non-empty
    pub fn can_submit(&self) -> bool {
        match self.mode {
            UploadMode::Single => !self.selected.is_empty(),
            UploadMode::Comparison => !self.old.is_empty() && !self.new.is_empty(),
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<StagedFile> {
        match bucket {
            Bucket::Selected => &mut self.selected,
            Bucket::Old => &mut self.old,
            Bucket::New => &mut self.new,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> StagedFile {
        StagedFile::new(name, vec![0u8; 16])
    }

    #[test]
    fn test_order_preserved_after_remove() {
        let mut staging = FileStaging::new();
        staging.add(Bucket::Selected, vec![file("page1.jpg"), file("page2.jpg")]);
        staging.remove(Bucket::Selected, 0);

        let names: Vec<_> = staging
            .files(Bucket::Selected)
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["page2.jpg"]);
    }

    #[test]
    fn test_duplicates_allowed() {
        let mut staging = FileStaging::new();
        staging.add(Bucket::Selected, vec![file("scan.png"), file("scan.png")]);
        assert_eq!(staging.files(Bucket::Selected).len(), 2);
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut staging = FileStaging::new();
        staging.add(Bucket::Old, vec![file("a.pdf")]);
        staging.remove(Bucket::Old, 7);
        assert_eq!(staging.files(Bucket::Old).len(), 1);
    }

    #[test]
    fn test_mode_switch_clears_everything() {
        let mut staging = FileStaging::new();
        staging.add(Bucket::Selected, vec![file("a.pdf")]);
        staging.set_mode(UploadMode::Comparison);
        staging.add(Bucket::Old, vec![file("b.pdf")]);
        staging.add(Bucket::New, vec![file("c.pdf")]);

        staging.set_mode(UploadMode::Single);
        for bucket in [Bucket::Selected, Bucket::Old, Bucket::New] {
            assert!(staging.files(bucket).is_empty());
        }
    }

    #[test]
    fn test_can_submit_single() {
        let mut staging = FileStaging::new();
        assert!(!staging.can_submit());
        staging.add(Bucket::Selected, vec![file("a.pdf")]);
        assert!(staging.can_submit());
    }

    #[test]
    fn test_can_submit_comparison_needs_both_buckets() {
        let mut staging = FileStaging::new();
        staging.set_mode(UploadMode::Comparison);
        staging.add(Bucket::Old, vec![file("old.pdf")]);
        assert!(!staging.can_submit());
        staging.add(Bucket::New, vec![file("new.pdf")]);
        assert!(staging.can_submit());
    }

    #[test]
    fn test_mime_hints() {
        assert_eq!(mime_for_name("report.PDF"), "application/pdf");
        assert_eq!(mime_for_name("scan.jpeg"), "image/jpeg");
        assert_eq!(mime_for_name("weird.bin"), "application/octet-stream");
        assert_eq!(mime_for_name("noextension"), "application/octet-stream");
    }

    #[test]
    fn test_human_size() {
        assert_eq!(StagedFile::new("a", vec![0; 512]).human_size(), "512 B");
        assert_eq!(StagedFile::new("b", vec![0; 2048]).human_size(), "2.0 KB");
    }
}
