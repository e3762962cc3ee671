use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single file as reported by the backend index.
///
/// `id` is the backend's opaque identifier and is the only value ever sent
/// back when requesting a deletion. Optional fields are omitted by older
/// backends and default to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    pub path: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// A set of files that share a content hash.
///
/// The backend guarantees at least two files per group and sorts groups by
/// `reclaimable_size` descending. `suggested_keep_id` names the copy the
/// backend recommends keeping (currently the oldest); it is a hint, not a
/// constraint the client re-derives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub hash: String,
    pub files: Vec<FileRecord>,
    pub total_size: u64,
    pub reclaimable_size: u64,
    pub suggested_keep_id: String,
}

/// Lifecycle phase of a backend scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanState {
    #[default]
    Idle,
    Scanning,
    Complete,
    Error,
}

impl ScanState {
    /// Complete and error both end a scan; polling stops on either.
    pub fn is_terminal(self) -> bool {
        matches!(self, ScanState::Complete | ScanState::Error)
    }
}

/// Progress snapshot returned by the scan-status endpoint.
///
/// `total_files` is unknown during the enumeration pass, so progress must
/// render sensibly without it. `message` carries the failure text when
/// `status` is `Error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanStatus {
    pub status: ScanState,
    #[serde(default)]
    pub files_scanned: u64,
    #[serde(default)]
    pub total_files: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Result of a bulk delete. Partial failure is expected: some files vanish
/// or lock between selection and deletion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub deleted: Vec<String>,
    pub failed: Vec<DeleteFailure>,
}

/// One file the backend could not delete, with its reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteFailure {
    pub id: String,
    pub error: String,
}

/// The signed-in account, for the dashboard header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Aggregate numbers for the dashboard header strip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_files: u64,
    pub duplicate_groups: u64,
    pub total_reclaimable_size: u64,
    pub scan_status: ScanState,
}

/// Optional narrowing criteria for the duplicates listing.
///
/// Fields map one-to-one onto query parameters; `None`/empty fields are
/// omitted from the request entirely rather than sent blank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DuplicatesFilter {
    /// Minimum file size in bytes.
    pub min_size: Option<u64>,
    /// File extensions without dots, e.g. `["jpg", "png"]`. Joined with
    /// commas on the wire.
    pub extensions: Vec<String>,
    /// Restrict results to files under this folder path.
    pub folder_path: Option<String>,
}

impl DuplicatesFilter {
    /// Filter that only narrows by folder, the common interactive case.
    pub fn folder(path: impl Into<String>) -> Self {
        DuplicatesFilter {
            folder_path: Some(path.into()),
            ..DuplicatesFilter::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_size.is_none() && self.extensions.is_empty() && self.folder_path.is_none()
    }

    /// Encodes the filter as query pairs, skipping unset fields.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(min) = self.min_size {
            pairs.push(("min_size", min.to_string()));
        }
        if !self.extensions.is_empty() {
            pairs.push(("extensions", self.extensions.join(",")));
        }
        if let Some(folder) = &self.folder_path {
            pairs.push(("folder_path", folder.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_produces_no_pairs() {
        assert!(DuplicatesFilter::default().query_pairs().is_empty());
        assert!(DuplicatesFilter::default().is_empty());
    }

    #[test]
    fn full_filter_encodes_every_field() {
        let filter = DuplicatesFilter {
            min_size: Some(1024),
            extensions: vec!["jpg".into(), "png".into()],
            folder_path: Some("/photos/2024".into()),
        };
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("min_size", "1024".to_string()),
                ("extensions", "jpg,png".to_string()),
                ("folder_path", "/photos/2024".to_string()),
            ]
        );
    }

    #[test]
    fn scan_state_uses_lowercase_on_the_wire() {
        let status: ScanStatus =
            serde_json::from_str(r#"{"status":"scanning","files_scanned":42}"#)
                .expect("valid status json");
        assert_eq!(status.status, ScanState::Scanning);
        assert_eq!(status.files_scanned, 42);
        assert_eq!(status.total_files, None);
        assert!(!status.status.is_terminal());
        assert!(ScanState::Complete.is_terminal());
        assert!(ScanState::Error.is_terminal());
    }

    #[test]
    fn group_decodes_with_optional_file_fields_missing() {
        let json = r#"{
            "hash": "abc123",
            "files": [
                {"id": "f1", "name": "a.jpg", "path": "/a.jpg", "size": 10,
                 "last_modified": "2024-05-01T12:00:00Z"},
                {"id": "f2", "name": "b.jpg", "path": "/b.jpg", "size": 10,
                 "last_modified": "2024-06-01T12:00:00Z", "mime_type": "image/jpeg"}
            ],
            "total_size": 20,
            "reclaimable_size": 10,
            "suggested_keep_id": "f1"
        }"#;
        let group: DuplicateGroup = serde_json::from_str(json).expect("valid group json");
        assert_eq!(group.files.len(), 2);
        assert_eq!(group.files[0].hash, None);
        assert_eq!(group.files[1].mime_type.as_deref(), Some("image/jpeg"));
        assert_eq!(group.suggested_keep_id, "f1");
    }
}
