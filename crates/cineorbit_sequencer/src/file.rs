// SPDX-License-Identifier: MIT OR Apache-2.0
//! Persisted sequence file format.
//!
//! The on-disk shape is a JSON wrapper `{version, exportedAt, blocks}`.
//! Import also accepts the legacy bare `BlockConfig[]` array, and sequence
//! entries may be bare type-key strings as a shorthand for a config with
//! only an id. A malformed file is rejected wholesale before the caller
//! mutates anything.

use chrono::{DateTime, Utc};
use cineorbit_motion::BlockConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current sequence file format version.
pub const SEQUENCE_FORMAT_VERSION: &str = "1.0";

/// The versioned wrapper written on export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceFile {
    /// Format version, currently `"1.0"`
    pub version: String,
    /// Export timestamp
    pub exported_at: DateTime<Utc>,
    /// The block sequence, in playback order
    pub blocks: Vec<BlockConfig>,
}

/// Why a sequence file was rejected.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The JSON is not a sequence file in any accepted shape, or an entry
    /// is not a block config.
    #[error("malformed sequence file: {0}")]
    Parse(#[from] serde_json::Error),
    /// An entry parsed but carries an empty block id.
    #[error("sequence entry {index} has an empty block id")]
    EmptyId {
        /// Zero-based position of the offending entry
        index: usize,
    },
}

/// One entry of an imported sequence: a full config or the legacy bare
/// type-key shorthand.
#[derive(Deserialize)]
#[serde(untagged)]
enum SequenceEntry {
    Shorthand(String),
    Config(BlockConfig),
}

impl SequenceEntry {
    fn into_config(self) -> BlockConfig {
        match self {
            Self::Shorthand(key) => BlockConfig::from_key(key),
            Self::Config(config) => config,
        }
    }
}

/// Either accepted file shape.
#[derive(Deserialize)]
#[serde(untagged)]
enum ImportedFile {
    Wrapped {
        version: String,
        blocks: Vec<SequenceEntry>,
    },
    Bare(Vec<SequenceEntry>),
}

/// Parse and validate a sequence file.
///
/// The wrapper and the legacy bare-array form produce identical sequences.
/// Every entry must carry a non-empty id; otherwise the whole import is
/// rejected and the working sequence stays untouched.
pub fn import_sequence(json: &str) -> Result<Vec<BlockConfig>, ImportError> {
    let entries = match serde_json::from_str::<ImportedFile>(json)? {
        ImportedFile::Wrapped { version, blocks } => {
            if version != SEQUENCE_FORMAT_VERSION {
                tracing::warn!(version = %version, "importing sequence with unrecognized version");
            }
            blocks
        }
        ImportedFile::Bare(blocks) => blocks,
    };

    let blocks: Vec<BlockConfig> = entries
        .into_iter()
        .map(SequenceEntry::into_config)
        .collect();

    for (index, block) in blocks.iter().enumerate() {
        if block.id.is_empty() {
            return Err(ImportError::EmptyId { index });
        }
    }

    tracing::info!(blocks = blocks.len(), "imported sequence");
    Ok(blocks)
}

/// Serialize a sequence into the versioned wrapper, stamped with the
/// current time.
pub fn export_sequence(blocks: &[BlockConfig]) -> Result<String, serde_json::Error> {
    let file = SequenceFile {
        version: SEQUENCE_FORMAT_VERSION.to_string(),
        exported_at: Utc::now(),
        blocks: blocks.to_vec(),
    };
    serde_json::to_string_pretty(&file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapper_and_bare_forms_are_equivalent() {
        let bare = r#"[{"id":"dolly","distanceDelta":1.0}]"#;
        let wrapped = r#"{
            "version": "1.0",
            "exportedAt": "2026-08-28T12:00:00Z",
            "blocks": [{"id":"dolly","distanceDelta":1.0}]
        }"#;
        let from_bare = import_sequence(bare).unwrap();
        let from_wrapped = import_sequence(wrapped).unwrap();
        assert_eq!(from_bare, from_wrapped);
        assert_eq!(from_bare[0].distance_delta, Some(1.0));
    }

    #[test]
    fn test_shorthand_entries_resolve_to_bare_configs() {
        let imported = import_sequence(r#"["dolly", {"id":"pan-3"}]"#).unwrap();
        assert_eq!(imported[0], BlockConfig::from_key("dolly"));
        assert_eq!(imported[1].id, "pan-3");
    }

    #[test]
    fn test_rejects_non_sequence_json() {
        assert!(matches!(
            import_sequence("42"),
            Err(ImportError::Parse(_))
        ));
        assert!(matches!(
            import_sequence(r#"{"blocks": "nope"}"#),
            Err(ImportError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_entry_without_id() {
        // Missing id field fails to parse as a block config at all.
        assert!(import_sequence(r#"[{"duration": 2.0}]"#).is_err());
        // Present but empty ids are caught by validation.
        assert!(matches!(
            import_sequence(r#"[{"id":"dolly"},{"id":""}]"#),
            Err(ImportError::EmptyId { index: 1 })
        ));
    }

    #[test]
    fn test_export_import_round_trip() {
        let blocks = vec![
            BlockConfig {
                id: "dolly-1".into(),
                duration: Some(2.5),
                distance_delta: Some(-1.0),
                ..BlockConfig::default()
            },
            BlockConfig::from_key("bezierCurve-2"),
        ];
        let json = export_sequence(&blocks).unwrap();
        assert!(json.contains("\"version\": \"1.0\""));
        assert!(json.contains("exportedAt"));
        let imported = import_sequence(&json).unwrap();
        assert_eq!(imported, blocks);
    }

    #[test]
    fn test_unknown_version_still_imports() {
        let json = r#"{"version":"2.7","exportedAt":"2026-08-28T12:00:00Z","blocks":["dolly"]}"#;
        let imported = import_sequence(json).unwrap();
        assert_eq!(imported.len(), 1);
    }
}
