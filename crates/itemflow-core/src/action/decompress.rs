//! ZIP decompression: an archive item becomes the item of its first file entry.

use std::io::{Cursor, Read};

use crate::config::LimitsConfig;
use crate::error::ActionError;
use crate::item::{Item, Kind, Payload};
use crate::sniff::detect_classifier;

use super::Process;

/// Extracts the first file entry of a ZIP archive.
///
/// The entry's classifier is detected from its content and name, so the next
/// round can hand it to whichever action claims that kind.
pub struct DecompressAction {
    limits: LimitsConfig,
}

impl DecompressAction {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    fn extract_first_entry(&self, bytes: &[u8]) -> Result<(String, Vec<u8>), ActionError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ActionError::Archive(format!("Failed to open archive: {e}")))?;

        let mut first = None;
        let mut file_entries = 0usize;
        for index in 0..archive.len() {
            let entry = archive
                .by_index(index)
                .map_err(|e| ActionError::Archive(format!("Failed to read entry {index}: {e}")))?;
            if entry.is_dir() {
                continue;
            }
            file_entries += 1;
            if first.is_none() {
                first = Some(index);
            }
        }

        let index = first.ok_or(ActionError::EmptyArchive)?;
        if file_entries > 1 {
            tracing::warn!(
                "Archive holds {} file entries; only the first is extracted",
                file_entries
            );
        }

        let mut entry = archive
            .by_index(index)
            .map_err(|e| ActionError::Archive(format!("Failed to read entry {index}: {e}")))?;
        let name = entry.name().to_string();

        let max_bytes = self
            .limits
            .max_decompressed_size_mb
            .saturating_mul(1024 * 1024);
        let mut contents = Vec::new();
        entry
            .by_ref()
            .take(max_bytes.saturating_add(1))
            .read_to_end(&mut contents)
            .map_err(|e| ActionError::Archive(format!("Failed to decompress '{name}': {e}")))?;

        if contents.len() as u64 > max_bytes {
            return Err(ActionError::EntryTooLarge {
                name,
                size_mb: entry.size() / (1024 * 1024),
                max_mb: self.limits.max_decompressed_size_mb,
            });
        }

        Ok((name, contents))
    }
}

impl Default for DecompressAction {
    fn default() -> Self {
        Self::new(LimitsConfig::default())
    }
}

impl Process for DecompressAction {
    fn name(&self) -> &str {
        "decompress"
    }

    fn can_process(&self, item: &Item) -> bool {
        item.kind() == Kind::Compressed && matches!(item.payload(), Payload::Bytes(_))
    }

    fn process(&self, item: &Item) -> Result<Item, ActionError> {
        if item.kind() != Kind::Compressed {
            return Err(ActionError::Unsupported { kind: item.kind() });
        }
        let bytes = item
            .payload()
            .as_bytes()
            .ok_or(ActionError::UnexpectedPayload {
                expected: "bytes",
                found: item.payload().variant_name(),
            })?;

        let (name, contents) = self.extract_first_entry(bytes)?;
        let classifier = detect_classifier(&contents, Some(&name));
        tracing::trace!(
            "Extracted '{}' ({} bytes) as {}",
            name,
            contents.len(),
            classifier
        );
        Ok(Item::from_bytes(contents, classifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            for (name, data) in entries {
                if name.ends_with('/') {
                    writer
                        .add_directory(*name, SimpleFileOptions::default())
                        .unwrap();
                } else {
                    writer.start_file(*name, SimpleFileOptions::default()).unwrap();
                    writer.write_all(data).unwrap();
                }
            }
            writer.finish().unwrap();
        }
        buffer.into_inner()
    }

    #[test]
    fn test_claims_only_compressed_bytes() {
        let action = DecompressAction::default();
        assert!(action.can_process(&Item::from_bytes(zip_bytes(&[]), "zip")));
        assert!(!action.can_process(&Item::from_bytes(vec![], "json")));
        assert!(!action.can_process(&Item::new(Payload::Empty, "zip")));
    }

    #[test]
    fn test_extracts_json_entry() {
        let action = DecompressAction::default();
        let archive = zip_bytes(&[("data.json", &br#"{"a": 1}"#[..])]);

        let item = action.process(&Item::from_bytes(archive, "zip")).unwrap();
        assert_eq!(item.kind(), Kind::Json);
        assert_eq!(item.payload().as_bytes().unwrap(), br#"{"a": 1}"#);
    }

    #[test]
    fn test_skips_directories() {
        let action = DecompressAction::default();
        let archive = zip_bytes(&[("nested/", &b""[..]), ("nested/readme.txt", &b"hello"[..])]);

        let item = action.process(&Item::from_bytes(archive, "zip")).unwrap();
        assert_eq!(item.classifier(), "unknown");
        assert_eq!(item.payload().as_bytes().unwrap(), b"hello");
    }

    #[test]
    fn test_first_file_entry_wins() {
        let action = DecompressAction::default();
        let archive = zip_bytes(&[("a.json", &b"[]"[..]), ("b.txt", &b"text"[..])]);

        let item = action.process(&Item::from_bytes(archive, "zip")).unwrap();
        assert_eq!(item.classifier(), "json");
    }

    #[test]
    fn test_empty_archive() {
        let action = DecompressAction::default();
        let archive = zip_bytes(&[]);
        assert!(matches!(
            action.process(&Item::from_bytes(archive, "zip")),
            Err(ActionError::EmptyArchive)
        ));
    }

    #[test]
    fn test_corrupt_archive() {
        let action = DecompressAction::default();
        let item = Item::from_bytes(b"PK\x03\x04garbage".to_vec(), "zip");
        assert!(matches!(
            action.process(&item),
            Err(ActionError::Archive(_))
        ));
    }

    #[test]
    fn test_entry_size_limit() {
        let limits = LimitsConfig {
            max_decompressed_size_mb: 1,
            ..LimitsConfig::default()
        };
        let action = DecompressAction::new(limits);
        let big = vec![b' '; 1024 * 1024 + 1];
        let archive = zip_bytes(&[("big.json", big.as_slice())]);

        assert!(matches!(
            action.process(&Item::from_bytes(archive, "zip")),
            Err(ActionError::EntryTooLarge { .. })
        ));
    }

    #[test]
    fn test_huge_entry_limit_saturates() {
        let limits = LimitsConfig {
            max_decompressed_size_mb: u64::MAX / (1024 * 1024) + 1,
            ..LimitsConfig::default()
        };
        let action = DecompressAction::new(limits);
        let archive = zip_bytes(&[("data.json", &b"{}"[..])]);

        let item = action.process(&Item::from_bytes(archive, "zip")).unwrap();
        assert_eq!(item.payload().as_bytes().unwrap(), b"{}");
    }
}
