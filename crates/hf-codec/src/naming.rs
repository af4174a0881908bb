//! Output file naming.

use crate::config::HuffConfig;
use crate::error::{HuffError, Result};
use std::path::{Path, PathBuf};

/// Insert `suffix` before the last `.` of the file name, or append it when
/// the name has no extension. Directory components are left alone and a
/// leading dot (`.profile`) does not count as an extension.
pub fn insert_suffix(path: &Path, suffix: &str) -> Result<PathBuf> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| HuffError::InvalidPath(path.display().to_string()))?;

    let renamed = match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}{suffix}{}", &name[..dot], &name[dot..]),
        _ => format!("{name}{suffix}"),
    };
    Ok(path.with_file_name(renamed))
}

pub fn compressed_path(src: &Path, config: &HuffConfig) -> Result<PathBuf> {
    insert_suffix(src, &config.compressed_suffix)
}

pub fn decompressed_path(src: &Path, config: &HuffConfig) -> Result<PathBuf> {
    insert_suffix(src, &config.decompressed_suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffixed(path: &str, suffix: &str) -> String {
        insert_suffix(Path::new(path), suffix).unwrap().display().to_string()
    }

    #[test]
    fn test_before_extension() {
        assert_eq!(suffixed("book.txt", "_compressed"), "book_compressed.txt");
    }

    #[test]
    fn test_last_dot_wins() {
        assert_eq!(suffixed("archive.tar.gz", "_compressed"), "archive.tar_compressed.gz");
    }

    #[test]
    fn test_no_extension() {
        assert_eq!(suffixed("README", "_compressed"), "README_compressed");
    }

    #[test]
    fn test_dotted_directory_ignored() {
        assert_eq!(suffixed("v1.2/notes", "_x"), "v1.2/notes_x");
    }

    #[test]
    fn test_leading_dot_file() {
        assert_eq!(suffixed(".profile", "_x"), ".profile_x");
    }

    #[test]
    fn test_original_chained_names() {
        let config = HuffConfig::default();
        let compressed = compressed_path(Path::new("test/plrabn12.txt"), &config).unwrap();
        let restored = decompressed_path(&compressed, &config).unwrap();
        assert_eq!(restored, Path::new("test/plrabn12_compressed_uncompressed.txt"));
    }

    #[test]
    fn test_no_file_name() {
        assert!(matches!(
            insert_suffix(Path::new("/"), "_x"),
            Err(HuffError::InvalidPath(_))
        ));
    }
}
