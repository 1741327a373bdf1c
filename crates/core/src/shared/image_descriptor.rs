use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One displayable image: where it lives and its intrinsic pixel size.
///
/// `url` is usually a path relative to the detection service origin
/// (e.g. `/static/img/1.jpg`); absolute `http(s)` URLs are used as-is.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl ImageDescriptor {
    pub fn new(url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            url: url.into(),
            width,
            height,
        }
    }

    pub fn is_absolute(&self) -> bool {
        self.url.starts_with("http://") || self.url.starts_with("https://")
    }
}

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads a gallery manifest: a JSON array of image descriptors.
pub fn load_manifest(path: &Path) -> Result<Vec<ImageDescriptor>, ManifestError> {
    let json = fs::read_to_string(path).map_err(|e| ManifestError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&json).map_err(|e| ManifestError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case::relative("/img/1.jpg", false)]
    #[case::http("http://example.com/a.png", true)]
    #[case::https("https://example.com/a.png", true)]
    fn test_is_absolute(#[case] url: &str, #[case] expected: bool) {
        assert_eq!(ImageDescriptor::new(url, 1, 1).is_absolute(), expected);
    }

    #[test]
    fn test_load_manifest_preserves_order_and_duplicates() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gallery.json");
        fs::write(
            &path,
            r#"[
                {"url": "/img/2.jpg", "width": 640, "height": 480},
                {"url": "/img/1.jpg", "width": 320, "height": 240},
                {"url": "/img/2.jpg", "width": 640, "height": 480}
            ]"#,
        )
        .unwrap();

        let images = load_manifest(&path).unwrap();
        assert_eq!(images.len(), 3);
        assert_eq!(images[0], ImageDescriptor::new("/img/2.jpg", 640, 480));
        assert_eq!(images[1], ImageDescriptor::new("/img/1.jpg", 320, 240));
        assert_eq!(images[2], images[0]);
    }

    #[test]
    fn test_load_manifest_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = load_manifest(&tmp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ManifestError::Read { .. }));
    }

    #[test]
    fn test_load_manifest_invalid_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gallery.json");
        fs::write(&path, r#"{"url": "/img/1.jpg"}"#).unwrap();
        let err = load_manifest(&path).unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));
    }
}
