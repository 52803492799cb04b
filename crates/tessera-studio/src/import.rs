//! Point files: JSON arrays of `[x, y]` pairs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed point file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("point file contains no points")]
    Empty,
}

/// Parses a JSON array of `[x, y]` pairs.
pub fn parse_points(text: &str) -> Result<Vec<[f64; 2]>, ImportError> {
    let points: Vec<[f64; 2]> = serde_json::from_str(text)?;
    if points.is_empty() {
        return Err(ImportError::Empty);
    }
    Ok(points)
}

/// Reads and parses the point file at `path`.
pub fn read_points(path: &Path) -> Result<Vec<[f64; 2]>, ImportError> {
    let text = fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let points = parse_points(&text)?;
    log::debug!("read {} points from {}", points.len(), path.display());
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs() {
        let pts = parse_points("[[0, 0], [10.5, 0], [10, 20]]").unwrap();
        assert_eq!(pts, vec![[0.0, 0.0], [10.5, 0.0], [10.0, 20.0]]);
    }

    #[test]
    fn rejects_malformed_payloads() {
        for bad in ["", "{}", "[[1, 2, 3]]", "[[1]]", "[[\"a\", 1]]", "[1, 2]", "not json"] {
            assert!(
                matches!(parse_points(bad), Err(ImportError::Parse(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn rejects_empty_array() {
        assert!(matches!(parse_points("[]"), Err(ImportError::Empty)));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_points(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ImportError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn reads_from_disk() {
        let path = std::env::temp_dir().join(format!("tessera-import-{}.json", std::process::id()));
        fs::write(&path, "[[1, 1], [2, 1], [1, 3]]").unwrap();
        let pts = read_points(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(pts.len(), 3);
    }
}
