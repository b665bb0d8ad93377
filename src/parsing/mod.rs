//! Readers and writers for the two on-disk formats.
//!
//! - **Statistics lines** ([`stats`]): one whitespace-delimited line of
//!   aggregable fields per segment, see [`stats::encode_stats`]
//! - **Snapshot lines** ([`snapshot`]): one JSON [`AlignmentSnapshot`] per line
//!
//! Both accept `-` for stdin and transparently decompress `.gz` files.
//!
//! ## Example
//!
//! ```rust,no_run
//! use meteor_scorer::parsing::stats::parse_stats_file;
//! use std::path::Path;
//!
//! let segments = parse_stats_file(Path::new("segments.stats.gz")).unwrap();
//! println!("{} segments", segments.len());
//! ```
//!
//! [`AlignmentSnapshot`]: crate::core::AlignmentSnapshot

pub mod snapshot;
pub mod stats;

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;

pub use stats::ParseError;

/// Read a whole input as text: `-` is stdin, `.gz`/`.bgz` files are gunzipped
///
/// # Errors
///
/// Returns `ParseError::Io` if the input cannot be read or decompressed.
pub fn read_input(path: &Path) -> Result<String, ParseError> {
    let mut buffer = String::new();
    if path.to_string_lossy() == "-" {
        std::io::stdin().read_to_string(&mut buffer)?;
    } else if is_gzipped(path) {
        let file = std::fs::File::open(path)?;
        GzDecoder::new(file).read_to_string(&mut buffer)?;
    } else {
        buffer = std::fs::read_to_string(path)?;
    }
    Ok(buffer)
}

fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_is_gzipped() {
        assert!(is_gzipped(Path::new("a.stats.gz")));
        assert!(is_gzipped(Path::new("A.STATS.BGZ")));
        assert!(!is_gzipped(Path::new("a.stats")));
    }

    #[test]
    fn test_read_gzipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt.gz");
        let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b"1 2 3\n").unwrap();
        encoder.finish().unwrap();

        assert_eq!(read_input(&path).unwrap(), "1 2 3\n");
    }

    #[test]
    fn test_read_missing_file() {
        assert!(matches!(
            read_input(Path::new("/nonexistent/input.stats")),
            Err(ParseError::Io(_))
        ));
    }
}
