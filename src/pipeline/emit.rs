//! Data-file output: a variable assignment followed by a JSON array.
//!
//! The front-end loads the file as a plain `<script>`, so the array is
//! prefixed with an assignment such as `rawGameData=`. No trailing newline
//! is written.

use crate::error::GameDataError;
use crate::output::GameRecord;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Render the data-file contents for `records`.
pub fn render_game_data(prefix: &str, records: &[GameRecord]) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(records)?;
    Ok(format!("{prefix}{json}"))
}

/// Parse data-file contents back into records.
///
/// The prefix is optional so plain JSON arrays are accepted too.
pub fn parse_game_data(prefix: &str, contents: &str) -> Result<Vec<GameRecord>, serde_json::Error> {
    let json = contents.strip_prefix(prefix).unwrap_or(contents);
    serde_json::from_str(json)
}

/// Write the data file atomically (temp file in the same directory + rename).
///
/// A failure at any point leaves a previously written file untouched.
pub fn write_game_data(
    path: &Path,
    prefix: &str,
    records: &[GameRecord],
) -> Result<(), GameDataError> {
    let write_err = |source: io::Error| GameDataError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let contents = render_game_data(prefix, records).map_err(|e| write_err(io::Error::other(e)))?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    info!(
        "Wrote {} records ({} bytes) to {}",
        records.len(),
        contents.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<GameRecord> {
        vec![GameRecord {
            image: "images/image1.png.jpg".into(),
            title: "Pato, pato, ganso".into(),
            objective: "Atrapar al ganso".into(),
            description: "Se juega en ronda \"sentados\".".into(),
        }]
    }

    #[test]
    fn render_uses_prefix_and_field_order() {
        let out = render_game_data("rawGameData=", &sample()).unwrap();
        assert!(out.starts_with("rawGameData=[{\"image\":"), "got: {out}");
        let image = out.find("\"image\"").unwrap();
        let title = out.find("\"title\"").unwrap();
        let objective = out.find("\"objective\"").unwrap();
        let description = out.find("\"description\"").unwrap();
        assert!(image < title && title < objective && objective < description);
        assert!(!out.ends_with('\n'));
    }

    #[test]
    fn empty_list_renders_empty_array() {
        assert_eq!(render_game_data("x=", &[]).unwrap(), "x=[]");
    }

    #[test]
    fn written_file_parses_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/games.js");
        write_game_data(&path, "rawGameData=", &sample()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(parse_game_data("rawGameData=", &contents).unwrap(), sample());
    }

    #[test]
    fn rewrite_replaces_previous_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("games.js");
        std::fs::write(&path, "rawGameData=[1,2,3]").unwrap();

        write_game_data(&path, "rawGameData=", &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "rawGameData=[]");
    }
}
