use std::fs;
use std::path::Path;

use crate::error::TleError;
use crate::propagation::TleSatellite;

/// Split raw TLE text into `(name, line1, line2)` blocks.
///
/// Handles both 2-line (unnamed) and 3-line (named) entries; lines are
/// recognized by their `"1 "` / `"2 "` prefixes and anything else between
/// blocks is skipped.
pub fn parse_tle_blocks(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            result.push((
                Some(lines[i].to_string()),
                lines[i + 1].to_string(),
                lines[i + 2].to_string(),
            ));
            i += 3;
        } else {
            i += 1;
        }
    }

    result
}

/// Load every satellite from a TLE file. The file may hold any number of
/// 2- or 3-line entries.
pub fn load_tle_file(path: &Path) -> Result<Vec<TleSatellite>, TleError> {
    let content = fs::read_to_string(path)?;
    let filename = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let blocks = parse_tle_blocks(&content);
    let mut satellites = Vec::new();

    for (name, line1, line2) in blocks {
        match TleSatellite::from_tle(name, &line1, &line2) {
            Ok(sat) => satellites.push(sat),
            Err(e) => {
                log::warn!("skipping entry in {filename}: {e}");
            }
        }
    }

    if satellites.is_empty() {
        return Err(TleError::NoSatellites(filename));
    }

    Ok(satellites)
}
