use chrono::{DateTime, Utc};

use crate::types::PassWindow;

/// Timestamps are rendered in UTC with second precision.
fn format_utc(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// CSV with the `#,AOS,LOS,Duration` column layout.
pub fn to_csv(passes: &[PassWindow]) -> String {
    let mut out = String::from("#,AOS,LOS,Duration\n");
    for (idx, w) in passes.iter().enumerate() {
        out.push_str(&format!(
            "{},{},{},{:.0}\n",
            idx + 1,
            format_utc(w.aos),
            format_utc(w.los),
            w.duration_seconds
        ));
    }
    out
}

/// JSON array of `{aos, los, duration_seconds}` objects.
pub fn to_json(passes: &[PassWindow]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(passes)
}

/// CSV for passes from several satellites: one header, a satellite column,
/// and pass numbering that runs across the whole set.
pub fn to_csv_grouped(groups: &[(String, Vec<PassWindow>)]) -> String {
    let mut out = String::from("#,Satellite,AOS,LOS,Duration\n");
    let mut idx = 0;
    for (satellite, passes) in groups {
        for w in passes {
            idx += 1;
            out.push_str(&format!(
                "{},{},{},{},{:.0}\n",
                idx,
                satellite,
                format_utc(w.aos),
                format_utc(w.los),
                w.duration_seconds
            ));
        }
    }
    out
}

/// One JSON array with a `{satellite, passes}` object per satellite, so
/// multi-satellite output stays a single valid document.
pub fn to_json_grouped(groups: &[(String, Vec<PassWindow>)]) -> serde_json::Result<String> {
    #[derive(serde::Serialize)]
    struct Group<'a> {
        satellite: &'a str,
        passes: &'a [PassWindow],
    }
    let groups: Vec<Group> = groups
        .iter()
        .map(|(satellite, passes)| Group {
            satellite: satellite.as_str(),
            passes: passes.as_slice(),
        })
        .collect();
    serde_json::to_string_pretty(&groups)
}

/// Human-readable listing for the terminal.
pub fn to_table(passes: &[PassWindow]) -> String {
    let mut out = String::new();
    for (idx, w) in passes.iter().enumerate() {
        out.push_str(&format!(
            "Pass {}:\n  AOS: {}\n  LOS: {}\n  Duration: {:.0} seconds\n",
            idx + 1,
            format_utc(w.aos),
            format_utc(w.los),
            w.duration_seconds
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_passes() -> Vec<PassWindow> {
        let aos: DateTime<Utc> = "2024-02-13T00:02:00Z".parse().unwrap();
        vec![PassWindow {
            aos,
            los: aos + Duration::seconds(370),
            duration_seconds: 370.0,
        }]
    }

    #[test]
    fn csv_has_header_and_second_precision_timestamps() {
        let csv = to_csv(&sample_passes());
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("#,AOS,LOS,Duration"));
        assert_eq!(
            lines.next(),
            Some("1,2024-02-13 00:02:00 UTC,2024-02-13 00:08:10 UTC,370")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn json_is_an_array_of_records() {
        let json = to_json(&sample_passes()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["duration_seconds"], 370.0);
        assert!(records[0]["aos"].is_string());
        assert!(records[0]["los"].is_string());
    }

    #[test]
    fn grouped_csv_has_one_header_and_a_satellite_column() {
        let groups = vec![
            ("ISS (ZARYA)".to_string(), sample_passes()),
            ("NOAA 19".to_string(), sample_passes()),
        ];
        let csv = to_csv_grouped(&groups);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "#,Satellite,AOS,LOS,Duration");
        assert_eq!(
            lines[1],
            "1,ISS (ZARYA),2024-02-13 00:02:00 UTC,2024-02-13 00:08:10 UTC,370"
        );
        // Numbering continues across satellites instead of restarting.
        assert!(lines[2].starts_with("2,NOAA 19,"));
    }

    #[test]
    fn grouped_json_is_a_single_document() {
        let groups = vec![
            ("ISS (ZARYA)".to_string(), sample_passes()),
            ("NOAA 19".to_string(), sample_passes()),
        ];
        let json = to_json_grouped(&groups).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["satellite"], "ISS (ZARYA)");
        assert_eq!(records[1]["passes"][0]["duration_seconds"], 370.0);
    }

    #[test]
    fn empty_pass_list_serializes_cleanly() {
        assert_eq!(to_csv(&[]), "#,AOS,LOS,Duration\n");
        assert_eq!(to_json(&[]).unwrap(), "[]");
        assert_eq!(to_table(&[]), "");
    }
}
