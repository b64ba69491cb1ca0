//! Projection of raw registry hits into display rows.

use crate::models::{DownloadCount, RawResult, ResultRecord};
use serde_json::{Map, Value};

/// Descriptions longer than this are ellipsized.
pub const MAX_DESCRIPTION_CHARS: usize = 80;

const ELLIPSIS: &str = "...";

/// Shorten `description` to fit [`MAX_DESCRIPTION_CHARS`].
///
/// Length is counted in chars, so multi-byte text is never split mid-character.
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() <= MAX_DESCRIPTION_CHARS {
        return description.to_string();
    }

    let keep = MAX_DESCRIPTION_CHARS - ELLIPSIS.len();
    let mut out: String = description.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Read the download counter out of a hit's additional metadata.
///
/// Accepts any casing of `downloadCount` and both numeric and string values,
/// since the two cmdlet families report it differently.
pub fn download_count(metadata: Option<&Map<String, Value>>) -> DownloadCount {
    let Some(metadata) = metadata else {
        return DownloadCount::NotAvailable;
    };

    let value = metadata
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("downloadCount"))
        .map(|(_, value)| value);

    let count = match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    count.map_or(DownloadCount::NotAvailable, DownloadCount::Count)
}

/// Project one raw hit.
pub fn project_result(raw: &RawResult) -> ResultRecord {
    ResultRecord {
        name: raw.name.clone(),
        version: raw.version.clone().unwrap_or_default(),
        description: truncate_description(raw.description.as_deref().unwrap_or_default()),
        author: raw.author.clone().unwrap_or_default(),
        download_count: download_count(raw.metadata.as_ref()),
    }
}

/// Project at most `limit` hits, keeping registry order.
pub fn project_results(raw: &[RawResult], limit: usize) -> Vec<ResultRecord> {
    raw.iter().take(limit).map(project_result).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(name: &str, metadata: Value) -> RawResult {
        RawResult {
            name: name.to_string(),
            version: Some("1.0.0".into()),
            description: Some("A module".into()),
            author: Some("someone".into()),
            metadata: metadata.as_object().cloned(),
        }
    }

    #[test]
    fn test_short_description_unchanged() {
        assert_eq!(truncate_description(""), "");
        assert_eq!(truncate_description("Pester testing"), "Pester testing");

        let exactly_80 = "x".repeat(80);
        assert_eq!(truncate_description(&exactly_80), exactly_80);
    }

    #[test]
    fn test_long_description_ellipsized() {
        let long = "abcdefghij".repeat(9);
        let out = truncate_description(&long);
        assert_eq!(out.chars().count(), 80);
        assert!(out.ends_with("..."));
        assert_eq!(&out[..77], &long[..77]);

        let out = truncate_description(&"y".repeat(81));
        assert_eq!(out, format!("{}...", "y".repeat(77)));
    }

    #[test]
    fn test_long_multibyte_description() {
        let long = "é".repeat(100);
        let out = truncate_description(&long);
        assert_eq!(out.chars().count(), 80);
        assert!(out.starts_with("éé"));
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_non_bmp_counts_as_one_char() {
        // 79 chars, 158 UTF-16 units: still within the limit
        let emoji = "📦".repeat(79);
        assert_eq!(truncate_description(&emoji), emoji);

        let out = truncate_description(&"📦".repeat(81));
        assert_eq!(out, format!("{}...", "📦".repeat(77)));
        assert_eq!(out.chars().count(), 80);
    }

    #[test]
    fn test_download_count_variants() {
        let numeric = json!({"downloadCount": 1234});
        assert_eq!(
            download_count(numeric.as_object()),
            DownloadCount::Count(1234)
        );

        let string = json!({"DownloadCount": " 987 "});
        assert_eq!(download_count(string.as_object()), DownloadCount::Count(987));

        let garbage = json!({"downloadCount": "lots"});
        assert_eq!(
            download_count(garbage.as_object()),
            DownloadCount::NotAvailable
        );

        let missing = json!({"published": "2024-01-01"});
        assert_eq!(
            download_count(missing.as_object()),
            DownloadCount::NotAvailable
        );
        assert_eq!(download_count(None), DownloadCount::NotAvailable);
    }

    #[test]
    fn test_project_result_fills_blanks() {
        let hit = RawResult {
            name: "Bare".into(),
            version: None,
            description: None,
            author: None,
            metadata: None,
        };
        let record = project_result(&hit);
        assert_eq!(record.name, "Bare");
        assert_eq!(record.version, "");
        assert_eq!(record.description, "");
        assert_eq!(record.download_count, DownloadCount::NotAvailable);
    }

    #[test]
    fn test_project_results_caps_and_keeps_order() {
        let hits: Vec<RawResult> = (0..12)
            .map(|i| raw(&format!("Mod{}", i), json!({"downloadCount": i})))
            .collect();

        let records = project_results(&hits, 5);
        assert_eq!(records.len(), 5);
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Mod0", "Mod1", "Mod2", "Mod3", "Mod4"]);

        let records = project_results(&hits[..3], 20);
        assert_eq!(records.len(), 3);

        assert!(project_results(&hits, 0).is_empty());
    }
}
