use anyhow::{Context, Result};
use chrono::NaiveDate;
use playdex_engine::constants::PLAY_DATE_FORMAT;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

pub fn parse_day(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), PLAY_DATE_FORMAT)
        .with_context(|| format!("invalid date {raw:?}, expected YYYY-MM-DD"))
}

/// Quote a CSV field when it contains a delimiter, quote or newline.
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
