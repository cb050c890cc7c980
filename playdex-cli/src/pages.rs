//! Decoded play pages on disk.
//!
//! A play history is exported as numbered pages `plays_1.json`,
//! `plays_2.json`, ... each holding a JSON array of
//! `{ "date", "name", "quantity" }` rows. Pages are read in order starting
//! at page 1; the first missing page ends the run.
//!
//! Rows are decoded one at a time: a row that is not a play object is
//! skipped with a warning, and field-level problems such as a fractional
//! quantity are left for the engine to reject per record.
use playdex_engine::{PlaySource, RawPlayRecord};
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const PAGE_PATTERN: &str = r"(?i)^plays_(\d+)\.json$";

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid page file pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn page_pattern() -> Result<Regex, PageError> {
    Ok(Regex::new(PAGE_PATTERN)?)
}

/// Ordered list of page files feeding the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSource {
    files: Vec<PathBuf>,
}

impl PageSource {
    #[must_use]
    pub const fn from_files(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    /// Discover the contiguous run of numbered pages in `dir`.
    pub fn discover(dir: &Path) -> Result<Self, PageError> {
        let pattern = page_pattern()?;
        let entries = fs::read_dir(dir).map_err(|source| PageError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut numbered: BTreeMap<u32, PathBuf> = BTreeMap::new();
        for entry in entries {
            let entry = entry.map_err(|source| PageError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if let Some(page) = pattern
                .captures(name)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<u32>().ok())
            {
                numbered.insert(page, entry.path());
            }
        }

        let mut files = Vec::with_capacity(numbered.len());
        let mut expected = 1;
        for (page, path) in numbered {
            if page != expected {
                log::warn!(
                    "page {expected} missing in {}; ignoring pages from {page} on",
                    dir.display()
                );
                break;
            }
            files.push(path);
            expected += 1;
        }
        log::debug!("discovered {} play pages in {}", files.len(), dir.display());
        Ok(Self { files })
    }

    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

impl PlaySource for PageSource {
    type Error = PageError;

    fn load_records(&self) -> Result<Vec<RawPlayRecord>, Self::Error> {
        let mut records = Vec::new();
        for path in &self.files {
            let text = fs::read_to_string(path).map_err(|source| PageError::Io {
                path: path.clone(),
                source,
            })?;
            let rows: Vec<serde_json::Value> =
                serde_json::from_str(&text).map_err(|source| PageError::Decode {
                    path: path.clone(),
                    source,
                })?;
            let row_count = rows.len();
            for (row, value) in rows.into_iter().enumerate() {
                match serde_json::from_value::<RawPlayRecord>(value) {
                    Ok(record) => records.push(record),
                    Err(err) => {
                        log::warn!(
                            "{} row {row}: skipping undecodable play: {err}",
                            path.display()
                        );
                    }
                }
            }
            log::debug!("{}: {row_count} rows", path.display());
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "playdex-pages-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_page(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn discover_orders_pages_numerically_and_stops_at_gap() {
        let dir = temp_dir("gap");
        write_page(&dir, "plays_2.json", "[]");
        write_page(&dir, "plays_1.json", "[]");
        write_page(&dir, "Plays_10.json", "[]");
        write_page(&dir, "plays_4.json", "[]");
        write_page(&dir, "notes.txt", "ignored");
        let source = PageSource::discover(&dir).unwrap();
        let names: Vec<_> = source
            .files()
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["plays_1.json", "plays_2.json"]);
    }

    #[test]
    fn discover_without_first_page_is_empty() {
        let dir = temp_dir("nofirst");
        write_page(&dir, "plays_2.json", "[]");
        assert!(PageSource::discover(&dir).unwrap().files().is_empty());
    }

    #[test]
    fn load_records_concatenates_pages_in_order() {
        let dir = temp_dir("load");
        write_page(
            &dir,
            "plays_1.json",
            r#"[{ "date": "2020-01-02", "name": "Go", "quantity": 1 }]"#,
        );
        write_page(
            &dir,
            "plays_2.json",
            r#"[{ "date": "2020-01-01", "name": "Chess", "quantity": 3 }]"#,
        );
        let records = PageSource::discover(&dir).unwrap().load_records().unwrap();
        assert_eq!(
            records,
            vec![
                RawPlayRecord::new("2020-01-02", "Go", 1),
                RawPlayRecord::new("2020-01-01", "Chess", 3),
            ]
        );
    }

    #[test]
    fn bad_rows_leave_neighbouring_rows_loaded() {
        let dir = temp_dir("rows");
        write_page(
            &dir,
            "plays_1.json",
            r#"[
                { "date": "2020-01-01", "name": "Chess", "quantity": 2 },
                { "date": "2020-01-01", "name": "Go", "quantity": 1.5 },
                { "date": "2020-01-02", "quantity": 1 },
                "not a play",
                { "date": "2020-01-03", "name": "Azul", "quantity": 1 }
            ]"#,
        );
        let records = PageSource::discover(&dir).unwrap().load_records().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], RawPlayRecord::new("2020-01-01", "Chess", 2));
        assert_eq!(records[2], RawPlayRecord::new("2020-01-03", "Azul", 1));

        let mut store = playdex_engine::PlayRecordStore::new();
        let report = store.ingest(records);
        assert_eq!(store.len(), 3);
        assert_eq!(report.rejected.len(), 1);
    }

    #[test]
    fn page_pattern_compiles_and_matches_any_case() {
        let pattern = page_pattern().unwrap();
        assert!(pattern.is_match("Plays_3.json"));
        assert!(!pattern.is_match("plays_x.json"));
    }

    #[test]
    fn pattern_errors_convert_into_page_errors() {
        let err: PageError = Regex::new("(").unwrap_err().into();
        assert!(matches!(err, PageError::Pattern(_)));
        assert!(err.to_string().starts_with("invalid page file pattern"));
    }

    #[test]
    fn decode_errors_name_the_file() {
        let dir = temp_dir("bad");
        write_page(&dir, "plays_1.json", "{ broken");
        let err = PageSource::discover(&dir)
            .unwrap()
            .load_records()
            .unwrap_err();
        assert!(matches!(err, PageError::Decode { .. }));
        assert!(err.to_string().contains("plays_1.json"));
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = temp_dir("missing").join("nope");
        assert!(matches!(
            PageSource::discover(&dir),
            Err(PageError::Io { .. })
        ));
    }
}
