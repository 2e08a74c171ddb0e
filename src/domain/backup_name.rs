//! Timestamped backup file names (`db-YYYYMMDD-HHMMSS.sqlite3`).

use std::fmt;

use chrono::{NaiveDateTime, Timelike};

/// File name prefix of every backup.
pub const PREFIX: &str = "db-";

/// File name suffix of every backup.
pub const SUFFIX: &str = ".sqlite3";

/// `chrono` format of the timestamp part.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Name of a single backup file, ordered by the time it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BackupName {
    taken_at: NaiveDateTime,
}

impl BackupName {
    /// Name for a backup taken at `taken_at` (local wall-clock time).
    ///
    /// Sub-second precision is dropped; it does not appear in the name.
    #[must_use]
    pub fn new(taken_at: NaiveDateTime) -> Self {
        let taken_at = taken_at.with_nanosecond(0).unwrap_or(taken_at);
        Self { taken_at }
    }

    /// Parses a file name produced by [`BackupName::new`].
    ///
    /// Returns `None` for anything else living in the backup directory.
    #[must_use]
    pub fn parse(file_name: &str) -> Option<Self> {
        let stamp = file_name.strip_prefix(PREFIX)?.strip_suffix(SUFFIX)?;
        NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
            .ok()
            .map(|taken_at| Self { taken_at })
    }

    /// When the backup was taken.
    #[must_use]
    pub const fn taken_at(&self) -> NaiveDateTime {
        self.taken_at
    }
}

impl fmt::Display for BackupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{PREFIX}{}{SUFFIX}",
            self.taken_at.format(TIMESTAMP_FORMAT)
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 7)
            .unwrap()
            .and_hms_milli_opt(h, m, s, 250)
            .unwrap()
    }

    #[test]
    fn formats_timestamp_without_subseconds() {
        let name = BackupName::new(at(9, 5, 3));
        assert_eq!(name.to_string(), "db-20260307-090503.sqlite3");
    }

    #[test]
    fn parse_accepts_own_output() {
        let name = BackupName::new(at(23, 59, 59));
        assert_eq!(BackupName::parse(&name.to_string()), Some(name));
    }

    #[test]
    fn parse_rejects_foreign_files() {
        for other in [
            "db.sqlite3",
            "db-latest.sqlite3",
            "db-20260307-090503.sqlite3-journal",
            "notes.txt",
            "db-20261307-090503.sqlite3",
        ] {
            assert_eq!(BackupName::parse(other), None, "{other}");
        }
    }

    #[test]
    fn names_order_by_time() {
        assert!(BackupName::new(at(8, 0, 0)) < BackupName::new(at(9, 0, 0)));
    }
}
