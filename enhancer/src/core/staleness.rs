//! Staleness decision between an artifact and its backup.
//!
//! After each enhancement the backup's modification time is set to the
//! enhanced artifact's modification time. Recompilation therefore produces an
//! artifact strictly newer than the backup, while a re-run without
//! recompilation compares equal and is skipped.

use filetime::FileTime;

use crate::core::types::Staleness;

/// Decide whether an artifact needs enhancement.
///
/// `backup` is `None` when no backup file exists. Equal timestamps count as
/// up to date.
pub fn decide(current: FileTime, backup: Option<FileTime>) -> Staleness {
    match backup {
        None => Staleness::NoBackup,
        Some(backup) if current <= backup => Staleness::UpToDate,
        Some(_) => Staleness::Recompiled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64, nanos: u32) -> FileTime {
        FileTime::from_unix_time(secs, nanos)
    }

    #[test]
    fn missing_backup_is_stale() {
        assert_eq!(decide(at(100, 0), None), Staleness::NoBackup);
    }

    #[test]
    fn equal_timestamps_are_up_to_date() {
        assert_eq!(decide(at(100, 5), Some(at(100, 5))), Staleness::UpToDate);
    }

    #[test]
    fn older_artifact_is_up_to_date() {
        assert_eq!(decide(at(99, 0), Some(at(100, 0))), Staleness::UpToDate);
    }

    #[test]
    fn newer_artifact_is_stale() {
        assert_eq!(decide(at(100, 1), Some(at(100, 0))), Staleness::Recompiled);
        assert!(Staleness::Recompiled.needs_enhancement());
    }
}
