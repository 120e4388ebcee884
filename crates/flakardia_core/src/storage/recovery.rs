//! Recovery of a stats file renamed by an external sync service.
//!
//! File-sync clients sometimes rename `stats.json` to something like
//! `stats (1).json` on conflict. When the canonical file is missing, storage
//! looks for such candidates and asks the caller what to do.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

static STATS_CANDIDATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^stats.*\.json$").expect("stats candidate pattern is valid"));

/// Caller decisions for stats file recovery.
pub trait StatsFileRecovery {
    /// Asks whether the single candidate described in `message` should
    /// replace the missing stats file.
    fn request_recovery(&self, message: &str) -> bool;

    /// Reports that several candidates exist and none was picked.
    fn notify_recovery_impossible(&self, message: &str);
}

/// Recovery policy that never recovers and ignores notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoRecovery;

impl StatsFileRecovery for NoRecovery {
    fn request_recovery(&self, _message: &str) -> bool {
        false
    }

    fn notify_recovery_impossible(&self, _message: &str) {}
}

/// Regular files in `dir` (depth 1) that look like a renamed stats file.
pub(crate) fn find_candidates(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if STATS_CANDIDATE.is_match(&name) && entry.file_type()?.is_file() {
            candidates.push(entry.path());
        }
    }
    candidates.sort();
    Ok(candidates)
}

pub(crate) fn single_candidate_message(name: &str) -> String {
    format!(
        "Found a file named {name}, which is likely the stats file backed up by some external \
         service, such as Google Drive.\n\
         Would you like to recover the lesson stats from this file?\n\
         If you choose No, all learning statistics will be reset to the initial state."
    )
}

pub(crate) fn multiple_candidates_message(names: &[String]) -> String {
    format!(
        "Found files named {}, which are likely the stats file backed up by some external \
         service, such as Google Drive.\n\
         However, since there are several files, automatic recovery is impossible.\n\
         Please find the correct file and rename it manually.",
        names.join(", ")
    )
}
