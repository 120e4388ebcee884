use chrono::{TimeZone, Utc};
use flakardia_core::{
    FlashcardStorage, FsFlashcardStorage, LibraryStats, StatsFileRecovery, StorageError, Word,
    WordStats,
};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Default)]
struct RecoveryMock {
    refuse: Cell<bool>,
    request_message: RefCell<Option<String>>,
    warning_message: RefCell<Option<String>>,
}

impl StatsFileRecovery for &RecoveryMock {
    fn request_recovery(&self, message: &str) -> bool {
        *self.request_message.borrow_mut() = Some(message.to_string());
        !self.refuse.get()
    }

    fn notify_recovery_impossible(&self, message: &str) {
        *self.warning_message.borrow_mut() = Some(message.to_string());
    }
}

struct Fixture {
    _dir: tempfile::TempDir,
    root: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = dir.path().join("cards");
        fs::create_dir_all(&root).expect("create library root");
        Self { _dir: dir, root }
    }

    fn flakardia_dir(&self) -> PathBuf {
        self.root.join(".flakardia")
    }

    fn stats_file(&self) -> PathBuf {
        self.flakardia_dir().join("stats.json")
    }

    fn renamed(&self, index: u32) -> PathBuf {
        self.flakardia_dir().join(format!("stats ({index}).json"))
    }
}

fn non_empty_stats() -> LibraryStats {
    LibraryStats::new(BTreeMap::from([(
        Word::new("word"),
        WordStats {
            last_learned: Utc
                .with_ymd_and_hms(2024, 4, 15, 12, 0, 0)
                .single()
                .expect("valid timestamp"),
            interval_before_last_learned: Duration::from_secs(3600),
            mistakes: 0,
        },
    )]))
}

fn save_then_move(storage: &impl FlashcardStorage, from: &Path, to: &Path) {
    storage
        .save_library_stats(&non_empty_stats())
        .expect("save stats");
    fs::rename(from, to).expect("rename stats file");
}

#[test]
fn missing_stats_file_is_empty_stats() {
    let fixture = Fixture::new();
    let recovery = RecoveryMock::default();
    let storage = FsFlashcardStorage::new(&fixture.root, &recovery);

    let stats = storage.read_library_stats().expect("read stats");
    assert!(stats.is_empty());
    assert!(fixture.flakardia_dir().is_dir(), "metadata dir is created");
    assert!(recovery.request_message.borrow().is_none());
}

#[test]
fn saved_stats_read_back() {
    let fixture = Fixture::new();
    let recovery = RecoveryMock::default();
    let storage = FsFlashcardStorage::new(&fixture.root, &recovery);

    storage
        .save_library_stats(&non_empty_stats())
        .expect("save stats");
    assert_eq!(storage.read_library_stats().expect("read stats"), non_empty_stats());

    let raw = fs::read_to_string(fixture.stats_file()).expect("read raw stats");
    assert!(raw.contains("\"wordStats\""));
    assert!(raw.contains('\n'), "stats file is pretty-printed");
}

#[test]
fn one_renamed_file_accepted() {
    let fixture = Fixture::new();
    let recovery = RecoveryMock::default();
    let storage = FsFlashcardStorage::new(&fixture.root, &recovery);
    save_then_move(&storage, &fixture.stats_file(), &fixture.renamed(1));

    let stats = storage.read_library_stats().expect("read stats");

    let request = recovery.request_message.borrow().clone().expect("recovery requested");
    assert!(request.contains("stats (1).json"));
    assert!(recovery.warning_message.borrow().is_none());
    assert!(fixture.stats_file().exists());
    assert!(!fixture.renamed(1).exists());
    assert_eq!(stats, non_empty_stats());
}

#[test]
fn one_renamed_file_refused() {
    let fixture = Fixture::new();
    let recovery = RecoveryMock::default();
    recovery.refuse.set(true);
    let storage = FsFlashcardStorage::new(&fixture.root, &recovery);
    save_then_move(&storage, &fixture.stats_file(), &fixture.renamed(1));

    let stats = storage.read_library_stats().expect("read stats");

    assert!(recovery.request_message.borrow().is_some());
    assert!(recovery.warning_message.borrow().is_none());
    assert!(!fixture.stats_file().exists());
    assert!(fixture.renamed(1).exists());
    assert!(stats.is_empty());
}

#[test]
fn unrelated_file_is_not_a_candidate() {
    let fixture = Fixture::new();
    let recovery = RecoveryMock::default();
    let storage = FsFlashcardStorage::new(&fixture.root, &recovery);
    let other = fixture.flakardia_dir().join("just a random file");
    save_then_move(&storage, &fixture.stats_file(), &other);

    let stats = storage.read_library_stats().expect("read stats");

    assert!(recovery.request_message.borrow().is_none());
    assert!(recovery.warning_message.borrow().is_none());
    assert!(!fixture.stats_file().exists());
    assert!(other.exists());
    assert!(stats.is_empty());
}

#[test]
fn several_renamed_files_cannot_be_recovered() {
    let fixture = Fixture::new();
    let recovery = RecoveryMock::default();
    let storage = FsFlashcardStorage::new(&fixture.root, &recovery);
    storage
        .save_library_stats(&non_empty_stats())
        .expect("save stats");
    fs::copy(fixture.stats_file(), fixture.renamed(1)).expect("copy stats");
    fs::rename(fixture.stats_file(), fixture.renamed(2)).expect("rename stats");

    let stats = storage.read_library_stats().expect("read stats");

    assert!(recovery.request_message.borrow().is_none());
    let warning = recovery.warning_message.borrow().clone().expect("warning sent");
    assert!(warning.contains("stats (1).json"));
    assert!(warning.contains("stats (2).json"));
    assert!(!fixture.stats_file().exists());
    assert!(fixture.renamed(1).exists());
    assert!(fixture.renamed(2).exists());
    assert!(stats.is_empty());
}

#[test]
fn corrupt_stats_file_is_an_error() {
    let fixture = Fixture::new();
    let recovery = RecoveryMock::default();
    let storage = FsFlashcardStorage::new(&fixture.root, &recovery);
    fs::create_dir_all(fixture.flakardia_dir()).expect("create metadata dir");
    fs::write(fixture.stats_file(), "{\"wordStats\": [").expect("write corrupt stats");

    let err = storage.read_library_stats().expect_err("corrupt stats");
    assert!(matches!(err, StorageError::Json { .. }));
}

#[test]
fn reads_stats_written_by_the_desktop_app() {
    let fixture = Fixture::new();
    let recovery = RecoveryMock::default();
    let storage = FsFlashcardStorage::new(&fixture.root, &recovery);
    fs::create_dir_all(fixture.flakardia_dir()).expect("create metadata dir");
    fs::write(
        fixture.stats_file(),
        r#"{
    "wordStats": {
        "dog": {
            "lastLearned": "2024-04-15T09:00:00.123456789Z",
            "intervalBeforeLastLearned": 0.3333333333333333,
            "mistakes": 2
        },
        "cat": {
            "lastLearned": "2024-04-16T18:30:05Z",
            "intervalBeforeLastLearned": -0.0001,
            "mistakes": 0
        }
    }
}"#,
    )
    .expect("write stats");

    let stats = storage.read_library_stats().expect("read stats");

    let dog = stats.get(&Word::new("dog")).expect("dog stats");
    assert_eq!(
        dog.last_learned,
        Utc.with_ymd_and_hms(2024, 4, 15, 9, 0, 0)
            .single()
            .expect("valid timestamp")
            + chrono::Duration::nanoseconds(123_456_789)
    );
    assert_eq!(dog.interval_before_last_learned, Duration::from_secs(8 * 3600));
    assert_eq!(dog.mistakes, 2);

    let cat = stats.get(&Word::new("cat")).expect("cat stats");
    assert_eq!(cat.interval_before_last_learned, Duration::ZERO);
}
