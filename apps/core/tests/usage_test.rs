use quicklaunch_core::usage::{
    self, JsonFileStore, MemoryStore, UsageError, UsageHistory, UsageStore, UsageTracker,
};

struct FailingStore;

impl UsageStore for FailingStore {
    fn load(&self) -> Result<UsageHistory, UsageError> {
        Err(UsageError::Read {
            path: "/nonexistent/app-usage.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    }

    fn save(&self, _history: &UsageHistory) -> Result<(), UsageError> {
        Err(UsageError::Write {
            path: "/nonexistent/app-usage.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    }
}

#[test]
fn record_launch_creates_then_increments() {
    let store = MemoryStore::default();
    let mut tracker = UsageTracker::open(Box::new(store.clone()));

    assert_eq!(tracker.record_launch_at("firefox", "Firefox", 10), 1);
    assert_eq!(tracker.record_launch_at("firefox", "Firefox", 20), 2);
    assert_eq!(tracker.record_launch_at("firefox", "Firefox", 30), 3);

    let record = tracker.get("firefox").unwrap();
    assert_eq!(record.launch_count, 3);
    assert_eq!(record.last_launched_at, 30);
    assert_eq!(record.display_name, "Firefox");
    assert_eq!(store.snapshot()["firefox"].launch_count, 3);
}

#[test]
fn k_launches_add_k_to_existing_count() {
    let mut history = UsageHistory::new();
    history.insert(
        "kitty".into(),
        usage::UsageRecord {
            launch_count: 7,
            last_launched_at: 1,
            display_name: "kitty".into(),
        },
    );
    let mut tracker = UsageTracker::open(Box::new(MemoryStore::with_history(history)));

    for _ in 0..5 {
        tracker.record_launch("kitty", "kitty");
    }

    assert_eq!(tracker.launch_count("kitty"), 12);
    assert!(tracker.get("kitty").unwrap().last_launched_at > 1);
}

#[test]
fn empty_identity_is_ignored() {
    let mut tracker = UsageTracker::in_memory();
    assert_eq!(tracker.record_launch("", "Nameless"), 0);
    assert!(tracker.history().is_empty());
}

#[test]
fn json_store_round_trips_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("app-usage.json");

    {
        let mut tracker = UsageTracker::open(Box::new(JsonFileStore::new(&path)));
        tracker.record_launch_at("firefox", "Firefox", 1_700_000_000_000);
        tracker.record_launch_at("firefox", "Firefox", 1_700_000_100_000);
        tracker.record_launch_at("Files", "Files", 1_700_000_200_000);
    }

    let loaded = usage::load(&JsonFileStore::new(&path));
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded["firefox"].launch_count, 2);
    assert_eq!(loaded["firefox"].last_launched_at, 1_700_000_100_000);
    assert_eq!(loaded["Files"].display_name, "Files");

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"launchCount\""));
    assert!(raw.contains("\"lastLaunchedAt\""));
    assert!(raw.contains("\"displayName\""));
}

#[test]
fn missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("absent.json"));

    assert!(store.load().unwrap().is_empty());
}

#[test]
fn corrupt_file_degrades_to_empty_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app-usage.json");
    std::fs::write(&path, b"{ not json").unwrap();
    let store = JsonFileStore::new(&path);

    assert!(matches!(store.load(), Err(UsageError::Decode(_))));
    assert!(usage::load(&store).is_empty());

    let mut tracker = UsageTracker::open(Box::new(JsonFileStore::new(&path)));
    assert!(tracker.history().is_empty());
    tracker.record_launch("kitty", "kitty");
    assert_eq!(usage::load(&JsonFileStore::new(&path))["kitty"].launch_count, 1);
}

#[test]
fn legacy_shell_format_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ags-app-usage.json");
    std::fs::write(
        &path,
        r#"{
  "firefox": { "count": 4, "lastUsed": 1700000000000, "name": "Firefox" },
  "Files": { "count": 1, "lastUsed": 1690000000000, "name": "Files" }
}"#,
    )
    .unwrap();

    let loaded = usage::load(&JsonFileStore::new(&path));

    assert_eq!(loaded["firefox"].launch_count, 4);
    assert_eq!(loaded["firefox"].last_launched_at, 1_700_000_000_000);
    assert_eq!(loaded["Files"].display_name, "Files");
}

#[test]
fn write_failure_keeps_in_memory_state() {
    let mut tracker = UsageTracker::open(Box::new(FailingStore));

    assert!(tracker.history().is_empty());
    assert_eq!(tracker.record_launch("firefox", "Firefox"), 1);
    assert_eq!(tracker.record_launch("firefox", "Firefox"), 2);
    assert_eq!(tracker.launch_count("firefox"), 2);
    assert!(tracker.persist().is_err());
}

#[test]
fn top_n_orders_by_count_then_identity() {
    let mut tracker = UsageTracker::in_memory();
    for (identity, launches) in [("zed", 3), ("alacritty", 3), ("firefox", 5), ("gimp", 1)] {
        for _ in 0..launches {
            tracker.record_launch_at(identity, identity, 100);
        }
    }

    assert_eq!(tracker.top_n(3), vec!["firefox", "alacritty", "zed"]);
    assert_eq!(tracker.top_n(10).len(), 4);
    assert!(tracker.top_n(0).is_empty());
}

#[test]
fn recent_orders_by_last_launch() {
    let mut tracker = UsageTracker::in_memory();
    tracker.record_launch_at("gimp", "GIMP", 300);
    tracker.record_launch_at("firefox", "Firefox", 100);
    tracker.record_launch_at("kitty", "kitty", 200);
    tracker.record_launch_at("firefox", "Firefox", 400);

    assert_eq!(tracker.recent(2), vec!["firefox", "gimp"]);
}
