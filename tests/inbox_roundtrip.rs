use rowkit::domain::model::Notification;
use rowkit::Inbox;
use tempfile::TempDir;

fn sample_inbox() -> Inbox {
    let mut inbox = Inbox::new();
    inbox.add(Notification::new("email", "alice", "m1"));
    let mut seen = Notification::new("sms", "bob", "m2");
    seen.seen = true;
    inbox.add(seen);
    inbox
}

#[test]
fn test_json_round_trip_with_dedupe() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inbox.json");

    let inbox = sample_inbox();
    inbox.export_json(&path).unwrap();

    let mut restored = Inbox::new();
    assert_eq!(restored.import_json(&path).unwrap(), 2);
    assert_eq!(restored.len(), 2);
    assert_eq!(restored.unseen_count(), 1);

    // entries already present are not imported again
    assert_eq!(restored.import_json(&path).unwrap(), 0);
    assert_eq!(restored.len(), 2);
}

#[test]
fn test_csv_round_trip_with_dedupe() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inbox.csv");

    let inbox = sample_inbox();
    inbox.export_csv(&path).unwrap();

    let mut restored = Inbox::new();
    assert_eq!(restored.import_csv(&path).unwrap(), 2);
    assert_eq!(restored.by_channel("sms").len(), 1);
    assert_eq!(restored.unseen_count(), 1);
    assert_eq!(restored.import_csv(&path).unwrap(), 0);
}

#[test]
fn test_csv_then_json_import_dedupes_across_formats() {
    let dir = TempDir::new().unwrap();
    let json_path = dir.path().join("inbox.json");
    let csv_path = dir.path().join("inbox.csv");

    let inbox = sample_inbox();
    inbox.export_json(&json_path).unwrap();
    inbox.export_csv(&csv_path).unwrap();

    let mut restored = Inbox::new();
    assert_eq!(restored.import_json(&json_path).unwrap(), 2);
    // the CSV holds the same (channel, to, message) identities
    assert_eq!(restored.import_csv(&csv_path).unwrap(), 0);
    assert_eq!(restored.len(), 2);
}

#[test]
fn test_timestamps_survive_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inbox.json");

    let inbox = sample_inbox();
    inbox.export_json(&path).unwrap();

    let mut restored = Inbox::new();
    restored.import_json(&path).unwrap();
    assert_eq!(
        restored.items()[0].created_at,
        inbox.items()[0].created_at
    );
}
