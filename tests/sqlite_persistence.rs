use jobtrack::db::Database;
use jobtrack::persist::STORAGE_KEY;
use jobtrack::storage::KeyValueStore;
use jobtrack::store::RecordStore;
use jobtrack::{ApplicationDraft, Priority, Status, YesNo};
use tempfile::TempDir;

fn open(dir: &TempDir) -> RecordStore<Database> {
    let db = Database::open_at(&dir.path().join("tracker.db")).expect("open database");
    RecordStore::open(db)
}

#[test]
fn records_survive_reopening() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;

    let (kept, removed) = {
        let mut store = open(&dir);
        let kept = store.create(ApplicationDraft {
            team_name: Some("Cloud".to_string()),
            referral_given: YesNo::Yes,
            priority: Priority::High,
            salary_range: Some("$150K - $180K".to_string()),
            ..ApplicationDraft::new("Google", "SWE")
        })?;
        let removed = store.create(ApplicationDraft::new("Meta", "PM"))?;
        let mut edited = store.get(&kept).expect("created").details.clone();
        edited.status = Status::Interviewing;
        store.update(&kept, edited)?;
        store.delete(&removed);
        (kept, removed)
    };

    let store = open(&dir);
    assert_eq!(store.len(), 1);
    let record = store.get(&kept).expect("record persisted");
    assert_eq!(record.details.company_name, "Google");
    assert_eq!(record.details.status, Status::Interviewing);
    assert_eq!(record.details.team_name.as_deref(), Some("Cloud"));
    assert!(record.details.referral_given.is_yes());
    assert!(store.get(&removed).is_none());
    Ok(())
}

#[test]
fn corrupted_slot_starts_empty_and_is_replaced() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("tracker.db");
    {
        let mut db = Database::open_at(&path)?;
        db.set(STORAGE_KEY, "[{\"id\": 1, truncated")?;
    }

    let store = RecordStore::open(Database::open_at(&path)?);
    assert!(store.is_empty());

    let db = Database::open_at(&path)?;
    assert_eq!(db.get(STORAGE_KEY)?.as_deref(), Some("[]"));
    Ok(())
}

#[test]
fn unknown_values_are_preserved_across_sessions() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("tracker.db");
    {
        let mut db = Database::open_at(&path)?;
        db.set(
            STORAGE_KEY,
            r#"[{"id":"1","companyName":"Initech","role":"TPS","status":"Ghosted","priority":"Urgent"}]"#,
        )?;
    }

    {
        let store = RecordStore::open(Database::open_at(&path)?);
        let record = store.get("1").expect("loaded");
        assert_eq!(record.details.status, Status::Unknown("Ghosted".to_string()));
        assert_eq!(record.details.priority, Priority::Unknown("Urgent".to_string()));
    }

    let raw = Database::open_at(&path)?.get(STORAGE_KEY)?.expect("slot");
    assert!(raw.contains("\"status\":\"Ghosted\""));
    assert!(raw.contains("\"priority\":\"Urgent\""));
    Ok(())
}
