use logomark_core::cache::DEFAULT_TTL_MILLIS;
use logomark_core::{LogoCache, LogoService, NormalizedKey, OrganizationKind, Step};
use logomark_store::error::StoreError;
use logomark_store::Store;
use tempfile::TempDir;

const NOW: i64 = 1_700_000_000_000;

fn migrated_store() -> Store {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
}

#[test]
fn set_and_get_round_trip() {
    let store = migrated_store();
    let cache = store.default_cache();
    let key = NormalizedKey::new("PwC");

    cache.set_at(&key, Some("https://logo.clearbit.com/pwc.com"), NOW);
    let entry = cache.get_at(&key, NOW + 5).expect("entry");
    assert_eq!(entry.url.as_deref(), Some("https://logo.clearbit.com/pwc.com"));
    assert_eq!(entry.timestamp, NOW);
}

#[test]
fn negative_entries_persist() {
    let store = migrated_store();
    let cache = store.default_cache();
    let key = NormalizedKey::new("Nobody Corp");

    cache.set_at(&key, None, NOW);
    let entry = cache.get_at(&key, NOW).expect("negative entry");
    assert!(entry.is_negative());
}

#[test]
fn expired_entries_read_as_misses() {
    let store = migrated_store();
    let cache = store.default_cache();
    let key = NormalizedKey::new("acme");

    cache.set_at(&key, Some("https://a"), NOW - DEFAULT_TTL_MILLIS);
    assert!(cache.get_at(&key, NOW).is_none());
    assert!(cache.peek(&key).is_some());

    cache.set_at(&key, Some("https://b"), NOW);
    assert_eq!(
        cache.get_at(&key, NOW).and_then(|entry| entry.url),
        Some("https://b".to_string())
    );
}

#[test]
fn prune_clear_and_remove() {
    let store = migrated_store();
    let cache = store.cache(60_000, None);
    cache.set_at(&NormalizedKey::new("old"), None, NOW - 60_000);
    cache.set_at(&NormalizedKey::new("fresh"), None, NOW);
    cache.set_at(&NormalizedKey::new("other"), Some("https://o"), NOW);

    assert_eq!(cache.prune_expired(NOW), 1);
    assert!(cache.remove(&NormalizedKey::new("other")));
    assert!(!cache.remove(&NormalizedKey::new("other")));

    let keys: Vec<String> = cache
        .entries()
        .into_iter()
        .map(|(key, _)| key.to_string())
        .collect();
    assert_eq!(keys, vec!["fresh"]);
    assert_eq!(cache.clear(), 1);
    assert!(cache.entries().is_empty());
}

#[test]
fn bounded_cache_evicts_oldest() {
    let store = migrated_store();
    let cache = store.cache(DEFAULT_TTL_MILLIS, Some(2));
    cache.set_at(&NormalizedKey::new("a"), None, NOW);
    cache.set_at(&NormalizedKey::new("b"), None, NOW + 1);
    cache.set_at(&NormalizedKey::new("a"), None, NOW + 2);
    cache.set_at(&NormalizedKey::new("c"), None, NOW + 3);

    let keys: Vec<String> = cache
        .entries()
        .into_iter()
        .map(|(key, _)| key.to_string())
        .collect();
    assert_eq!(keys, vec!["a", "c"]);
}

#[test]
fn empty_keys_are_rejected() {
    let store = migrated_store();
    let cache = store.default_cache();
    let err = cache
        .try_set_at(&NormalizedKey::new(" "), None, NOW)
        .expect_err("empty key");
    assert!(matches!(err, StoreError::InvalidKey));
    cache.set_at(&NormalizedKey::new(" "), None, NOW);
    assert!(cache.entries().is_empty());
}

#[test]
fn unmigrated_store_degrades_to_misses() {
    let store = Store::open_in_memory().expect("open in memory");
    let cache = store.default_cache();
    let key = NormalizedKey::new("pwc");
    cache.set_at(&key, Some("https://a"), NOW);
    assert!(cache.get_at(&key, NOW).is_none());
    assert!(cache.try_peek(&key).is_err());
}

#[test]
fn entries_survive_reopen() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("logomark.sqlite3");
    {
        let store = Store::open(&db_path).expect("open store");
        store.migrate().expect("migrate");
        store
            .default_cache()
            .set_at(&NormalizedKey::new("pwc"), Some("https://p"), NOW);
    }

    let store = Store::open(&db_path).expect("reopen store");
    store.migrate().expect("migrate");
    let entry = store
        .default_cache()
        .peek(&NormalizedKey::new("PwC"))
        .expect("entry");
    assert_eq!(entry.url.as_deref(), Some("https://p"));
}

#[test]
fn state_machine_writes_through_sqlite_cache() {
    let store = migrated_store();
    let cache = store.default_cache();
    let service = LogoService::default();

    let mut machine = service.machine(&cache, OrganizationKind::Company);
    let ticket = match machine.set_name("Acme Widgets", NOW) {
        Step::Load(ticket) => ticket,
        other => panic!("expected load, got {:?}", other),
    };
    machine.on_load(&ticket, NOW);

    let mut second = service.machine(&cache, OrganizationKind::Company);
    match second.set_name("acme widgets", NOW + 1) {
        Step::Settled(display) => assert_eq!(display.image_url(), Some(ticket.url.as_str())),
        other => panic!("expected cache hit, got {:?}", other),
    }
}
