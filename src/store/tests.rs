use super::*;

fn blob_of(size: usize, fill: u8) -> Vec<u8> {
    vec![fill; size]
}

#[test]
fn test_store_and_get_round_trip() {
    let mut store = BlobStore::new(100);
    assert!(store.store("a", "image/png", blob_of(10, 1)));

    let blob = store.get("a").expect("stored blob");
    assert_eq!(blob.content_type, "image/png");
    assert_eq!(blob.bytes, blob_of(10, 1));

    assert!(store.get("missing").is_none());
}

#[test]
fn test_report_tracks_stores_and_deletes() {
    let mut store = BlobStore::new(100);
    store.store("a", "image/png", blob_of(10, 1));
    store.store("b", "image/webp", blob_of(20, 2));

    assert_eq!(
        store.report(),
        StoreReport {
            entries: 2,
            total_bytes: 30,
            budget_bytes: 100
        }
    );

    assert!(store.delete("a"));
    assert!(!store.delete("a"));
    assert_eq!(store.report().entries, 1);
    assert_eq!(store.report().total_bytes, 20);

    store.clear();
    assert_eq!(store.report().entries, 0);
    assert_eq!(store.report().total_bytes, 0);
}

#[test]
fn test_eviction_drops_least_recently_used_first() {
    let mut store = BlobStore::new(10);
    store.store("a", "image/png", blob_of(4, 1));
    store.store("b", "image/png", blob_of(4, 2));

    // Storing 4 more bytes must evict exactly one entry: the oldest.
    assert!(store.store("c", "image/png", blob_of(4, 3)));
    assert!(store.get("a").is_none());
    assert!(store.get("b").is_some());
    assert!(store.get("c").is_some());
}

#[test]
fn test_get_refreshes_recency() {
    let mut store = BlobStore::new(10);
    store.store("a", "image/png", blob_of(4, 1));
    store.store("b", "image/png", blob_of(4, 2));

    // Touching `a` makes `b` the eviction candidate.
    store.get("a");
    assert!(store.store("c", "image/png", blob_of(4, 3)));

    assert!(store.get("a").is_some());
    assert!(store.get("b").is_none());
}

#[test]
fn test_oversized_blob_is_rejected() {
    let mut store = BlobStore::new(10);
    assert!(!store.store("huge", "image/png", blob_of(11, 1)));
    assert_eq!(store.report().entries, 0);
    assert_eq!(store.report().total_bytes, 0);
}

#[test]
fn test_restore_same_id_replaces_bytes() {
    let mut store = BlobStore::new(100);
    store.store("a", "image/png", blob_of(10, 1));
    store.store("a", "image/webp", blob_of(30, 2));

    assert_eq!(store.report().entries, 1);
    assert_eq!(store.report().total_bytes, 30);
    let blob = store.get("a").expect("replaced blob");
    assert_eq!(blob.content_type, "image/webp");
}

#[test]
fn test_blob_filling_whole_budget_is_accepted() {
    let mut store = BlobStore::new(10);
    store.store("a", "image/png", blob_of(4, 1));
    assert!(store.store("b", "image/png", blob_of(10, 2)));
    assert!(store.get("a").is_none());
    assert_eq!(store.report().total_bytes, 10);
}
