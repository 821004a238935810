// ==============================================
// END-TO-END STORE SCENARIOS (integration)
// ==============================================
use warmcache::store::KvCache;

#[test]
fn basic_put_get_overwrite() {
    let cache = KvCache::new(100).unwrap();

    cache.put(b"k1", b"v1");
    assert_eq!(cache.get(b"k1").as_deref(), Some(&b"v1"[..]));
    assert!(cache.get(b"missing").is_none());

    cache.put(b"k1", b"v2");
    assert_eq!(cache.get(b"k1").as_deref(), Some(&b"v2"[..]));
    assert_eq!(cache.len(), 1);
}

#[test]
fn eviction_follows_insertion_order() {
    let cache = KvCache::new(3).unwrap();

    cache.put(b"a", b"1");
    cache.put(b"b", b"2");
    cache.put(b"c", b"3");
    cache.put(b"d", b"4");

    assert!(cache.get(b"a").is_none());
    assert_eq!(cache.get(b"d").as_deref(), Some(&b"4"[..]));
    assert_eq!(cache.len(), 3);
}

#[test]
fn get_refreshes_recency() {
    let cache = KvCache::new(3).unwrap();

    cache.put(b"a", b"1");
    cache.put(b"b", b"2");
    cache.put(b"c", b"3");
    cache.get(b"a");
    cache.put(b"d", b"4");

    assert!(cache.get(b"b").is_none());
    assert_eq!(cache.get(b"a").as_deref(), Some(&b"1"[..]));
}

#[test]
fn snapshot_round_trip_preserves_membership() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.snap");

    let cache = KvCache::with_snapshot(100, &path).unwrap();
    cache.put(b"p1", b"q1");
    cache.put(b"p2", b"q2");
    cache.save_snapshot().unwrap();

    let restored = KvCache::with_snapshot(100, &path).unwrap();
    assert!(restored.load_snapshot());
    assert_eq!(restored.get(b"p1").as_deref(), Some(&b"q1"[..]));
    assert_eq!(restored.get(b"p2").as_deref(), Some(&b"q2"[..]));
}

#[test]
fn metrics_track_hits_and_misses() {
    let cache = KvCache::new(100).unwrap();

    cache.put(b"k1", b"v1");
    cache.put(b"k2", b"v2");
    cache.get(b"k1");
    cache.get(b"k3");

    let metrics = cache.metrics();
    assert_eq!(metrics.total_operations, 4);
    assert_eq!(metrics.cache_hits, 1);
    assert_eq!(metrics.cache_misses, 1);
    assert!(metrics.hit_rate > 0.0 && metrics.hit_rate < 1.0);
}

#[test]
fn threads_read_back_their_own_writes() {
    use std::sync::Arc;
    use std::thread;

    let cache = Arc::new(KvCache::new(2_000).unwrap());
    let num_threads = 10;
    let ops_per_thread = 100;

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for j in 0..ops_per_thread {
                    let key = format!("t{}_k{}", thread_id, j);
                    let value = format!("value_{}_{}", thread_id, j);
                    cache.put(key.as_bytes(), value.as_bytes());

                    let read_back = cache.get(key.as_bytes());
                    assert_eq!(read_back.as_deref(), Some(value.as_bytes()));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= cache.capacity());
    let metrics = cache.metrics();
    assert_eq!(
        metrics.total_operations,
        (num_threads * ops_per_thread * 2) as u64
    );
    assert_eq!(metrics.cache_hits, (num_threads * ops_per_thread) as u64);
}

#[test]
fn removed_keys_stay_gone_until_rewritten() {
    let cache = KvCache::new(10).unwrap();

    cache.put(b"k", b"v");
    assert!(cache.remove(b"k"));
    assert!(!cache.remove(b"k"));
    assert!(cache.get(b"k").is_none());

    cache.put(b"k", b"v2");
    assert_eq!(cache.get(b"k").as_deref(), Some(&b"v2"[..]));
}

#[test]
fn clear_twice_equals_clear_once() {
    let cache = KvCache::new(10).unwrap();
    cache.put(b"a", b"1");
    cache.put(b"b", b"2");

    cache.clear();
    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.capacity(), 10);
}

#[test]
fn warm_restart_after_teardown() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("restart.snap");

    {
        let cache = KvCache::with_snapshot(50, &path).unwrap();
        for i in 0..20u32 {
            cache.put(format!("key{}", i).as_bytes(), &i.to_le_bytes());
        }
        // dropped here: teardown saves the snapshot
    }

    let cache = KvCache::with_snapshot(50, &path).unwrap();
    assert_eq!(cache.len(), 20);
    for i in 0..20u32 {
        assert_eq!(
            cache.get(format!("key{}", i).as_bytes()).as_deref(),
            Some(&i.to_le_bytes()[..])
        );
    }
}

#[test]
fn snapshot_into_smaller_cache_keeps_stream_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shrink.snap");

    {
        let cache = KvCache::with_snapshot(10, &path).unwrap();
        for i in 0..10u8 {
            cache.put(&[i], &[i]);
        }
    }

    // entries are written least-recent first, so the smaller cache keeps
    // the oldest four and ignores the rest of the stream
    let small = KvCache::with_snapshot(4, &path).unwrap();
    assert_eq!(small.len(), 4);
    for i in 0..4u8 {
        assert!(small.contains(&[i]));
    }
    for i in 4..10u8 {
        assert!(!small.contains(&[i]));
    }
}
