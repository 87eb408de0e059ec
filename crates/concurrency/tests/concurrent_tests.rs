//! Concurrent/Multi-threaded Tests for ledger-concurrency
//!
//! These tests verify correct behavior under actual concurrent execution:
//!
//! 1. **TOCTOU Prevention** - The commit lock prevents race conditions
//! 2. **Concurrent Commits** - Multiple threads committing simultaneously
//! 3. **Version Monotonicity** - Versions always increase under load
//! 4. **Lost Updates** - Read-modify-write never silently drops an update
//! 5. **Snapshot Isolation** - Readers never observe half a commit
//!
//! ## Running These Tests
//!
//! ```bash
//! cargo test --test concurrent_tests
//! cargo test --test concurrent_tests -- --nocapture --test-threads=1  # sequential for debugging
//! ```

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use ledger_concurrency::{CommitError, TransactionContext, TransactionManager};
use ledger_core::{CommitStamp, Key, KeyRange, SnapshotView, Storage, Timestamp, TxId, Version};
use ledger_storage::UnifiedStore;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

/// Create a shared store, optionally seeded, and a manager synchronized with it
///
/// The manager is created AFTER seeding so that its version counter matches
/// the store's.
fn create_shared_env(seed: &[(&str, &str)]) -> (Arc<UnifiedStore>, Arc<TransactionManager>) {
    let store = Arc::new(UnifiedStore::new());
    for (i, (key, value)) in seed.iter().enumerate() {
        let v = i as u64 + 1;
        let stamp = CommitStamp::new(Version::new(v), TxId::new(format!("seed{}", v)), Timestamp::EPOCH);
        store
            .put_with_version(Key::from(*key), value.as_bytes().to_vec(), &stamp)
            .unwrap();
    }
    let manager = Arc::new(TransactionManager::new(store.current_version()));
    (store, manager)
}

fn begin(manager: &TransactionManager, store: &Arc<UnifiedStore>) -> TransactionContext {
    TransactionContext::with_snapshot(manager.next_txn_id(), Box::new(store.create_snapshot()))
}

fn read_u64(store: &UnifiedStore, key: &str) -> u64 {
    let bytes = store.get(&Key::from(key)).unwrap().unwrap().value;
    String::from_utf8(bytes).unwrap().parse().unwrap()
}

// ============================================================================
// SECTION 1: TOCTOU Prevention Tests
// ============================================================================

mod toctou_prevention {
    use super::*;

    /// Test that the commit lock prevents the classic TOCTOU race:
    /// 1. T1 validates (passes)
    /// 2. T2 validates (passes) - same snapshot
    /// 3. T1 applies
    /// 4. T2 applies - must instead fail validation
    #[test]
    fn test_commit_lock_prevents_toctou_race() {
        let (store, manager) = create_shared_env(&[("contested", "0")]);

        let barrier = Arc::new(Barrier::new(2));
        let success_count = Arc::new(AtomicUsize::new(0));
        let failure_count = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..2)
            .map(|i| {
                let manager = Arc::clone(&manager);
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                let success_count = Arc::clone(&success_count);
                let failure_count = Arc::clone(&failure_count);

                thread::spawn(move || {
                    let mut txn = begin(&manager, &store);
                    let key = Key::from("contested");

                    let _ = txn.get(&key).unwrap();
                    txn.put(key, format!("{}", i + 1).into_bytes()).unwrap();

                    barrier.wait();

                    match manager.commit(&mut txn, store.as_ref()) {
                        Ok(_) => success_count.fetch_add(1, Ordering::SeqCst),
                        Err(_) => failure_count.fetch_add(1, Ordering::SeqCst),
                    };
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(success_count.load(Ordering::SeqCst), 1, "Exactly one commit should succeed");
        assert_eq!(failure_count.load(Ordering::SeqCst), 1, "Exactly one commit should fail");

        let value = read_u64(&store, "contested");
        assert!(value == 1 || value == 2, "Value should be from one of the transactions");
        assert_eq!(store.get_history(&Key::from("contested"), u64::MAX).unwrap().len(), 2);
    }

    /// Many threads read+write the same key from the same snapshot
    #[test]
    fn test_validation_apply_atomicity() {
        let (store, manager) = create_shared_env(&[("shared", "0")]);

        let num_threads = 10;
        let barrier = Arc::new(Barrier::new(num_threads));
        let success_count = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..num_threads)
            .map(|i| {
                let manager = Arc::clone(&manager);
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                let success_count = Arc::clone(&success_count);

                thread::spawn(move || {
                    let mut txn = begin(&manager, &store);
                    let key = Key::from("shared");
                    let _ = txn.get(&key).unwrap();
                    txn.put(key, i.to_string().into_bytes()).unwrap();

                    barrier.wait();

                    if manager.commit(&mut txn, store.as_ref()).is_ok() {
                        success_count.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        // Only ONE transaction should have won (first-committer-wins)
        assert_eq!(
            success_count.load(Ordering::SeqCst),
            1,
            "Only one transaction should succeed when all read+write same key"
        );
    }
}

// ============================================================================
// SECTION 2: Concurrent Commit Tests
// ============================================================================

mod concurrent_commits {
    use super::*;

    /// Multiple threads committing to different keys - all should succeed
    #[test]
    fn test_concurrent_commits_different_keys() {
        let (store, manager) = create_shared_env(&[]);

        let num_threads = 20;
        let barrier = Arc::new(Barrier::new(num_threads));
        let success_count = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..num_threads)
            .map(|i| {
                let manager = Arc::clone(&manager);
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                let success_count = Arc::clone(&success_count);

                thread::spawn(move || {
                    let mut txn = begin(&manager, &store);
                    let key = Key::new(format!("Event{}", i));
                    let _ = txn.get(&key).unwrap();
                    txn.put(key, i.to_string().into_bytes()).unwrap();

                    barrier.wait();

                    if manager.commit(&mut txn, store.as_ref()).is_ok() {
                        success_count.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(
            success_count.load(Ordering::SeqCst),
            num_threads,
            "All commits to different keys should succeed"
        );
        for i in 0..num_threads {
            assert_eq!(read_u64(&store, &format!("Event{}", i)), i as u64);
        }
    }

    /// Blind writes to same key - all should succeed (no read-set conflicts)
    #[test]
    fn test_concurrent_blind_writes_same_key() {
        let (store, manager) = create_shared_env(&[]);

        let num_threads = 10;
        let barrier = Arc::new(Barrier::new(num_threads));
        let committed_values = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..num_threads)
            .map(|i| {
                let manager = Arc::clone(&manager);
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                let committed_values = Arc::clone(&committed_values);

                thread::spawn(move || {
                    let mut txn = begin(&manager, &store);
                    txn.put(Key::from("blind"), i.to_string().into_bytes()).unwrap();

                    barrier.wait();

                    let version = manager.commit(&mut txn, store.as_ref()).unwrap();
                    committed_values.lock().push((version, i as u64));
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let mut committed = committed_values.lock().clone();
        assert_eq!(committed.len(), num_threads);
        committed.sort();
        let (_, last_value) = committed[num_threads - 1];
        assert_eq!(
            read_u64(&store, "blind"),
            last_value,
            "Final value should come from the highest commit version"
        );
        assert_eq!(store.get_history(&Key::from("blind"), u64::MAX).unwrap().len(), num_threads);
    }

    /// Read-only transactions never conflict, even while writers commit
    #[test]
    fn test_concurrent_read_only_always_succeeds() {
        let (store, manager) = create_shared_env(&[("a", "1"), ("b", "2")]);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let manager = Arc::clone(&manager);
                let store = Arc::clone(&store);

                thread::spawn(move || {
                    for _ in 0..50 {
                        let mut txn = begin(&manager, &store);
                        if i % 2 == 0 {
                            let _ = txn.get(&Key::from("a")).unwrap();
                            let _ = txn.scan_range(&KeyRange::full()).unwrap();
                            manager.commit(&mut txn, store.as_ref()).unwrap();
                        } else {
                            txn.put(Key::from("b"), b"3".to_vec()).unwrap();
                            manager.commit(&mut txn, store.as_ref()).unwrap();
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}

// ============================================================================
// SECTION 3: Version Monotonicity
// ============================================================================

mod version_monotonicity {
    use super::*;

    #[test]
    fn test_version_monotonicity_under_load() {
        let (store, manager) = create_shared_env(&[]);
        let versions = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let manager = Arc::clone(&manager);
                let store = Arc::clone(&store);
                let versions = Arc::clone(&versions);

                thread::spawn(move || {
                    for n in 0..25 {
                        let mut txn = begin(&manager, &store);
                        txn.put(Key::new(format!("t{}-{}", t, n)), b"x".to_vec()).unwrap();
                        let v = manager.commit(&mut txn, store.as_ref()).unwrap();
                        versions.lock().push(v);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let versions = versions.lock();
        let unique: HashSet<u64> = versions.iter().copied().collect();
        assert_eq!(unique.len(), 200, "Every commit gets a distinct version");
        assert_eq!(versions.iter().copied().max(), Some(200));
        assert_eq!(manager.current_version(), 200);
        assert_eq!(store.current_version(), 200);
    }

    #[test]
    fn test_txn_id_uniqueness_concurrent() {
        let manager = Arc::new(TransactionManager::new(0));
        let ids = Arc::new(Mutex::new(HashSet::new()));

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let manager = Arc::clone(&manager);
                let ids = Arc::clone(&ids);
                thread::spawn(move || {
                    for _ in 0..100 {
                        assert!(ids.lock().insert(manager.next_txn_id()));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(ids.lock().len(), 1000);
    }
}

// ============================================================================
// SECTION 4: Lost Updates
// ============================================================================

mod lost_updates {
    use super::*;

    /// Concurrent read-modify-write increments with retry never lose an update
    #[test]
    fn test_retrying_increments_are_all_counted() {
        let (store, manager) = create_shared_env(&[("counter", "0")]);

        let num_threads = 8;
        let per_thread = 25;
        let conflicts = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..num_threads)
            .map(|_| {
                let manager = Arc::clone(&manager);
                let store = Arc::clone(&store);
                let conflicts = Arc::clone(&conflicts);

                thread::spawn(move || {
                    for _ in 0..per_thread {
                        loop {
                            let mut txn = begin(&manager, &store);
                            let key = Key::from("counter");
                            let current: u64 = String::from_utf8(txn.get(&key).unwrap().unwrap())
                                .unwrap()
                                .parse()
                                .unwrap();
                            txn.put(key, (current + 1).to_string().into_bytes()).unwrap();

                            match manager.commit_or_rollback(&mut txn, store.as_ref()) {
                                Ok(_) => break,
                                Err(CommitError::ValidationFailed(_)) => {
                                    conflicts.fetch_add(1, Ordering::SeqCst);
                                }
                                Err(e) => panic!("unexpected commit error: {}", e),
                            }
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(read_u64(&store, "counter"), (num_threads * per_thread) as u64);
    }

    /// A key observed through a range scan conflicts like a point read
    #[test]
    fn test_range_scan_read_set_detects_update() {
        let (store, manager) = create_shared_env(&[("Event0", "0"), ("Event1", "1")]);

        let mut scanner = begin(&manager, &store);
        assert_eq!(scanner.scan_range(&KeyRange::full()).unwrap().len(), 2);
        scanner.put(Key::from("summary"), b"2".to_vec()).unwrap();

        let mut writer = begin(&manager, &store);
        writer.put(Key::from("Event1"), b"changed".to_vec()).unwrap();
        manager.commit(&mut writer, store.as_ref()).unwrap();

        let err = manager.commit(&mut scanner, store.as_ref()).unwrap_err();
        assert!(matches!(err, CommitError::ValidationFailed(_)));
        assert!(store.get(&Key::from("summary")).unwrap().is_none());
    }
}

// ============================================================================
// SECTION 5: Snapshot Isolation
// ============================================================================

mod concurrent_snapshot_isolation {
    use super::*;

    /// Two keys always written together must always be seen together
    #[test]
    fn test_readers_never_observe_partial_commit() {
        let (store, manager) = create_shared_env(&[("left", "0"), ("right", "0")]);

        let writer = {
            let manager = Arc::clone(&manager);
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for n in 1..=200u64 {
                    let mut txn = begin(&manager, &store);
                    txn.put(Key::from("left"), n.to_string().into_bytes()).unwrap();
                    txn.put(Key::from("right"), n.to_string().into_bytes()).unwrap();
                    manager.commit(&mut txn, store.as_ref()).unwrap();
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let snapshot = store.create_snapshot();
                        let left = snapshot.get(&Key::from("left")).unwrap().unwrap();
                        let right = snapshot.get(&Key::from("right")).unwrap().unwrap();
                        assert_eq!(left.value, right.value, "snapshot saw half a commit");
                        assert_eq!(left.version, right.version);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(read_u64(&store, "left"), 200);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Sequential transactions behave like a plain map with full history
    #[test]
    fn prop_sequential_commits_match_model(
        ops in prop::collection::vec((0u8..4, prop::option::of("[a-z]{1,3}")), 1..30),
    ) {
        let (store, manager) = create_shared_env(&[]);
        let mut model = std::collections::BTreeMap::new();

        for (slot, value) in &ops {
            let key = Key::new(format!("Event{}", slot));
            let mut txn = begin(&manager, &store);
            match value {
                Some(v) => {
                    txn.put(key.clone(), v.clone().into_bytes()).unwrap();
                    model.insert(key, v.clone());
                }
                None => {
                    txn.delete(key.clone()).unwrap();
                    model.remove(&key);
                }
            }
            manager.commit(&mut txn, store.as_ref()).unwrap();
        }

        let scanned: Vec<(Key, String)> = store
            .scan_range(&KeyRange::full(), u64::MAX)
            .unwrap()
            .into_iter()
            .map(|(k, vv)| (k, String::from_utf8(vv.value).unwrap()))
            .collect();
        let expected: Vec<(Key, String)> = model.into_iter().collect();
        prop_assert_eq!(scanned, expected);
        prop_assert_eq!(store.current_version(), ops.len() as u64);
    }
}
