use super::*;
use crate::identity::digest::Identity;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn entries_are_dropped_after_use() {
    let locks = IdentityLocks::new();
    let id = Identity::new().derive("from=a.gif&top=x");
    assert_eq!(locks.with_lock(&id, || 7), 7);
    assert!(locks.is_empty());
}

#[test]
fn same_identity_is_mutually_exclusive() {
    let locks = Arc::new(IdentityLocks::new());
    let id = Identity::new().derive("from=a.gif&top=x");
    let inside = Arc::new(AtomicUsize::new(0));
    let max_inside = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let (locks, id, inside, max_inside) = (
                Arc::clone(&locks),
                id.clone(),
                Arc::clone(&inside),
                Arc::clone(&max_inside),
            );
            std::thread::spawn(move || {
                locks.with_lock(&id, || {
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    max_inside.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(std::time::Duration::from_millis(5));
                    inside.fetch_sub(1, Ordering::SeqCst);
                })
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(max_inside.load(Ordering::SeqCst), 1);
    assert!(locks.is_empty());
}

#[test]
fn overlapping_releases_leave_no_stale_entries() {
    let locks = Arc::new(IdentityLocks::new());
    let ids: Vec<_> = (0..3)
        .map(|i| Identity::new().derive(&format!("from=a.gif&top={i}")))
        .collect();
    let start = Arc::new(std::sync::Barrier::new(12));

    let handles: Vec<_> = (0..12)
        .map(|t| {
            let (locks, id, start) = (Arc::clone(&locks), ids[t % 3].clone(), Arc::clone(&start));
            std::thread::spawn(move || {
                start.wait();
                for _ in 0..200 {
                    locks.with_lock(&id, || std::hint::black_box(t));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert!(locks.is_empty(), "{} entries left", locks.len());
}
