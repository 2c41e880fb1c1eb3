use super::*;
use std::thread;

fn run_incrementers(counter: &Counter, actors: usize, increments: u64) {
    let handles: Vec<_> = (0..actors)
        .map(|_| {
            let counter = counter.clone();
            thread::spawn(move || {
                for _ in 0..increments {
                    counter.increment();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn counter_starts_at_zero() {
    assert_eq!(Counter::new().read(), 0);
}

#[test]
fn add_accumulates() {
    let counter = Counter::new();
    counter.add(5);
    counter.add(7);
    assert_eq!(counter.read(), 12);
}

#[test]
fn clones_share_the_same_value() {
    let counter = Counter::new();
    let other = counter.clone();
    counter.increment();
    other.increment();
    assert_eq!(counter.read(), 2);
    assert_eq!(other.read(), 2);
}

use yare::parameterized;

#[parameterized(
        single_actor = { 1, 10_000 },
        two_actors = { 2, 10_000 },
        crowd = { 8, 5_000 },
    )]
fn concurrent_increments_are_exact(actors: usize, increments: u64) {
    let counter = Counter::new();
    run_incrementers(&counter, actors, increments);
    assert_eq!(counter.read(), actors as u64 * increments);
}

#[test]
fn racy_counter_loses_updates_under_contention() {
    // The hazard must stay real: across the trials at least one run has
    // to come up short of the true total.
    let mut lost = false;
    for _ in 0..20 {
        let counter = RacyCounter::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = counter.clone();
                thread::spawn(move || {
                    for _ in 0..2_000 {
                        counter.increment();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        if counter.read() < 8_000 {
            lost = true;
            break;
        }
    }
    assert!(lost, "unsynchronized increments never lost an update");
}

#[test]
fn racy_counter_is_exact_without_contention() {
    let counter = RacyCounter::new();
    for _ in 0..100 {
        counter.increment();
    }
    assert_eq!(counter.read(), 100);
}

use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn synchronized_total_is_exact(actors in 1usize..6, increments in 1u64..2_000) {
        let counter = Counter::new();
        run_incrementers(&counter, actors, increments);
        prop_assert_eq!(counter.read(), actors as u64 * increments);
    }
}
