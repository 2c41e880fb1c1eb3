//! Integration tests composing the coordination primitives.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use foreman_core::{
    ActorId, BoundedPipeline, Consumed, Counter, LockOrderingManager, ProducerId, Task,
    TaskOutcome, WorkerPool,
};

/// Workers fan results into a pipeline while the consumer drains it: the
/// streaming composition of pool and pipeline.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn pool_results_stream_through_a_pipeline() {
    const PRODUCERS: u32 = 2;
    const TASKS_PER_PRODUCER: u64 = 10;

    let pipeline = Arc::new(BoundedPipeline::new(4, PRODUCERS).unwrap());

    for p in 0..PRODUCERS {
        let pipeline = Arc::clone(&pipeline);
        tokio::spawn(async move {
            let pool = WorkerPool::new(2).unwrap();
            let tasks: Vec<Task<u64>> = (0..TASKS_PER_PRODUCER)
                .map(|n| Task::new(n, u64::from(p) * 100 + n))
                .collect();
            let results = pool.run(tasks, |n| Ok::<u64, String>(n * 2)).await;

            let id = ProducerId(p);
            for result in results {
                match result.outcome {
                    TaskOutcome::Completed(value) => {
                        pipeline.produce(id, value).await.unwrap();
                    }
                    TaskOutcome::Failed { reason } => panic!("unexpected failure: {reason}"),
                }
            }
            pipeline.close_producer(id).await.unwrap();
        });
    }

    let mut received = 0u64;
    let mut sum = 0u64;
    loop {
        match pipeline.consume().await.unwrap() {
            Consumed::Item(delivery) => {
                received += 1;
                sum += delivery.payload;
            }
            Consumed::EndOfStream => break,
        }
    }

    assert_eq!(received, u64::from(PRODUCERS) * TASKS_PER_PRODUCER);
    // sum of 2n for n in 0..10 plus 2(100 + n) for n in 0..10
    let expected: u64 = (0..TASKS_PER_PRODUCER)
        .map(|n| 2 * n + 2 * (100 + n))
        .sum();
    assert_eq!(sum, expected);
}

/// Actors guarded by the ordering manager update a shared counter; the
/// count stays exact and nothing deadlocks despite opposite-order
/// requests.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn guarded_actors_never_deadlock_and_count_exactly() {
    const ROUNDS: u64 = 30;

    let manager = LockOrderingManager::new();
    manager.register("ledger").unwrap();
    manager.register("journal").unwrap();
    let counter = Counter::new();

    let mut actors = Vec::new();
    for (name, order) in [("fwd", ["ledger", "journal"]), ("rev", ["journal", "ledger"])] {
        let manager = manager.clone();
        let counter = counter.clone();
        actors.push(tokio::spawn(async move {
            let actor = ActorId::new(name);
            for _ in 0..ROUNDS {
                let lease = manager.acquire_all(&actor, &order).await.unwrap();
                counter.increment();
                drop(lease);
            }
        }));
    }

    let joined = tokio::time::timeout(Duration::from_secs(10), async {
        for actor in actors {
            actor.await.unwrap();
        }
    })
    .await;
    assert!(joined.is_ok(), "guarded actors deadlocked");
    assert_eq!(counter.read(), 2 * ROUNDS);
}
