// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared counter demonstration
//!
//! Spawns N actors that each increment a shared counter K times, then
//! compares the final count against the known-correct total. With
//! `--racy` the unsynchronized counter is used instead, and the shortfall
//! it produces under contention is the point of the demo.

use anyhow::Result;
use clap::Args;
use foreman_core::{Counter, RacyCounter};

#[derive(Args)]
pub struct CounterArgs {
    /// Number of concurrent actors
    #[arg(long, default_value = "4")]
    pub actors: u32,

    /// Increments per actor
    #[arg(long, default_value = "100000")]
    pub increments: u64,

    /// Use the unsynchronized counter to demonstrate lost updates
    #[arg(long)]
    pub racy: bool,
}

pub async fn run(args: CounterArgs) -> Result<()> {
    let expected = u64::from(args.actors) * args.increments;
    let increments = args.increments;

    let value = if args.racy {
        let counter = RacyCounter::new();
        spawn_actors(args.actors, {
            let counter = counter.clone();
            move || {
                for _ in 0..increments {
                    counter.increment();
                }
            }
        })
        .await?;
        counter.read()
    } else {
        let counter = Counter::new();
        spawn_actors(args.actors, {
            let counter = counter.clone();
            move || {
                for _ in 0..increments {
                    counter.increment();
                }
            }
        })
        .await?;
        counter.read()
    };

    if value == expected {
        println!("final count: {value} (expected {expected})");
    } else {
        println!(
            "final count: {value} (expected {expected}, lost {})",
            expected - value
        );
    }
    Ok(())
}

/// Run `count` copies of `body`, each on its own blocking thread
async fn spawn_actors(count: u32, body: impl Fn() + Clone + Send + 'static) -> Result<()> {
    let mut handles = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let body = body.clone();
        handles.push(tokio::task::spawn_blocking(body));
    }
    for handle in handles {
        handle.await?;
    }
    Ok(())
}
