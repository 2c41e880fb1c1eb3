// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opposite-order acquisition demonstration
//!
//! Registers a set of resources and runs two actors that request them in
//! opposite raw order. Through `acquire_all` the scenario completes on
//! every run; with `--unordered` the classic circular wait forms and both
//! actors report a lock timeout instead.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use foreman_core::{ActorId, CoordinationConfig, LockOrderingManager, OrderingError};
use tokio::task::JoinHandle;

#[derive(Args)]
pub struct DeadlockArgs {
    /// Number of resources in the scenario
    #[arg(long, default_value = "4")]
    pub resources: u32,

    /// Acquire in raw caller order instead of rank order
    #[arg(long)]
    pub unordered: bool,

    /// Overall acquisition deadline, e.g. "2s"
    #[arg(long, value_parser = humantime::parse_duration)]
    pub wait: Option<Duration>,

    /// Pause between raw acquisitions (unordered mode)
    #[arg(long, value_parser = humantime::parse_duration, default_value = "100ms")]
    pub stagger: Duration,

    /// How long each actor holds the resources
    #[arg(long, value_parser = humantime::parse_duration, default_value = "50ms")]
    pub hold: Duration,
}

pub async fn run(args: DeadlockArgs, config: &CoordinationConfig) -> Result<()> {
    let manager = LockOrderingManager::new();
    let names: Vec<String> = (1..=args.resources).map(|i| format!("L{i}")).collect();
    for name in &names {
        manager.register(name.clone())?;
    }
    let wait = args.wait.unwrap_or(config.ordering.acquire_timeout);

    let forward = names.clone();
    let reverse: Vec<String> = names.iter().rev().cloned().collect();

    let a = spawn_actor(&manager, "actor-a", forward, &args, wait);
    let b = spawn_actor(&manager, "actor-b", reverse, &args, wait);
    let (a, b) = (a.await?, b.await?);

    report("actor-a", &a);
    report("actor-b", &b);
    if a.is_ok() && b.is_ok() {
        println!("both actors finished without deadlock");
    }
    Ok(())
}

fn spawn_actor(
    manager: &LockOrderingManager,
    name: &str,
    order: Vec<String>,
    args: &DeadlockArgs,
    wait: Duration,
) -> JoinHandle<Result<(), OrderingError>> {
    let manager = manager.clone();
    let actor = ActorId::new(name);
    let unordered = args.unordered;
    let stagger = args.stagger;
    let hold = args.hold;
    tokio::spawn(async move {
        let ids: Vec<&str> = order.iter().map(String::as_str).collect();
        let lease = if unordered {
            manager.acquire_unordered(&actor, &ids, wait, stagger).await?
        } else {
            manager.acquire_all_within(&actor, &ids, wait).await?
        };
        tokio::time::sleep(hold).await;
        drop(lease);
        Ok(())
    })
}

fn report(name: &str, outcome: &Result<(), OrderingError>) {
    match outcome {
        Ok(()) => println!("{name}: acquired and released all resources"),
        Err(error) => println!("{name}: {error}"),
    }
}
