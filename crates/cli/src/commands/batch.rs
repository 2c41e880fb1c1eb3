// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CPU-bound batch demonstration
//!
//! Fans independent computations out over the worker pool and prints one
//! line per result. Factorials report the exact value while it fits in a
//! machine word and the digit count beyond that; `--sum-ranges` sums
//! contiguous ranges instead and reports the grand total.

use anyhow::Result;
use clap::Args;
use foreman_core::{
    BatchOutcome, CoordinationConfig, Task, TaskOutcome, TaskResult, WorkerPool,
};

#[derive(Args)]
pub struct BatchArgs {
    /// Number of workers
    #[arg(long)]
    pub workers: Option<usize>,

    /// Sum contiguous ranges of the given lengths instead of factorials
    #[arg(long)]
    pub sum_ranges: bool,

    /// Inputs (factorial operands, or range lengths with --sum-ranges)
    #[arg(default_values_t = [5u64, 10, 15, 20, 25])]
    pub inputs: Vec<u64>,
}

pub async fn run(args: BatchArgs, config: &CoordinationConfig) -> Result<()> {
    let workers = args.workers.unwrap_or(config.pool.workers);
    let pool = WorkerPool::new(workers)?;

    if args.sum_ranges {
        let mut tasks = Vec::with_capacity(args.inputs.len());
        let mut start = 1u64;
        for (index, length) in args.inputs.iter().enumerate() {
            tasks.push(Task::new(index as u64, (start, start + length)));
            start += length;
        }
        let results = pool
            .run(tasks, |(lo, hi)| Ok::<u64, String>((lo..hi).sum()))
            .await;

        let mut total = 0u64;
        for result in sorted_by_id(&results) {
            match &result.outcome {
                TaskOutcome::Completed(sum) => {
                    println!("task {}: sum {}", result.id, sum);
                    total += sum;
                }
                TaskOutcome::Failed { reason } => {
                    println!("task {}: failed: {}", result.id, reason);
                }
            }
        }
        println!("total: {total}");
        return Ok(());
    }

    let tasks: Vec<Task<u64>> = args.inputs.iter().map(|&n| Task::new(n, n)).collect();
    match config.pool.deadline {
        Some(wait) => match pool.run_within(tasks, factorial_report, wait).await {
            BatchOutcome::Complete(results) => print_results(&results),
            BatchOutcome::TimedOut { completed } => {
                print_results(&completed);
                println!(
                    "deadline expired after {} of {} results",
                    completed.len(),
                    args.inputs.len()
                );
            }
        },
        None => print_results(&pool.run(tasks, factorial_report).await),
    }
    Ok(())
}

fn factorial_report(n: u64) -> Result<String, String> {
    if n <= 20 {
        // 20! is the largest factorial that fits in a u64.
        let value: u64 = (1..=n).product();
        Ok(format!("{n}! = {value}"))
    } else {
        let digits = (2..=n).map(|k| (k as f64).log10()).sum::<f64>().floor() as u64 + 1;
        Ok(format!("{n}! has {digits} digits"))
    }
}

fn print_results(results: &[TaskResult<String>]) {
    for result in sorted_by_id(results) {
        match &result.outcome {
            TaskOutcome::Completed(line) => println!("{line}"),
            TaskOutcome::Failed { reason } => println!("task {}: failed: {}", result.id, reason),
        }
    }
}

/// Completion order varies run to run; sort by id for stable output
fn sorted_by_id<R>(results: &[TaskResult<R>]) -> Vec<&TaskResult<R>> {
    let mut sorted: Vec<&TaskResult<R>> = results.iter().collect();
    sorted.sort_by_key(|result| result.id);
    sorted
}
