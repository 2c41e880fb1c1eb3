// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Multi-producer log aggregation demonstration
//!
//! Producers each emit a fixed count of tagged lines through the bounded
//! pipeline; the single consumer writes them to one destination. Every
//! line arrives whole and per-producer order is preserved.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use foreman_core::{BoundedPipeline, Consumed, CoordinationConfig, ProducerId};

#[derive(Args)]
pub struct LogpipeArgs {
    /// Number of producers
    #[arg(long)]
    pub producers: Option<u32>,

    /// Lines per producer
    #[arg(long, default_value = "200")]
    pub lines: u64,

    /// Channel capacity
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Destination file (stdout when omitted)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub async fn run(args: LogpipeArgs, config: &CoordinationConfig) -> Result<()> {
    let producers = args.producers.unwrap_or(config.pipeline.producers);
    let capacity = args.capacity.unwrap_or(config.pipeline.capacity);
    let pipeline = Arc::new(BoundedPipeline::new(capacity, producers)?);

    let mut senders = Vec::with_capacity(producers as usize);
    for p in 0..producers {
        let pipeline = Arc::clone(&pipeline);
        let lines = args.lines;
        senders.push(tokio::spawn(async move {
            let id = ProducerId(p);
            for line in 0..lines {
                pipeline.produce(id, format!("P{p:02} L{line:04}")).await?;
            }
            pipeline.close_producer(id).await
        }));
    }

    let mut sink: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout().lock()),
    };
    loop {
        match pipeline.consume().await? {
            Consumed::Item(delivery) => writeln!(sink, "{}", delivery.payload)?,
            Consumed::EndOfStream => break,
        }
    }
    sink.flush()?;
    drop(sink);

    for sender in senders {
        sender.await??;
    }

    println!(
        "delivered {} lines from {} producers",
        pipeline.delivered(),
        producers
    );
    Ok(())
}
