// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded producer/consumer pipeline with sentinel termination
//!
//! Connects a known number of producers to one consumer through a
//! fixed-capacity channel. Termination is deterministic: every producer
//! closes exactly once, the consumer counts the typed sentinels, and
//! `EndOfStream` is reported only once the last sentinel arrives — at
//! which point no earlier item can still be queued, since each producer's
//! sentinel follows all of its items. Items from a single producer are
//! delivered in production order; there is no cross-producer ordering.
//!
//! Backpressure is the only flow control: `produce` waits for space and
//! no item is ever dropped. A producer that never calls `close_producer`
//! leaves the consumer waiting; honoring the close contract is the
//! caller's responsibility.

use std::fmt;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tokio::time::timeout;
use tracing::debug;

use crate::counter::Counter;

/// Identifier of one producer, in `0..producer_count`
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ProducerId(pub u32);

impl fmt::Display for ProducerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors from pipeline construction and use
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline capacity must be at least 1")]
    InvalidCapacity,
    #[error("pipeline needs at least one producer")]
    NoProducers,
    #[error("unknown producer: {0}")]
    UnknownProducer(ProducerId),
    #[error("producer {0} already closed")]
    AlreadyClosed(ProducerId),
    #[error("consume timed out")]
    Timeout,
    #[error("pipeline channel closed")]
    ChannelClosed,
}

/// One item as seen by the consumer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery<T> {
    pub producer: ProducerId,
    /// Per-producer sequence number, starting at 0
    pub seq: u64,
    pub payload: T,
}

/// Outcome of one `consume` call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Consumed<T> {
    Item(Delivery<T>),
    /// Every producer closed and all of their items were delivered
    EndOfStream,
}

enum Envelope<T> {
    Item(Delivery<T>),
    /// Typed end marker; can never collide with a payload value
    Done(ProducerId),
}

struct ProducerState {
    closed: bool,
    next_seq: u64,
}

struct ConsumerSide<T> {
    rx: mpsc::Receiver<Envelope<T>>,
    finished: u32,
    drained: bool,
}

/// Fixed-capacity channel from N producers to one consumer
pub struct BoundedPipeline<T> {
    tx: mpsc::Sender<Envelope<T>>,
    consumer: AsyncMutex<ConsumerSide<T>>,
    producers: Mutex<Vec<ProducerState>>,
    producer_count: u32,
    delivered: Counter,
}

impl<T> BoundedPipeline<T> {
    /// Create a pipeline for `producer_count` producers over a channel
    /// holding at most `capacity` undelivered entries
    pub fn new(capacity: usize, producer_count: u32) -> Result<Self, PipelineError> {
        if capacity == 0 {
            return Err(PipelineError::InvalidCapacity);
        }
        if producer_count == 0 {
            return Err(PipelineError::NoProducers);
        }
        let (tx, rx) = mpsc::channel(capacity);
        Ok(Self {
            tx,
            consumer: AsyncMutex::new(ConsumerSide {
                rx,
                finished: 0,
                drained: false,
            }),
            producers: Mutex::new(
                (0..producer_count)
                    .map(|_| ProducerState {
                        closed: false,
                        next_seq: 0,
                    })
                    .collect(),
            ),
            producer_count,
            delivered: Counter::new(),
        })
    }

    /// Enqueue `payload` for `producer`, waiting while the channel is full
    pub async fn produce(&self, producer: ProducerId, payload: T) -> Result<(), PipelineError> {
        let seq = {
            let mut producers = self.lock_producers();
            let state = producers
                .get_mut(producer.0 as usize)
                .ok_or(PipelineError::UnknownProducer(producer))?;
            if state.closed {
                return Err(PipelineError::AlreadyClosed(producer));
            }
            let seq = state.next_seq;
            state.next_seq += 1;
            seq
        };
        self.tx
            .send(Envelope::Item(Delivery {
                producer,
                seq,
                payload,
            }))
            .await
            .map_err(|_| PipelineError::ChannelClosed)
    }

    /// Mark `producer` finished, enqueueing its sentinel exactly once
    pub async fn close_producer(&self, producer: ProducerId) -> Result<(), PipelineError> {
        {
            let mut producers = self.lock_producers();
            let state = producers
                .get_mut(producer.0 as usize)
                .ok_or(PipelineError::UnknownProducer(producer))?;
            if state.closed {
                return Err(PipelineError::AlreadyClosed(producer));
            }
            state.closed = true;
        }
        debug!(%producer, "producer closed");
        self.tx
            .send(Envelope::Done(producer))
            .await
            .map_err(|_| PipelineError::ChannelClosed)
    }

    /// Dequeue the next item, waiting until one is available
    ///
    /// Returns `EndOfStream` once all producers have closed and every
    /// item has been delivered; further calls keep returning
    /// `EndOfStream`.
    pub async fn consume(&self) -> Result<Consumed<T>, PipelineError> {
        let mut consumer = self.consumer.lock().await;
        self.next_from(&mut consumer).await
    }

    /// Like [`consume`](Self::consume) with a deadline
    ///
    /// On expiry nothing is lost: items already consumed stay consumed
    /// and undelivered items stay queued for a future call.
    pub async fn consume_within(&self, wait: Duration) -> Result<Consumed<T>, PipelineError> {
        match timeout(wait, self.consume()).await {
            Ok(result) => result,
            Err(_) => Err(PipelineError::Timeout),
        }
    }

    async fn next_from(
        &self,
        consumer: &mut ConsumerSide<T>,
    ) -> Result<Consumed<T>, PipelineError> {
        if consumer.drained {
            return Ok(Consumed::EndOfStream);
        }
        loop {
            match consumer.rx.recv().await {
                Some(Envelope::Item(delivery)) => {
                    self.delivered.increment();
                    return Ok(Consumed::Item(delivery));
                }
                Some(Envelope::Done(producer)) => {
                    consumer.finished += 1;
                    debug!(%producer, finished = consumer.finished, "sentinel consumed");
                    if consumer.finished == self.producer_count {
                        consumer.drained = true;
                        return Ok(Consumed::EndOfStream);
                    }
                }
                // A sender handle lives in `self`, so the channel cannot
                // close while the pipeline is alive.
                None => return Err(PipelineError::ChannelClosed),
            }
        }
    }

    /// Items delivered to the consumer so far
    pub fn delivered(&self) -> u64 {
        self.delivered.read()
    }

    fn lock_producers(&self) -> MutexGuard<'_, Vec<ProducerState>> {
        self.producers.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
