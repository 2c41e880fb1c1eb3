// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered acquisition of named exclusive resources
//!
//! Every registered resource is assigned a fixed rank. `acquire_all`
//! sorts each request by rank and takes the locks in that order, which
//! makes the circular wait behind classic lock deadlocks structurally
//! impossible: an actor only ever waits for a lock ranked above
//! everything it already holds, so no two actors can be mutually
//! blocked. `acquire_unordered` keeps raw caller-order acquisition
//! available for demonstrating the hazard the ordered path prevents.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio::time::{sleep, timeout_at, Instant};
use tracing::debug;

/// Unique identifier for an actor requesting or holding resources
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ActorId(pub String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a resource in the global acquisition order
pub type Rank = u32;

/// Errors from resource registration and acquisition
#[derive(Debug, Error)]
pub enum OrderingError {
    #[error("duplicate resource: {0}")]
    DuplicateResource(String),
    #[error("unknown resource: {0}")]
    UnknownResource(String),
    #[error("lock timeout waiting for resource: {0}")]
    LockTimeout(String),
    #[error("actor {0} already holds an outstanding lease")]
    LeaseOutstanding(ActorId),
}

struct Registered {
    rank: Rank,
    lock: Arc<AsyncMutex<()>>,
}

#[derive(Default)]
struct Inner {
    resources: HashMap<String, Registered>,
    next_rank: Rank,
    /// Actors with an outstanding lease; blocks nested acquisition
    active: HashSet<ActorId>,
}

/// Assigns every named resource a total order and enforces that order on
/// acquisition
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct LockOrderingManager {
    inner: Arc<Mutex<Inner>>,
}

impl LockOrderingManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource, assigning it the next unused rank
    pub fn register(&self, resource: impl Into<String>) -> Result<Rank, OrderingError> {
        let resource = resource.into();
        let mut inner = self.lock_inner();
        if inner.resources.contains_key(&resource) {
            return Err(OrderingError::DuplicateResource(resource));
        }
        let rank = inner.next_rank;
        inner.next_rank += 1;
        inner.resources.insert(
            resource.clone(),
            Registered {
                rank,
                lock: Arc::new(AsyncMutex::new(())),
            },
        );
        debug!(%resource, rank, "resource registered");
        Ok(rank)
    }

    /// Acquire every requested resource in rank order, waiting as long as
    /// it takes
    ///
    /// The request is treated as a set: duplicates are ignored. Fails
    /// with `UnknownResource` for unregistered names and with
    /// `LeaseOutstanding` if the actor already holds a lease; piecemeal
    /// acquisition on top of held resources would reintroduce the
    /// circular-wait hazard the ordering exists to prevent.
    pub async fn acquire_all(
        &self,
        actor: &ActorId,
        resources: &[&str],
    ) -> Result<Lease, OrderingError> {
        self.acquire(actor, resources, true, None, None).await
    }

    /// Like [`acquire_all`](Self::acquire_all) with an overall deadline
    ///
    /// On expiry every lock taken so far is released in descending rank
    /// order and the actor's reservation is cleared before `LockTimeout`
    /// is reported; partial acquisition is never left standing.
    pub async fn acquire_all_within(
        &self,
        actor: &ActorId,
        resources: &[&str],
        wait: Duration,
    ) -> Result<Lease, OrderingError> {
        self.acquire(actor, resources, true, Some(wait), None).await
    }

    /// Acquire in the caller's order instead of rank order
    ///
    /// This is the hazard the ordered path exists to prevent: two actors
    /// requesting the same resources in opposite order can block each
    /// other until the deadline expires. `stagger` pauses between
    /// acquisitions so the interleaving of the motivating scenario is
    /// actually exercised. Kept for demonstrations and regression tests;
    /// production code uses [`acquire_all`](Self::acquire_all).
    pub async fn acquire_unordered(
        &self,
        actor: &ActorId,
        resources: &[&str],
        wait: Duration,
        stagger: Duration,
    ) -> Result<Lease, OrderingError> {
        self.acquire(actor, resources, false, Some(wait), Some(stagger))
            .await
    }

    async fn acquire(
        &self,
        actor: &ActorId,
        resources: &[&str],
        ordered: bool,
        wait: Option<Duration>,
        stagger: Option<Duration>,
    ) -> Result<Lease, OrderingError> {
        let mut wanted = {
            let mut inner = self.lock_inner();
            if inner.active.contains(actor) {
                return Err(OrderingError::LeaseOutstanding(actor.clone()));
            }
            let mut wanted = Vec::with_capacity(resources.len());
            let mut seen = HashSet::new();
            for name in resources {
                if !seen.insert(*name) {
                    continue;
                }
                let entry = inner
                    .resources
                    .get(*name)
                    .ok_or_else(|| OrderingError::UnknownResource((*name).to_string()))?;
                wanted.push((entry.rank, (*name).to_string(), Arc::clone(&entry.lock)));
            }
            inner.active.insert(actor.clone());
            wanted
        };
        if ordered {
            wanted.sort_by_key(|(rank, _, _)| *rank);
        }

        // Declared before `held` so that on any early exit the locks drop
        // first, then the reservation clears.
        let mut reservation = Reservation {
            inner: Arc::clone(&self.inner),
            actor: actor.clone(),
            armed: true,
        };
        let deadline = wait.map(|wait| Instant::now() + wait);
        let total = wanted.len();
        let mut held = HeldStack(Vec::with_capacity(total));

        for (index, (rank, name, lock)) in wanted.into_iter().enumerate() {
            let guard = match deadline {
                Some(deadline) => match timeout_at(deadline, lock.lock_owned()).await {
                    Ok(guard) => guard,
                    Err(_) => {
                        debug!(%actor, resource = %name, "acquisition timed out");
                        return Err(OrderingError::LockTimeout(name));
                    }
                },
                None => lock.lock_owned().await,
            };
            held.0.push((rank, name, guard));
            if let Some(stagger) = stagger {
                if index + 1 < total {
                    sleep(stagger).await;
                }
            }
        }

        reservation.armed = false;
        debug!(%actor, held = held.0.len(), "lease granted");
        Ok(Lease {
            held,
            actor: actor.clone(),
            inner: Arc::clone(&self.inner),
        })
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Holds the actor's reservation until the lease takes over, clearing it
/// if acquisition is abandoned for any reason
struct Reservation {
    inner: Arc<Mutex<Inner>>,
    actor: ActorId,
    armed: bool,
}

impl Drop for Reservation {
    fn drop(&mut self) {
        if self.armed {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.active.remove(&self.actor);
        }
    }
}

/// Held guards, released last-acquired-first
struct HeldStack(Vec<(Rank, String, OwnedMutexGuard<()>)>);

impl HeldStack {
    fn unwind(&mut self) {
        while self.0.pop().is_some() {}
    }
}

impl Drop for HeldStack {
    fn drop(&mut self) {
        self.unwind();
    }
}

/// Live handle over a set of held resources
///
/// Dropping the lease releases every lock in reverse acquisition order
/// (descending rank for ordered acquisition) and clears the actor's
/// outstanding-lease reservation. Release happens on every exit path;
/// there is no separate unlock call to forget.
pub struct Lease {
    held: HeldStack,
    actor: ActorId,
    inner: Arc<Mutex<Inner>>,
}

impl Lease {
    /// The actor holding this lease
    pub fn actor(&self) -> &ActorId {
        &self.actor
    }

    /// Names of the held resources in acquisition order
    pub fn resources(&self) -> Vec<&str> {
        self.held.0.iter().map(|(_, name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.held.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.0.is_empty()
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        // Locks in reverse acquisition order, then the reservation.
        self.held.unwind();
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.active.remove(&self.actor);
        debug!(actor = %self.actor, "lease released");
    }
}

#[cfg(test)]
#[path = "ordering_tests.rs"]
mod tests;
