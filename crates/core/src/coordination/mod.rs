// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordination primitives for exclusive multi-resource access
//!
//! This module provides:
//! - **LockOrderingManager** - Ranked registration and ordered acquisition
//!   of named exclusive resources
//! - **Lease** - RAII handle releasing every held lock on all exit paths

pub mod ordering;

pub use ordering::{ActorId, Lease, LockOrderingManager, OrderingError, Rank};
