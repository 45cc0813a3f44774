// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Parameter Sets
//!
//! Immutable-during-a-run parameters shared by every neuron of one kind.
//! Each struct follows the same two-step lifecycle:
//!
//! 1. Construct (`Default`, deserialize, or edit fields)
//! 2. Call `update()` to recompute derived fields, then `validate()`
//!
//! Skipping `update()` after an edit leaves derived rates stale; nothing at
//! simulation time re-checks it.

pub mod act;
pub mod kna;
pub mod spike;
pub mod xx1;

pub use act::{ActInitParams, ActParams, DtParams, ErevParams, GbarParams, MinMax, NoiseKind, NoiseParams};
pub use kna::{AdaptationChannel, KnaAdaptParams, KnaChannel};
pub use spike::{SpikeParams, DEFAULT_EARLY_UPDATE_FACTOR, DEFAULT_SNAP_FACTOR};
pub use xx1::Xx1Params;
