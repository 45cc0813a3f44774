// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Neural Types Module
//!
//! Per-neuron state carried across cycles, plus the crate error type.

pub mod error;
pub mod neuron;
pub mod spike_state;

pub use error::{Error, NeuralError, Result};
pub use neuron::Neuron;
pub use spike_state::{IsiEstimate, SpikingNeuronState};
