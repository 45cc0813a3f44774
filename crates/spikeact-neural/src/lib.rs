// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Spiking Activation Kernel
//!
//! ALL per-neuron computation in one place:
//! - **Types**: Neuron electrical state, spiking state, errors
//! - **Params**: Conductances, reversal potentials, time constants, spike and KNa parameters
//! - **Models**: Spiking (AdEx-style) and rate-coded (noisy XX1) activation
//! - **Population**: Independent per-neuron cycling over a shared parameter set
//!
//! ## Per-cycle pipeline (spiking)
//! ```text
//! 1. spike_vm_from_g    refractory gate → midpoint Vm step (+ exp current) → noise → clip
//! 2. spike_act_from_vm  threshold → reset / ISI counters → running avg ISI → rate code → KNa
//! ```
//!
//! Parameter structs are immutable during a run and shared by reference; every
//! neuron carries its own [`Neuron`] and [`SpikingNeuronState`].

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod types;

// Parameter sets (shared, read-only during a run)
pub mod params;

// Activation models and the closed set of neuron kinds
pub mod models;

// Parallel stepping over many neurons of one kind
pub mod population;

pub use types::{Error, IsiEstimate, NeuralError, Neuron, Result, SpikingNeuronState};

pub use params::{
    ActInitParams, ActParams, AdaptationChannel, DtParams, ErevParams, GbarParams, KnaAdaptParams,
    KnaChannel, MinMax, NoiseKind, NoiseParams, SpikeParams, Xx1Params,
};

pub use models::{
    ActivationModel, ModelParameters, NeuronKind, RateCodedParams, SpikeActParams, SpikeOutcome,
    VoltageUpdate,
};

pub use population::{CycleReport, Population};
