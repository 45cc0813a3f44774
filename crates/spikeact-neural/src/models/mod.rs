// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Activation Models
//!
//! Each model advances one neuron by one cycle in two phases: a membrane
//! potential update from conductances, then an activation update from the
//! new membrane potential.
//!
//! ## Adding a New Model
//!
//! 1. Create `src/models/your_model.rs`
//! 2. Implement `ActivationModel` and `ModelParameters`
//! 3. Add a variant to `NeuronKind` and match it in `kind.rs`
//! 4. Add tests

pub mod kind;
pub mod rate_coded;
pub mod spiking;
pub mod traits;

pub use kind::NeuronKind;
pub use rate_coded::RateCodedParams;
pub use spiking::{SpikeActParams, SpikeOutcome, VoltageUpdate};
pub use traits::{ActivationModel, ModelParameters};
