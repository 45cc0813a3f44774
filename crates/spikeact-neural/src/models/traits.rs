// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Traits shared by activation models.

use crate::types::{Neuron, Result, SpikingNeuronState};

/// Two-phase per-cycle activation model
///
/// `state` carries the spiking counters and KNa conductances; models that do
/// not spike still use its KNa fields.
pub trait ActivationModel {
    /// Human-readable model name for logging
    fn model_name(&self) -> &'static str;

    /// Reset electrical and spiking state at the start of a trial
    fn init_acts(&self, nrn: &mut Neuron, state: &mut SpikingNeuronState);

    /// Phase 1: membrane potential from conductances
    fn vm_from_g(&self, nrn: &mut Neuron, state: &mut SpikingNeuronState);

    /// Phase 2: activation from membrane potential
    fn act_from_vm(&self, nrn: &mut Neuron, state: &mut SpikingNeuronState);

    /// Run both phases in order
    #[inline]
    fn cycle(&self, nrn: &mut Neuron, state: &mut SpikingNeuronState) {
        self.vm_from_g(nrn, state);
        self.act_from_vm(nrn, state);
    }
}

/// Parameter set lifecycle: edit, `update()`, `validate()`
pub trait ModelParameters {
    /// Recompute derived fields after edits
    fn update(&mut self);

    /// Fail-fast check run before a simulation starts
    fn validate(&self) -> Result<()>;
}
