// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Neuron electrical state shared by every activation model.

/// Per-neuron electrical state, owned by whatever holds the neuron array.
///
/// `ge`, `gi` and `noise` are inputs written by the caller before each cycle;
/// the remaining fields are written by the activation model.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Neuron {
    /// Rate-code activation in [0, 1]
    pub act: f32,
    /// Change in `act` on the most recent cycle
    pub act_delta: f32,
    /// Excitatory conductance (unscaled, before `Gbar.E`)
    pub ge: f32,
    /// Inhibitory conductance (unscaled, before `Gbar.I`)
    pub gi: f32,
    /// Adaptation (potassium) conductance, already scaled by `Gbar.K`
    pub gk: f32,
    /// Net current from the most recent Vm update
    pub inet: f32,
    /// Membrane potential (normalized units)
    pub vm: f32,
    /// Noise sample for this cycle
    pub noise: f32,
}

impl Neuron {
    /// Neuron with the given synaptic conductances and zeroed state
    pub fn with_conductances(ge: f32, gi: f32) -> Self {
        Self {
            ge,
            gi,
            ..Self::default()
        }
    }
}
