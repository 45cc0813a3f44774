// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Spiking Neuron State
//!
//! Per-neuron mutable state for the spiking activation function.
//!
//! "Not observed yet" is carried explicitly instead of through negative
//! sentinels. The legacy encoding (`-1` never, `-2` one spike seen) remains
//! available through the `*_sentinel()` views for code that logs or
//! compares against it.

/// Running estimate of the inter-spike interval (in cycles)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum IsiEstimate {
    /// No spike has occurred since the last `init_act`
    #[default]
    Unstarted,
    /// Exactly one spike seen, so no interval has been measured yet
    OneSpikeSeen,
    /// Smoothed interval estimate
    Measured(f32),
}

impl IsiEstimate {
    /// Measured interval, if any
    pub fn measured(self) -> Option<f32> {
        match self {
            IsiEstimate::Measured(avg) => Some(avg),
            _ => None,
        }
    }

    /// Legacy float view: `-1` unstarted, `-2` one spike seen, else the average
    pub fn sentinel(self) -> f32 {
        match self {
            IsiEstimate::Unstarted => -1.0,
            IsiEstimate::OneSpikeSeen => -2.0,
            IsiEstimate::Measured(avg) => avg,
        }
    }

    /// Inverse of [`IsiEstimate::sentinel`]
    pub fn from_sentinel(value: f32) -> Self {
        if value >= 0.0 {
            IsiEstimate::Measured(value)
        } else if value == -2.0 {
            IsiEstimate::OneSpikeSeen
        } else {
            IsiEstimate::Unstarted
        }
    }
}

/// Spiking-specific state for one neuron
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikingNeuronState {
    /// 1.0 if the neuron spiked on the most recent cycle, else 0.0
    pub spike: f32,
    /// Cycles since the last spike; `None` until the first spike
    pub isi: Option<u32>,
    /// Running average inter-spike interval
    pub avg_isi: IsiEstimate,
    /// Sodium-gated potassium (KNa) conductance, fast timescale
    pub gkna_fast: f32,
    /// KNa conductance, medium timescale
    pub gkna_med: f32,
    /// KNa conductance, slow timescale
    pub gkna_slow: f32,
}

impl Default for SpikingNeuronState {
    fn default() -> Self {
        Self {
            spike: 0.0,
            isi: None,
            avg_isi: IsiEstimate::Unstarted,
            gkna_fast: 0.0,
            gkna_med: 0.0,
            gkna_slow: 0.0,
        }
    }
}

impl SpikingNeuronState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset everything to the "never happened" state (start of a trial)
    pub fn init_act(&mut self) {
        *self = Self::default();
    }

    pub fn has_spiked(&self) -> bool {
        self.spike > 0.5
    }

    /// Legacy float view of `isi`: `-1` if the neuron never spiked
    pub fn isi_sentinel(&self) -> f32 {
        match self.isi {
            Some(isi) => isi as f32,
            None => -1.0,
        }
    }

    /// Sum of the three KNa conductances (before `Gbar.K` scaling)
    #[inline]
    pub fn total_kna(&self) -> f32 {
        self.gkna_fast + self.gkna_med + self.gkna_slow
    }
}
