// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Population
//!
//! A set of neurons of one kind stepped together. Neurons share nothing but
//! the read-only `NeuronKind`, so each cycle is an independent unit of work
//! per neuron and runs on rayon when the `parallel` feature is on.

use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::models::{ActivationModel, ModelParameters, NeuronKind};
use crate::types::{NeuralError, Neuron, Result, SpikingNeuronState};

/// Below this many neurons the rayon split costs more than it saves
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 4_096;

/// Summary of one population cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    /// Cycle index (1-based, counted since the last `init_acts`)
    pub cycle: u64,
    pub spikes: usize,
    pub mean_act: f32,
}

#[derive(Debug, Clone)]
pub struct Population {
    kind: Arc<NeuronKind>,
    neurons: Vec<Neuron>,
    states: Vec<SpikingNeuronState>,
    cycle: u64,
}

impl Population {
    /// Create `count` neurons of `kind`, already initialized
    ///
    /// The kind is validated here so a bad parameter set fails before the
    /// first cycle rather than producing NaNs mid-run.
    pub fn new(kind: Arc<NeuronKind>, count: usize) -> Result<Self> {
        kind.validate()?;
        let mut pop = Self {
            kind,
            neurons: vec![Neuron::default(); count],
            states: vec![SpikingNeuronState::default(); count],
            cycle: 0,
        };
        pop.init_acts();
        debug!(
            model = pop.kind.model_name(),
            neurons = count,
            "population created"
        );
        Ok(pop)
    }

    pub fn kind(&self) -> &NeuronKind {
        &self.kind
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn states(&self) -> &[SpikingNeuronState] {
        &self.states
    }

    /// Reset every neuron to its initial state (start of a trial)
    pub fn init_acts(&mut self) {
        let kind = &*self.kind;
        for (nrn, state) in self.neurons.iter_mut().zip(self.states.iter_mut()) {
            kind.init_acts(nrn, state);
        }
        self.cycle = 0;
    }

    /// Set this cycle's excitatory and inhibitory conductances
    pub fn set_inputs(&mut self, ge: &[f32], gi: &[f32]) -> Result<()> {
        self.check_len(ge.len())?;
        self.check_len(gi.len())?;
        for ((nrn, &ge), &gi) in self.neurons.iter_mut().zip(ge).zip(gi) {
            nrn.ge = ge;
            nrn.gi = gi;
        }
        Ok(())
    }

    /// Set this cycle's noise samples (only used with `NoiseKind::Vm`)
    pub fn set_noise(&mut self, noise: &[f32]) -> Result<()> {
        self.check_len(noise.len())?;
        for (nrn, &n) in self.neurons.iter_mut().zip(noise) {
            nrn.noise = n;
        }
        Ok(())
    }

    /// Advance every neuron by one cycle
    pub fn cycle(&mut self) -> CycleReport {
        let kind = &*self.kind;

        #[cfg(feature = "parallel")]
        {
            if self.neurons.len() >= PARALLEL_THRESHOLD {
                self.neurons
                    .par_iter_mut()
                    .zip(self.states.par_iter_mut())
                    .for_each(|(nrn, state)| kind.cycle(nrn, state));
            } else {
                for (nrn, state) in self.neurons.iter_mut().zip(self.states.iter_mut()) {
                    kind.cycle(nrn, state);
                }
            }
        }

        #[cfg(not(feature = "parallel"))]
        for (nrn, state) in self.neurons.iter_mut().zip(self.states.iter_mut()) {
            kind.cycle(nrn, state);
        }

        self.cycle += 1;
        let spikes = self.states.iter().filter(|s| s.has_spiked()).count();
        let mean_act = if self.neurons.is_empty() {
            0.0
        } else {
            self.neurons.iter().map(|n| n.act).sum::<f32>() / self.neurons.len() as f32
        };

        let report = CycleReport {
            cycle: self.cycle,
            spikes,
            mean_act,
        };
        trace!(cycle = report.cycle, spikes, mean_act, "population cycle");
        report
    }

    fn check_len(&self, actual: usize) -> Result<()> {
        if actual != self.neurons.len() {
            return Err(NeuralError::ArraySizeMismatch {
                expected: self.neurons.len(),
                actual,
            });
        }
        Ok(())
    }
}
