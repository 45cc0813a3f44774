// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Closed set of supported neuron kinds.
//!
//! Layers hold one `NeuronKind` and match on it once per call; there is no
//! trait-object lookup in the per-cycle path.

use tracing::debug;

use super::rate_coded::RateCodedParams;
use super::spiking::SpikeActParams;
use super::traits::{ActivationModel, ModelParameters};
use crate::params::ActParams;
use crate::types::{Neuron, Result, SpikingNeuronState};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NeuronKind {
    RateCoded(RateCodedParams),
    Spiking(SpikeActParams),
}

impl Default for NeuronKind {
    fn default() -> Self {
        NeuronKind::Spiking(SpikeActParams::new())
    }
}

impl NeuronKind {
    pub fn is_spiking(&self) -> bool {
        matches!(self, NeuronKind::Spiking(_))
    }

    /// Base activation parameters shared by both kinds
    pub fn act_params(&self) -> &ActParams {
        match self {
            NeuronKind::RateCoded(p) => &p.act,
            NeuronKind::Spiking(p) => &p.act,
        }
    }

    /// Update derived fields and validate; the kind is ready to simulate on `Ok`
    pub fn finalize(&mut self) -> Result<()> {
        self.update();
        self.validate()?;
        debug!(model = self.model_name(), "neuron kind finalized");
        Ok(())
    }
}

impl ModelParameters for NeuronKind {
    fn update(&mut self) {
        match self {
            NeuronKind::RateCoded(p) => p.update(),
            NeuronKind::Spiking(p) => p.update(),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            NeuronKind::RateCoded(p) => p.validate(),
            NeuronKind::Spiking(p) => p.validate(),
        }
    }
}

impl ActivationModel for NeuronKind {
    fn model_name(&self) -> &'static str {
        match self {
            NeuronKind::RateCoded(p) => p.model_name(),
            NeuronKind::Spiking(p) => p.model_name(),
        }
    }

    fn init_acts(&self, nrn: &mut Neuron, state: &mut SpikingNeuronState) {
        match self {
            NeuronKind::RateCoded(p) => p.init_acts(nrn, state),
            NeuronKind::Spiking(p) => p.init_acts(nrn, state),
        }
    }

    #[inline]
    fn vm_from_g(&self, nrn: &mut Neuron, state: &mut SpikingNeuronState) {
        match self {
            NeuronKind::RateCoded(p) => p.vm_from_g(nrn, state),
            NeuronKind::Spiking(p) => p.vm_from_g(nrn, state),
        }
    }

    #[inline]
    fn act_from_vm(&self, nrn: &mut Neuron, state: &mut SpikingNeuronState) {
        match self {
            NeuronKind::RateCoded(p) => p.act_from_vm(nrn, state),
            NeuronKind::Spiking(p) => p.act_from_vm(nrn, state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_spiking() {
        let kind = NeuronKind::default();
        assert!(kind.is_spiking());
        assert_eq!(kind.model_name(), "Spiking");
    }

    #[test]
    fn test_finalize_rejects_invalid() {
        let mut sk = SpikeActParams::new();
        sk.spike.exp = true;
        sk.spike.exp_slope = 0.0;
        let mut kind = NeuronKind::Spiking(sk);
        assert!(kind.finalize().is_err());
    }

    #[test]
    fn test_finalize_refreshes_derived_fields() {
        let mut sk = SpikeActParams::new();
        sk.spike.rate_tau = 2.0;
        let mut kind = NeuronKind::Spiking(sk);
        kind.finalize().unwrap();
        match kind {
            NeuronKind::Spiking(p) => assert_eq!(p.spike.rate_dt, 0.5),
            NeuronKind::RateCoded(_) => unreachable!(),
        }
    }

    #[test]
    fn test_only_spiking_kind_spikes() {
        let kinds = [
            NeuronKind::RateCoded(RateCodedParams::new()),
            NeuronKind::Spiking(SpikeActParams::new()),
        ];
        for kind in kinds {
            let mut nrn = Neuron::with_conductances(1.0, 0.0);
            let mut state = SpikingNeuronState::new();
            kind.init_acts(&mut nrn, &mut state);
            let mut spikes = 0;
            for _ in 0..100 {
                kind.cycle(&mut nrn, &mut state);
                if state.has_spiked() {
                    spikes += 1;
                }
            }
            assert_eq!(spikes > 0, kind.is_spiking(), "{}", kind.model_name());
            assert!(nrn.act > 0.5, "{} act {}", kind.model_name(), nrn.act);
        }
    }
}
