// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Rate-Coded Activation
//!
//! Mean-field counterpart of the spiking model. Vm follows a single Euler
//! step; activation is the noisy-XX1 function of how far the excitatory
//! conductance exceeds the level needed to hold Vm at threshold.
//!
//! ```text
//! Vm   = clip(Vm + vm_dt · Inet(Vm) [+ noise])
//! act* = NoisyXX1(ge·gbar_e − ge_thr)      (or NoisyXX1(Vm − thr) while quiescent)
//! act += vm_dt · (act* − act)
//! ```

use super::traits::{ActivationModel, ModelParameters};
use crate::params::{ActParams, KnaAdaptParams, NoiseKind};
use crate::types::{Neuron, Result, SpikingNeuronState};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RateCodedParams {
    pub act: ActParams,
    pub kna: KnaAdaptParams,
}

impl RateCodedParams {
    pub fn new() -> Self {
        let mut rc = Self::default();
        rc.update();
        rc
    }
}

impl ModelParameters for RateCodedParams {
    fn update(&mut self) {
        self.act.update();
        self.kna.update();
    }

    fn validate(&self) -> Result<()> {
        self.act.validate()?;
        self.kna.validate()
    }
}

impl ActivationModel for RateCodedParams {
    fn model_name(&self) -> &'static str {
        "Rate-coded (noisy XX1)"
    }

    fn init_acts(&self, nrn: &mut Neuron, state: &mut SpikingNeuronState) {
        self.act.init_acts(nrn);
        state.init_act();
    }

    fn vm_from_g(&self, nrn: &mut Neuron, state: &mut SpikingNeuronState) {
        let ac = &self.act;
        let ge = nrn.ge * ac.gbar.e;
        let gi = nrn.gi * ac.gbar.i;
        let gk = if self.kna.on {
            ac.gbar.k * state.total_kna()
        } else {
            0.0
        };
        nrn.gk = gk;
        nrn.inet = ac.inet_from_g(nrn.vm, ge, gi, gk);

        let mut new_vm = nrn.vm + ac.dt.vm_dt * nrn.inet;
        if ac.noise.kind == NoiseKind::Vm {
            new_vm += nrn.noise;
        }
        nrn.vm = ac.vm_range.clip(new_vm);
    }

    fn act_from_vm(&self, nrn: &mut Neuron, state: &mut SpikingNeuronState) {
        let ac = &self.act;
        let target = if nrn.act < ac.xx1.vm_act_thr && nrn.vm <= ac.xx1.thr {
            // quiescent: let sub-threshold Vm lead so activity can start smoothly
            ac.xx1.noisy_xx1(nrn.vm - ac.xx1.thr)
        } else {
            let ge_thr = ac.ge_thr_from_g(nrn.gi * ac.gbar.i, nrn.gk);
            ac.xx1.noisy_xx1(nrn.ge * ac.gbar.e - ge_thr)
        };

        let new_act = nrn.act + ac.dt.vm_dt * (target - nrn.act);
        nrn.act_delta = new_act - nrn.act;
        nrn.act = new_act;

        if self.kna.on {
            self.kna.gc_from_rate(
                &mut state.gkna_fast,
                &mut state.gkna_med,
                &mut state.gkna_slow,
                nrn.act,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(rc: &RateCodedParams, ge: f32, gi: f32, cycles: usize) -> (Neuron, SpikingNeuronState) {
        let mut nrn = Neuron::with_conductances(ge, gi);
        let mut state = SpikingNeuronState::new();
        rc.init_acts(&mut nrn, &mut state);
        for _ in 0..cycles {
            rc.cycle(&mut nrn, &mut state);
        }
        (nrn, state)
    }

    #[test]
    fn test_no_input_stays_quiet() {
        let rc = RateCodedParams::new();
        let (nrn, state) = run(&rc, 0.0, 0.0, 200);
        assert!(nrn.act < 1e-3);
        // Relaxes to the leak reversal potential
        assert!((nrn.vm - rc.act.erev.l).abs() < 1e-3);
        assert!(!state.has_spiked());
    }

    #[test]
    fn test_strong_drive_saturates() {
        let rc = RateCodedParams::new();
        let (nrn, _) = run(&rc, 1.0, 0.0, 200);
        assert!(nrn.act > 0.9, "act {}", nrn.act);
        assert!(nrn.act <= 1.0);
    }

    #[test]
    fn test_activation_increases_with_drive() {
        let rc = RateCodedParams::new();
        let (weak, _) = run(&rc, 0.25, 0.0, 200);
        let (strong, _) = run(&rc, 0.5, 0.0, 200);
        assert!(strong.act > weak.act);
    }

    #[test]
    fn test_inhibition_reduces_activation() {
        let rc = RateCodedParams::new();
        let (free, _) = run(&rc, 0.5, 0.0, 200);
        let (inhibited, _) = run(&rc, 0.5, 0.3, 200);
        assert!(inhibited.act < free.act);
    }

    #[test]
    fn test_kna_accumulates_with_activity() {
        let mut rc = RateCodedParams::new();
        rc.kna.on = true;
        let (nrn, state) = run(&rc, 1.0, 0.0, 300);
        assert!(state.total_kna() > 0.0);
        assert!(nrn.gk > 0.0);
    }
}
