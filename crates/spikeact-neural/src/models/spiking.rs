// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Spiking Activation (AdEx-style)
//!
//! Turns the rate-coded point neuron into a discretely spiking one while still
//! producing a rate-code activation the rest of a mean-field network can read.
//!
//! ## Model Dynamics
//!
//! ```text
//! Vm update (skipped while 0 <= isi < tr):
//!     gk     = gbar_k × (gkna_fast + gkna_med + gkna_slow)
//!     inet1  = Inet(Vm)
//!     vm_eff = Vm + ½·vm_dt·inet1                   (midpoint half-step)
//!     inet2  = Inet(vm_eff) [+ gbar_l·slope·exp((vm_eff − thr)/slope)]
//!     Vm     = clip(Vm + vm_dt·inet2 [+ noise])
//!
//! Spike check:
//!     Vm > thr (exp_thr when exp is on):
//!         spike = 1, Vm = vm_r, Inet = 0, fold isi+1 into avg_isi, isi = 0
//!     otherwise:
//!         spike = 0, isi += 1, fold isi early if isi > 1.2 × avg_isi
//!
//! Rate code:
//!     act += vm_dt × (act_from_isi(avg_isi) − act)
//! ```

use tracing::trace;

use super::traits::{ActivationModel, ModelParameters};
use crate::params::{ActParams, AdaptationChannel, KnaAdaptParams, NoiseKind, SpikeParams};
use crate::types::{IsiEstimate, Neuron, Result, SpikingNeuronState};

/// Result of the Vm integration phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageUpdate {
    pub vm: f32,
    pub inet: f32,
    pub gk: f32,
}

/// Result of the spike detection / rate-code phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeOutcome {
    pub spiked: bool,
    pub vm: f32,
    pub act: f32,
    pub act_delta: f32,
}

/// Full parameter set for spiking neurons: base activation, spike, KNa
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpikeActParams {
    pub act: ActParams,
    pub spike: SpikeParams,
    pub kna: KnaAdaptParams,
}

impl SpikeActParams {
    /// Default parameters with derived fields computed
    pub fn new() -> Self {
        let mut sk = Self::default();
        sk.update();
        sk
    }

    /// Finalize derived fields and validate in one step
    pub fn new_validated(act: ActParams, spike: SpikeParams, kna: KnaAdaptParams) -> Result<Self> {
        let mut sk = Self { act, spike, kna };
        sk.update();
        sk.validate()?;
        Ok(sk)
    }

    /// Vm that triggers a spike
    #[inline]
    pub fn threshold(&self) -> f32 {
        if self.spike.exp {
            self.spike.exp_thr
        } else {
            self.act.xx1.thr
        }
    }

    #[inline]
    fn in_refractory(&self, sn: &SpikingNeuronState) -> bool {
        self.spike.tr > 0 && matches!(sn.isi, Some(isi) if isi < self.spike.tr)
    }

    /// Phase 1: integrate membrane potential from the neuron's conductances
    pub fn spike_vm_from_g(&self, nrn: &mut Neuron, sn: &SpikingNeuronState) -> VoltageUpdate {
        let mut new_vm = nrn.vm;
        if !self.in_refractory(sn) {
            let ge = nrn.ge * self.act.gbar.e;
            let gi = nrn.gi * self.act.gbar.i;
            let gk = self.act.gbar.k * sn.total_kna();
            nrn.gk = gk;

            let vm_dt = self.act.dt.vm_dt;
            // midpoint method: take a half-step in vm_eff
            let inet1 = self.act.inet_from_g(nrn.vm, ge, gi, gk);
            let vm_eff = nrn.vm + 0.5 * vm_dt * inet1;
            let mut inet2 = self.act.inet_from_g(vm_eff, ge, gi, gk);
            if self.spike.exp {
                let slope = self.spike.exp_slope;
                inet2 += self.act.gbar.l * slope * ((vm_eff - self.act.xx1.thr) / slope).exp();
            }
            new_vm += vm_dt * inet2;
            nrn.inet = inet2;
        }

        if self.act.noise.kind == NoiseKind::Vm {
            new_vm += nrn.noise;
        }
        nrn.vm = self.act.vm_range.clip(new_vm);

        VoltageUpdate {
            vm: nrn.vm,
            inet: nrn.inet,
            gk: nrn.gk,
        }
    }

    /// Phase 2: spike detection, ISI estimate, rate code and KNa update
    pub fn spike_act_from_vm(&self, nrn: &mut Neuron, sn: &mut SpikingNeuronState) -> SpikeOutcome {
        self.spike_act_from_vm_with(nrn, sn, &self.kna)
    }

    /// Phase 2 with a caller-supplied adaptation channel
    pub fn spike_act_from_vm_with<A>(
        &self,
        nrn: &mut Neuron,
        sn: &mut SpikingNeuronState,
        adapt: &A,
    ) -> SpikeOutcome
    where
        A: AdaptationChannel + ?Sized,
    {
        if nrn.vm > self.threshold() {
            sn.spike = 1.0;
            nrn.vm = self.spike.vm_r;
            nrn.inet = 0.0;
            match (sn.avg_isi, sn.isi) {
                (IsiEstimate::Unstarted, _) => sn.avg_isi = IsiEstimate::OneSpikeSeen,
                // must have measured a real interval to update
                (_, Some(isi)) if isi > 0 => {
                    self.spike.avg_from_isi(&mut sn.avg_isi, isi as f32 + 1.0)
                }
                _ => {}
            }
            sn.isi = Some(0);
            trace!(avg_isi = sn.avg_isi.sentinel(), "spike");
        } else {
            sn.spike = 0.0;
            if let Some(isi) = sn.isi.as_mut() {
                *isi = isi.saturating_add(1);
            }
            if let (IsiEstimate::Measured(avg), Some(isi)) = (sn.avg_isi, sn.isi) {
                let isi = isi as f32;
                if isi > 0.0 && isi > self.spike.early_update_factor * avg {
                    self.spike.avg_from_isi(&mut sn.avg_isi, isi);
                }
            }
        }

        let estimate = match sn.avg_isi.measured() {
            Some(avg) => self
                .spike
                .act_from_isi(avg, self.act.dt.time_inc, self.act.dt.integ),
            None => 0.0,
        };
        let new_act = nrn.act + self.act.dt.vm_dt * (estimate - nrn.act);
        nrn.act_delta = new_act - nrn.act;
        nrn.act = new_act;

        if adapt.is_enabled() {
            adapt.gc_from_spike(
                &mut sn.gkna_fast,
                &mut sn.gkna_med,
                &mut sn.gkna_slow,
                sn.spike > 0.5,
            );
        }

        SpikeOutcome {
            spiked: sn.spike > 0.5,
            vm: nrn.vm,
            act: nrn.act,
            act_delta: nrn.act_delta,
        }
    }
}

impl ModelParameters for SpikeActParams {
    fn update(&mut self) {
        self.act.update();
        self.spike.update();
        self.kna.update();
    }

    fn validate(&self) -> Result<()> {
        self.act.validate()?;
        self.spike.validate()?;
        self.kna.validate()
    }
}

impl ActivationModel for SpikeActParams {
    fn model_name(&self) -> &'static str {
        if self.spike.exp {
            "Spiking (adaptive exponential)"
        } else {
            "Spiking"
        }
    }

    fn init_acts(&self, nrn: &mut Neuron, state: &mut SpikingNeuronState) {
        self.act.init_acts(nrn);
        state.init_act();
    }

    #[inline]
    fn vm_from_g(&self, nrn: &mut Neuron, state: &mut SpikingNeuronState) {
        self.spike_vm_from_g(nrn, state);
    }

    #[inline]
    fn act_from_vm(&self, nrn: &mut Neuron, state: &mut SpikingNeuronState) {
        self.spike_act_from_vm(nrn, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NeuralError;
    use std::cell::Cell;

    fn fresh(sk: &SpikeActParams, ge: f32, gi: f32) -> (Neuron, SpikingNeuronState) {
        let mut nrn = Neuron::with_conductances(ge, gi);
        let mut sn = SpikingNeuronState::new();
        sk.init_acts(&mut nrn, &mut sn);
        (nrn, sn)
    }

    #[test]
    fn test_refractory_holds_vm() {
        let sk = SpikeActParams::new();
        let mut nrn = Neuron::with_conductances(1.0, 0.0);
        nrn.vm = sk.spike.vm_r;
        let mut sn = SpikingNeuronState {
            isi: Some(0),
            ..SpikingNeuronState::default()
        };

        // isi 0, 1, 2 are inside the 3-cycle window
        for expected_isi in 0..3u32 {
            assert_eq!(sn.isi, Some(expected_isi));
            let out = sk.spike_vm_from_g(&mut nrn, &sn);
            assert_eq!(out.vm, sk.spike.vm_r, "vm moved at isi {}", expected_isi);
            sk.spike_act_from_vm(&mut nrn, &mut sn);
        }

        // isi 3: integration resumes
        assert_eq!(sn.isi, Some(3));
        let out = sk.spike_vm_from_g(&mut nrn, &sn);
        assert!(out.vm > sk.spike.vm_r);
    }

    #[test]
    fn test_no_refractory_when_period_is_zero() {
        let mut sk = SpikeActParams::new();
        sk.spike.tr = 0;
        let mut nrn = Neuron::with_conductances(1.0, 0.0);
        nrn.vm = 0.3;
        let sn = SpikingNeuronState {
            isi: Some(0),
            ..SpikingNeuronState::default()
        };
        let out = sk.spike_vm_from_g(&mut nrn, &sn);
        assert!(out.vm > 0.3);
    }

    #[test]
    fn test_midpoint_step_matches_hand_computation() {
        let sk = SpikeActParams::new();
        let (mut nrn, sn) = fresh(&sk, 0.5, 0.2);

        let vm0 = nrn.vm;
        let ac = &sk.act;
        let inet1 = ac.inet_from_g(vm0, 0.5, 0.2, 0.0);
        let vm_eff = vm0 + 0.5 * ac.dt.vm_dt * inet1;
        let inet2 = ac.inet_from_g(vm_eff, 0.5, 0.2, 0.0);

        let out = sk.spike_vm_from_g(&mut nrn, &sn);
        assert!((out.inet - inet2).abs() < 1e-7);
        assert!((out.vm - (vm0 + ac.dt.vm_dt * inet2)).abs() < 1e-7);
        assert_eq!(out.gk, 0.0);
    }

    #[test]
    fn test_adaptation_conductance_is_scaled_sum() {
        let mut sk = SpikeActParams::new();
        sk.act.gbar.k = 2.0;
        let (mut nrn, mut sn) = fresh(&sk, 0.5, 0.0);
        sn.gkna_fast = 0.01;
        sn.gkna_med = 0.02;
        sn.gkna_slow = 0.03;

        let out = sk.spike_vm_from_g(&mut nrn, &sn);
        assert!((out.gk - 0.12).abs() < 1e-6);
        assert_eq!(nrn.gk, out.gk);
    }

    #[test]
    fn test_exponential_current_adds_drive() {
        let mut plain = SpikeActParams::new();
        plain.act.vm_range.max = 10.0;
        let mut exp = plain;
        exp.spike.exp = true;

        let (mut a, sa) = fresh(&plain, 0.3, 0.0);
        let (mut b, sb) = fresh(&exp, 0.3, 0.0);
        a.vm = 0.55;
        b.vm = 0.55;

        let va = plain.spike_vm_from_g(&mut a, &sa);
        let vb = exp.spike_vm_from_g(&mut b, &sb);
        assert!(vb.inet > va.inet);
        assert!(vb.vm > va.vm);
        assert_eq!(exp.threshold(), 1.2);
        assert_eq!(plain.threshold(), 0.5);
    }

    #[test]
    fn test_vm_noise_and_clip() {
        let mut sk = SpikeActParams::new();
        sk.act.noise.kind = NoiseKind::Vm;
        let (mut nrn, sn) = fresh(&sk, 0.0, 0.0);
        nrn.noise = 5.0;
        let out = sk.spike_vm_from_g(&mut nrn, &sn);
        assert_eq!(out.vm, sk.act.vm_range.max);

        nrn.noise = -5.0;
        let out = sk.spike_vm_from_g(&mut nrn, &sn);
        assert_eq!(out.vm, sk.act.vm_range.min);
    }

    #[test]
    fn test_noise_ignored_unless_vm_kind() {
        let mut sk = SpikeActParams::new();
        sk.act.noise.kind = NoiseKind::Ge;
        let (mut a, sn) = fresh(&sk, 0.2, 0.0);
        let mut b = a;
        b.noise = 0.3;
        assert_eq!(
            sk.spike_vm_from_g(&mut a, &sn),
            sk.spike_vm_from_g(&mut b, &sn)
        );
    }

    #[test]
    fn test_spike_resets_vm_and_inet() {
        let sk = SpikeActParams::new();
        let (mut nrn, mut sn) = fresh(&sk, 0.0, 0.0);
        nrn.vm = 0.8;
        nrn.inet = 0.4;

        let out = sk.spike_act_from_vm(&mut nrn, &mut sn);
        assert!(out.spiked);
        assert_eq!(out.vm, sk.spike.vm_r);
        assert_eq!(nrn.vm, sk.spike.vm_r);
        assert_eq!(nrn.inet, 0.0);
        assert_eq!(sn.spike, 1.0);
        assert_eq!(sn.isi, Some(0));
        // First spike ever: not an interval yet
        assert_eq!(sn.avg_isi, IsiEstimate::OneSpikeSeen);
        assert_eq!(sn.avg_isi.sentinel(), -2.0);
        assert_eq!(out.act, 0.0);
    }

    #[test]
    fn test_exact_threshold_does_not_spike() {
        let sk = SpikeActParams::new();
        let (mut nrn, mut sn) = fresh(&sk, 0.0, 0.0);
        nrn.vm = sk.threshold();
        let out = sk.spike_act_from_vm(&mut nrn, &mut sn);
        assert!(!out.spiked);
        assert_eq!(sn.isi, None);
    }

    #[test]
    fn test_second_spike_measures_interval() {
        let sk = SpikeActParams::new();
        let (mut nrn, mut sn) = fresh(&sk, 0.0, 0.0);

        nrn.vm = 1.0;
        sk.spike_act_from_vm(&mut nrn, &mut sn);
        for _ in 0..6 {
            nrn.vm = 0.2;
            sk.spike_act_from_vm(&mut nrn, &mut sn);
        }
        assert_eq!(sn.isi, Some(6));
        nrn.vm = 1.0;
        sk.spike_act_from_vm(&mut nrn, &mut sn);

        // 6 silent cycles between spikes → spikes 7 cycles apart
        assert_eq!(sn.avg_isi, IsiEstimate::Measured(7.0));
        assert_eq!(sn.isi, Some(0));
    }

    #[test]
    fn test_early_update_when_overdue() {
        let sk = SpikeActParams::new();
        let (mut nrn, mut sn) = fresh(&sk, 0.0, 0.0);
        sn.avg_isi = IsiEstimate::Measured(10.0);
        sn.isi = Some(11);
        nrn.vm = 0.3;

        // isi becomes 12, not > 1.2 × 10
        sk.spike_act_from_vm(&mut nrn, &mut sn);
        assert_eq!(sn.avg_isi, IsiEstimate::Measured(10.0));

        // isi becomes 13 > 12: average pushed toward 13 without a spike
        sk.spike_act_from_vm(&mut nrn, &mut sn);
        let avg = sn.avg_isi.measured().unwrap();
        assert!((avg - (10.0 + 0.2 * 3.0)).abs() < 1e-5);
    }

    #[test]
    fn test_activation_filter_and_delta() {
        let sk = SpikeActParams::new();
        let (mut nrn, mut sn) = fresh(&sk, 0.0, 0.0);
        sn.avg_isi = IsiEstimate::Measured(11.0);
        sn.isi = Some(1);
        nrn.vm = 0.3;
        nrn.act = 0.1;

        let estimate = sk.spike.act_from_isi(11.0, 0.001, 1.0);
        let expected = 0.1 + sk.act.dt.vm_dt * (estimate - 0.1);
        let out = sk.spike_act_from_vm(&mut nrn, &mut sn);
        assert!((out.act - expected).abs() < 1e-6);
        assert!((out.act_delta - (expected - 0.1)).abs() < 1e-6);
        assert_eq!(nrn.act_delta, out.act_delta);
    }

    #[test]
    fn test_kna_hook_runs_only_when_enabled() {
        let mut sk = SpikeActParams::new();
        let (mut nrn, mut sn) = fresh(&sk, 0.0, 0.0);
        nrn.vm = 1.0;
        sk.spike_act_from_vm(&mut nrn, &mut sn);
        assert_eq!(sn.total_kna(), 0.0);

        sk.kna.on = true;
        nrn.vm = 1.0;
        sn.isi = Some(5);
        sk.spike_act_from_vm(&mut nrn, &mut sn);
        assert!(sn.gkna_fast > 0.0 && sn.gkna_med > 0.0 && sn.gkna_slow > 0.0);
    }

    struct CountingChannel {
        calls: Cell<u32>,
        spikes: Cell<u32>,
    }

    impl AdaptationChannel for CountingChannel {
        fn is_enabled(&self) -> bool {
            true
        }

        fn gc_from_spike(&self, fast: &mut f32, _med: &mut f32, _slow: &mut f32, spike: bool) {
            self.calls.set(self.calls.get() + 1);
            if spike {
                self.spikes.set(self.spikes.get() + 1);
                *fast += 1.0;
            }
        }
    }

    #[test]
    fn test_custom_channel_called_once_per_cycle() {
        let sk = SpikeActParams::new();
        let (mut nrn, mut sn) = fresh(&sk, 0.0, 0.0);
        let channel = CountingChannel {
            calls: Cell::new(0),
            spikes: Cell::new(0),
        };

        for cycle in 0..10 {
            nrn.vm = if cycle % 5 == 0 { 1.0 } else { 0.3 };
            sk.spike_act_from_vm_with(&mut nrn, &mut sn, &channel);
        }
        assert_eq!(channel.calls.get(), 10);
        assert_eq!(channel.spikes.get(), 2);
        assert_eq!(sn.gkna_fast, 2.0);
    }

    #[test]
    fn test_new_validated_rejects_zero_slope() {
        let mut spike = SpikeParams::default();
        spike.exp = true;
        spike.exp_slope = 0.0;
        let res = SpikeActParams::new_validated(ActParams::default(), spike, KnaAdaptParams::default());
        assert!(res.is_err());
    }

    #[test]
    fn test_new_validated_rejects_overshooting_filter() {
        let mut act = ActParams::default();
        act.dt.vm_tau = 0.4;
        let res = SpikeActParams::new_validated(act, SpikeParams::default(), KnaAdaptParams::default());
        assert!(matches!(
            res,
            Err(NeuralError::InvalidParameter { field: "act.dt.vm_tau", .. })
        ));
    }

    #[test]
    fn test_fastest_filter_keeps_act_in_range() {
        let mut act = ActParams::default();
        act.dt.vm_tau = act.dt.integ;
        let sk = SpikeActParams::new_validated(act, SpikeParams::default(), KnaAdaptParams::default())
            .unwrap();
        let (mut nrn, mut sn) = fresh(&sk, 0.0, 0.0);
        sn.avg_isi = IsiEstimate::Measured(6.0);
        sn.isi = Some(1);
        nrn.vm = 0.3;

        let out = sk.spike_act_from_vm(&mut nrn, &mut sn);
        let estimate = sk.spike.act_from_isi(6.0, 0.001, 1.0);
        assert!((out.act - estimate).abs() < 1e-6);
        assert!((0.0..=1.0).contains(&out.act));
    }

    #[test]
    fn test_new_validated_finalizes_rate_dt() {
        let mut spike = SpikeParams::default();
        spike.rate_tau = 4.0;
        let sk = SpikeActParams::new_validated(ActParams::default(), spike, KnaAdaptParams::default())
            .unwrap();
        assert_eq!(sk.spike.rate_dt, 0.25);
    }
}
