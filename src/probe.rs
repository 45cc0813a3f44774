// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Single-neuron probe: drive one neuron with constant conductances and
//! summarize its spike train.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::neural::{ActivationModel, Neuron, NeuronKind, NoiseKind, SpikingNeuronState};

/// Constant drive for a probe run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeSettings {
    pub cycles: u32,
    pub ge: f32,
    pub gi: f32,
    /// Seed for the Vm noise generator (only used when `act.noise` targets Vm)
    pub seed: u64,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            cycles: 200,
            ge: 1.0,
            gi: 0.0,
            seed: 0,
        }
    }
}

/// Gaussian Vm noise source built from `act.noise`, if the kind asks for one
fn vm_noise(kind: &NeuronKind) -> Option<Normal<f32>> {
    let noise = &kind.act_params().noise;
    if noise.kind != NoiseKind::Vm || noise.var <= 0.0 {
        return None;
    }
    match Normal::new(0.0, noise.std_dev()) {
        Ok(dist) => Some(dist),
        Err(e) => {
            warn!(var = noise.var, error = %e, "unusable noise variance, running noise-free");
            None
        }
    }
}

/// Result of a probe run, serialized as the tool's JSON output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeSummary {
    pub model: String,
    pub settings: ProbeSettings,
    /// 1-based cycles on which the neuron spiked
    pub spike_cycles: Vec<u32>,
    pub final_act: f32,
    pub final_vm: f32,
    /// Running interval estimate at the end, in cycles
    pub avg_isi: Option<f32>,
    /// Spike count over simulated time
    pub rate_hz: f32,
    /// Total KNa conductance at the end
    pub gkna: f32,
}

/// Run `settings.cycles` cycles of `kind` from a fresh state
pub fn run_probe(kind: &NeuronKind, settings: ProbeSettings) -> ProbeSummary {
    let time_inc = kind.act_params().dt.time_inc;
    let noise = vm_noise(kind);
    let mut rng = StdRng::seed_from_u64(settings.seed);

    let mut nrn = Neuron::default();
    let mut state = SpikingNeuronState::new();
    kind.init_acts(&mut nrn, &mut state);
    nrn.ge = settings.ge;
    nrn.gi = settings.gi;

    let mut spike_cycles = Vec::new();
    for cycle in 1..=settings.cycles {
        if let Some(dist) = &noise {
            nrn.noise = dist.sample(&mut rng);
        }
        kind.cycle(&mut nrn, &mut state);
        if state.has_spiked() {
            debug!(cycle, vm = nrn.vm, act = nrn.act, "spike");
            spike_cycles.push(cycle);
        }
    }

    let seconds = settings.cycles as f32 * time_inc;
    let rate_hz = if seconds > 0.0 {
        spike_cycles.len() as f32 / seconds
    } else {
        0.0
    };

    let summary = ProbeSummary {
        model: kind.model_name().to_string(),
        settings,
        spike_cycles,
        final_act: nrn.act,
        final_vm: nrn.vm,
        avg_isi: state.avg_isi.measured(),
        rate_hz,
        gkna: state.total_kna(),
    };
    info!(
        model = %summary.model,
        spikes = summary.spike_cycles.len(),
        rate_hz = summary.rate_hz,
        final_act = summary.final_act,
        "probe finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neural::{ModelParameters, RateCodedParams, SpikeActParams};

    fn noisy(var: f32) -> NeuronKind {
        let mut sk = SpikeActParams::new();
        sk.act.noise.kind = NoiseKind::Vm;
        sk.act.noise.var = var;
        sk.update();
        NeuronKind::Spiking(sk)
    }

    #[test]
    fn test_probe_default_drive_spikes_regularly() {
        let kind = NeuronKind::Spiking(SpikeActParams::new());
        let summary = run_probe(&kind, ProbeSettings::default());

        assert!(summary.spike_cycles.len() > 5);
        assert_eq!(summary.spike_cycles[0], 1);
        assert!(summary.avg_isi.is_some());
        assert!(summary.final_act > 0.0 && summary.final_act <= 1.0);
        assert!(summary.rate_hz > 0.0);
    }

    #[test]
    fn test_probe_without_drive_is_silent() {
        let kind = NeuronKind::Spiking(SpikeActParams::new());
        let summary = run_probe(
            &kind,
            ProbeSettings {
                cycles: 100,
                ge: 0.0,
                gi: 0.0,
                seed: 0,
            },
        );
        assert!(summary.spike_cycles.is_empty());
        assert_eq!(summary.avg_isi, None);
        assert_eq!(summary.rate_hz, 0.0);
        assert_eq!(summary.final_act, 0.0);
    }

    #[test]
    fn test_probe_rate_coded_never_spikes() {
        let kind = NeuronKind::RateCoded(RateCodedParams::new());
        let summary = run_probe(&kind, ProbeSettings::default());
        assert!(summary.spike_cycles.is_empty());
        assert!(summary.final_act > 0.5);
    }

    #[test]
    fn test_summary_serializes() {
        let kind = NeuronKind::Spiking(SpikeActParams::new());
        let summary = run_probe(
            &kind,
            ProbeSettings {
                cycles: 10,
                ..ProbeSettings::default()
            },
        );
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["model"], "Spiking");
        assert_eq!(json["settings"]["cycles"], 10);
        assert_eq!(json["spike_cycles"][0], 1);
    }

    #[test]
    fn test_vm_noise_drives_subthreshold_neuron() {
        let quiet = ProbeSettings {
            cycles: 500,
            ge: 0.0,
            gi: 0.0,
            seed: 7,
        };
        // Resting at 0.3 with no drive never reaches threshold without noise
        assert!(run_probe(&noisy(0.0), quiet).spike_cycles.is_empty());

        let summary = run_probe(&noisy(0.04), quiet);
        assert!(!summary.spike_cycles.is_empty());
    }

    #[test]
    fn test_seed_makes_noisy_runs_repeatable() {
        let kind = noisy(0.01);
        let settings = ProbeSettings {
            seed: 42,
            ..ProbeSettings::default()
        };
        assert_eq!(run_probe(&kind, settings), run_probe(&kind, settings));
    }

    #[test]
    fn test_noise_kind_other_than_vm_is_not_sampled() {
        let mut sk = SpikeActParams::new();
        sk.act.noise.kind = NoiseKind::Ge;
        sk.act.noise.var = 0.5;
        let noisy_ge = run_probe(&NeuronKind::Spiking(sk), ProbeSettings::default());
        let plain = run_probe(&NeuronKind::Spiking(SpikeActParams::new()), ProbeSettings::default());
        assert_eq!(noisy_ge.spike_cycles, plain.spike_cycles);
        assert_eq!(noisy_ge.final_vm, plain.final_vm);
    }
}
