// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # KNa Adaptation
//!
//! Sodium-gated potassium channels produce spike-frequency adaptation
//! (accommodation). Three channels with different time constants each
//! accumulate a conductance:
//!
//! ```text
//! spike:     g += rise · (max − g)
//! no spike:  g −= g / tau
//! ```
//!
//! The integrator feeds `gbar_k · (fast + med + slow)` back as an inhibitory
//! potassium conductance.

use serde::{Deserialize, Serialize};

use crate::types::{NeuralError, Result};

/// Spike-driven adaptation process updated once per cycle
///
/// Implementations must be monotonically consistent: more past spiking never
/// yields a smaller aggregate conductance.
pub trait AdaptationChannel {
    /// Whether the detector should invoke the channel at all
    fn is_enabled(&self) -> bool;

    /// Update the three conductances given whether the neuron spiked this cycle
    fn gc_from_spike(&self, fast: &mut f32, med: &mut f32, slow: &mut f32, spike: bool);
}

/// One KNa channel (one timescale)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct KnaChannel {
    pub on: bool,
    /// Fraction of the remaining headroom added per spike
    pub rise: f32,
    /// Maximum conductance
    pub max: f32,
    /// Decay time constant in cycles
    pub tau: f32,
    /// 1 / tau (derived)
    #[serde(skip)]
    pub dt: f32,
}

impl Default for KnaChannel {
    fn default() -> Self {
        Self::with_values(100.0, 0.01, 0.1)
    }
}

impl KnaChannel {
    pub fn with_values(tau: f32, rise: f32, max: f32) -> Self {
        let mut ch = Self {
            on: true,
            rise,
            max,
            tau,
            dt: 0.0,
        };
        ch.update();
        ch
    }

    pub fn update(&mut self) {
        self.dt = 1.0 / self.tau;
    }

    fn validate(&self, field: &'static str) -> Result<()> {
        if !self.on {
            return Ok(());
        }
        // decay of g / tau per cycle must not overshoot below zero
        if !(self.tau >= 1.0) {
            return Err(NeuralError::invalid(field, format!("tau must be >= 1 cycle, got {}", self.tau)));
        }
        if !(0.0..=1.0).contains(&self.rise) {
            return Err(NeuralError::invalid(field, format!("rise must be in [0, 1], got {}", self.rise)));
        }
        if !(self.max >= 0.0) {
            return Err(NeuralError::invalid(field, format!("max must be >= 0, got {}", self.max)));
        }
        Ok(())
    }

    #[inline]
    pub fn gc_from_spike(&self, g: &mut f32, spike: bool) {
        if !self.on {
            *g = 0.0;
        } else if spike {
            *g += self.rise * (self.max - *g);
        } else {
            *g -= self.dt * *g;
        }
    }

    /// Rate-coded counterpart: `act` stands in for the spike probability
    #[inline]
    pub fn gc_from_rate(&self, g: &mut f32, act: f32) {
        if self.on {
            *g += act * self.rise * (self.max - *g) - self.dt * *g;
        } else {
            *g = 0.0;
        }
    }
}

/// Fast, medium and slow KNa channels
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct KnaAdaptParams {
    /// Master switch; when off the detector never calls the channels
    pub on: bool,
    /// Rise multiplier applied to activation in the rate-coded update
    pub rate: f32,
    pub fast: KnaChannel,
    pub med: KnaChannel,
    pub slow: KnaChannel,
}

impl Default for KnaAdaptParams {
    fn default() -> Self {
        Self {
            on: false,
            rate: 0.8,
            fast: KnaChannel::with_values(50.0, 0.05, 0.1),
            med: KnaChannel::with_values(200.0, 0.02, 0.1),
            slow: KnaChannel::with_values(1000.0, 0.001, 0.1),
        }
    }
}

impl KnaAdaptParams {
    pub fn update(&mut self) {
        self.fast.update();
        self.med.update();
        self.slow.update();
    }

    pub fn validate(&self) -> Result<()> {
        if !self.on {
            return Ok(());
        }
        if !(self.rate >= 0.0) {
            return Err(NeuralError::invalid(
                "kna.rate",
                format!("must be >= 0, got {}", self.rate),
            ));
        }
        self.fast.validate("kna.fast")?;
        self.med.validate("kna.med")?;
        self.slow.validate("kna.slow")
    }

    /// Rate-coded update of all three conductances from activation
    pub fn gc_from_rate(&self, fast: &mut f32, med: &mut f32, slow: &mut f32, act: f32) {
        let act = act * self.rate;
        self.fast.gc_from_rate(fast, act);
        self.med.gc_from_rate(med, act);
        self.slow.gc_from_rate(slow, act);
    }
}

impl AdaptationChannel for KnaAdaptParams {
    fn is_enabled(&self) -> bool {
        self.on
    }

    fn gc_from_spike(&self, fast: &mut f32, med: &mut f32, slow: &mut f32, spike: bool) {
        self.fast.gc_from_spike(fast, spike);
        self.med.gc_from_spike(med, spike);
        self.slow.gc_from_spike(slow, spike);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> KnaAdaptParams {
        KnaAdaptParams {
            on: true,
            ..KnaAdaptParams::default()
        }
    }

    #[test]
    fn test_spike_raises_all_timescales() {
        let ka = enabled();
        let (mut f, mut m, mut s) = (0.0, 0.0, 0.0);
        ka.gc_from_spike(&mut f, &mut m, &mut s, true);
        assert!((f - 0.005).abs() < 1e-7);
        assert!((m - 0.002).abs() < 1e-7);
        assert!((s - 0.0001).abs() < 1e-8);
    }

    #[test]
    fn test_decay_is_fastest_for_fast_channel() {
        let ka = enabled();
        let (mut f, mut m, mut s) = (0.05, 0.05, 0.05);
        ka.gc_from_spike(&mut f, &mut m, &mut s, false);
        assert!(f < m && m < s);
        assert!(s < 0.05);
        assert!(f >= 0.0);
    }

    #[test]
    fn test_more_spikes_more_adaptation() {
        let ka = enabled();
        let run = |spike_every: usize| {
            let (mut f, mut m, mut s) = (0.0f32, 0.0f32, 0.0f32);
            for cycle in 0..400 {
                ka.gc_from_spike(&mut f, &mut m, &mut s, cycle % spike_every == 0);
            }
            f + m + s
        };
        let sparse = run(40);
        let dense = run(10);
        assert!(dense >= sparse, "dense {} < sparse {}", dense, sparse);
        assert!(dense <= 0.3);
    }

    #[test]
    fn test_disabled_channel_zeroes() {
        let mut ka = enabled();
        ka.med.on = false;
        let (mut f, mut m, mut s) = (0.01, 0.01, 0.01);
        ka.gc_from_spike(&mut f, &mut m, &mut s, true);
        assert_eq!(m, 0.0);
        assert!(f > 0.01);
    }

    #[test]
    fn test_rate_update_saturates_below_max() {
        let ka = enabled();
        let (mut f, mut m, mut s) = (0.0f32, 0.0f32, 0.0f32);
        for _ in 0..10_000 {
            ka.gc_from_rate(&mut f, &mut m, &mut s, 1.0);
        }
        assert!(f > 0.0 && f < ka.fast.max);
        assert!(m > 0.0 && m < ka.med.max);
        assert!(s > 0.0 && s < ka.slow.max);
    }

    #[test]
    fn test_json_omits_derived_rate() {
        let ka = enabled();
        let json = serde_json::to_value(ka).unwrap();
        assert_eq!(json["fast"]["tau"], 50.0);
        assert!(json["fast"].get("dt").is_none());

        // Missing fields fall back to defaults; dt stays stale until update()
        let mut parsed: KnaAdaptParams =
            serde_json::from_str(r#"{"on": true, "fast": {"tau": 20.0}}"#).unwrap();
        assert_eq!(parsed.fast.tau, 20.0);
        assert_eq!(parsed.fast.rise, KnaChannel::default().rise);
        assert_eq!(parsed.med, KnaAdaptParams::default().med);
        parsed.update();
        assert_eq!(parsed.fast.dt, 0.05);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(KnaAdaptParams::default().validate().is_ok());

        let mut ka = enabled();
        ka.fast.tau = 0.0;
        assert!(matches!(
            ka.validate(),
            Err(NeuralError::InvalidParameter { field: "kna.fast", .. })
        ));
        // Sub-cycle time constant would decay past zero
        ka.fast.tau = 0.5;
        assert!(ka.validate().is_err());

        // Master switch off skips channel checks
        ka.on = false;
        assert!(ka.validate().is_ok());
    }
}
