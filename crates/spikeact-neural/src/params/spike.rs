// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Spike Parameters
//!
//! Spiking-specific constants: the AdEx exponential current (Brette & Gerstner
//! 2005), reset and refractory behavior, and the conversion between measured
//! inter-spike interval and rate-code activation.
//!
//! ## ISI running average
//!
//! ```text
//! avg unset (or <= 0)        avg = isi
//! isi < snap_factor · avg    avg = isi                      (speed-up tracked at once)
//! otherwise                  avg += rate_dt · (isi − avg)   (slow-down smoothed)
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::{IsiEstimate, NeuralError, Result};

/// Elapsed-time multiple of the average ISI at which a silent neuron is
/// treated as overdue and the average is pushed up without a spike
pub const DEFAULT_EARLY_UPDATE_FACTOR: f32 = 1.2;

/// A new ISI shorter than this fraction of the average replaces it outright
pub const DEFAULT_SNAP_FACTOR: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpikeParams {
    /// Enable the exponential excitatory current that drives Vm up past threshold
    pub exp: bool,
    /// Slope in Vm of the exponential current (2 mV = 0.02 normalized); must be non-zero when `exp`
    pub exp_slope: f32,
    /// Vm that triggers a spike when `exp` is on
    pub exp_thr: f32,
    /// Post-spike reset potential
    pub vm_r: f32,
    /// Refractory period in cycles during which Vm is not integrated
    pub tr: u32,
    /// Firing rate (Hz) that maps to activation 1.0
    pub max_hz: f32,
    /// Time constant (cycles) for integrating the ISI running average
    pub rate_tau: f32,
    /// See [`DEFAULT_EARLY_UPDATE_FACTOR`]
    pub early_update_factor: f32,
    /// See [`DEFAULT_SNAP_FACTOR`]
    pub snap_factor: f32,
    /// 1 / rate_tau (derived)
    #[serde(skip)]
    pub rate_dt: f32,
}

impl Default for SpikeParams {
    fn default() -> Self {
        let mut sp = Self {
            exp: false,
            exp_slope: 0.0,
            exp_thr: 0.0,
            vm_r: 0.0,
            tr: 0,
            max_hz: 0.0,
            rate_tau: 1.0,
            early_update_factor: DEFAULT_EARLY_UPDATE_FACTOR,
            snap_factor: DEFAULT_SNAP_FACTOR,
            rate_dt: 1.0,
        };
        sp.set_defaults();
        sp
    }
}

impl SpikeParams {
    /// Restore default values, including derived fields
    pub fn set_defaults(&mut self) {
        self.exp = false;
        self.exp_slope = 0.02;
        self.exp_thr = 1.2;
        self.vm_r = 0.3;
        self.tr = 3;
        self.max_hz = 180.0;
        self.rate_tau = 5.0;
        self.early_update_factor = DEFAULT_EARLY_UPDATE_FACTOR;
        self.snap_factor = DEFAULT_SNAP_FACTOR;
        self.update();
    }

    /// Recompute derived fields. Required after any edit to `rate_tau`.
    pub fn update(&mut self) {
        self.rate_dt = 1.0 / self.rate_tau;
        debug!(
            rate_tau = self.rate_tau,
            rate_dt = self.rate_dt,
            "spike params updated"
        );
    }

    /// True when `rate_dt` no longer matches `rate_tau` (missed `update()`)
    pub fn is_stale(&self) -> bool {
        (self.rate_dt - 1.0 / self.rate_tau).abs() > f32::EPSILON * 4.0
    }

    pub fn validate(&self) -> Result<()> {
        if self.exp && self.exp_slope == 0.0 {
            return Err(NeuralError::invalid(
                "spike.exp_slope",
                "must be non-zero when the exponential mechanism is on",
            ));
        }
        if !(self.rate_tau > 0.0) || !self.rate_tau.is_finite() {
            return Err(NeuralError::invalid(
                "spike.rate_tau",
                format!("must be > 0, got {}", self.rate_tau),
            ));
        }
        if !(self.max_hz >= 0.0) {
            return Err(NeuralError::invalid(
                "spike.max_hz",
                format!("must be >= 0, got {}", self.max_hz),
            ));
        }
        if !(self.early_update_factor > 0.0) {
            return Err(NeuralError::invalid(
                "spike.early_update_factor",
                format!("must be > 0, got {}", self.early_update_factor),
            ));
        }
        if !(self.snap_factor > 0.0) {
            return Err(NeuralError::invalid(
                "spike.snap_factor",
                format!("must be > 0, got {}", self.snap_factor),
            ));
        }
        if self.is_stale() {
            warn!(
                rate_tau = self.rate_tau,
                rate_dt = self.rate_dt,
                "spike params validated with stale rate_dt; call update() after edits"
            );
        }
        Ok(())
    }

    /// Rate-code activation equivalent of a spiking interval, in [0, 1]
    ///
    /// `time_inc` is seconds per cycle and `integ` the integration rate
    /// multiplier. Non-positive intervals (no estimate yet) give 0.
    pub fn act_from_isi(&self, isi: f32, time_inc: f32, integ: f32) -> f32 {
        if isi <= 0.0 || self.max_hz <= 0.0 {
            return 0.0;
        }
        // interval at max hz
        let max_int = 1.0 / (time_inc * integ * self.max_hz);
        (max_int / isi).min(1.0)
    }

    /// Spiking interval equivalent of a rate-code activation (clamped layers)
    pub fn act_to_isi(&self, act: f32, time_inc: f32, integ: f32) -> f32 {
        if act == 0.0 || self.max_hz <= 0.0 {
            return 0.0;
        }
        1.0 / (time_inc * integ * act * self.max_hz)
    }

    /// Fold a newly observed interval into the running average
    pub fn avg_from_isi(&self, avg: &mut IsiEstimate, isi: f32) {
        *avg = match *avg {
            IsiEstimate::Measured(cur) if cur > 0.0 => {
                if isi < self.snap_factor * cur {
                    IsiEstimate::Measured(isi)
                } else {
                    IsiEstimate::Measured(cur + self.rate_dt * (isi - cur))
                }
            }
            _ => IsiEstimate::Measured(isi),
        };
    }
}
