// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Noisy XX1 rate-code function
//!
//! `x / (x + 1)` of the above-threshold excitatory drive, convolved with
//! Gaussian membrane noise. The convolution is approximated piecewise:
//!
//! ```text
//! x < 0                 sigmoid tail:   sig_mult_eff / (1 + exp(-x · sig_gain / nvar))
//! 0 <= x < interp_range linear bridge:  sig_val_at0 + frac · interp_val
//! x >= interp_range     gain-corrected: XX1(gain' · x)
//! ```
//!
//! Also owns `thr`, the firing threshold used by the spiking model when the
//! exponential mechanism is off.

use serde::{Deserialize, Serialize};

use crate::types::{NeuralError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Xx1Params {
    /// Threshold value (normalized Vm)
    pub thr: f32,
    /// Gain (1/gain is the half-saturation point)
    pub gain: f32,
    /// Variance of the Gaussian noise kernel
    pub nvar: f32,
    /// Activity level below which Vm, not Ge, drives the rate code
    pub vm_act_thr: f32,
    pub sig_mult: f32,
    pub sig_mult_pow: f32,
    pub sig_gain: f32,
    pub interp_range: f32,
    pub gain_cor_range: f32,
    pub gain_cor: f32,

    #[serde(skip)]
    pub sig_gain_nvar: f32,
    #[serde(skip)]
    pub sig_mult_eff: f32,
    #[serde(skip)]
    pub sig_val_at0: f32,
    #[serde(skip)]
    pub interp_val: f32,
}

impl Default for Xx1Params {
    fn default() -> Self {
        let mut xp = Self {
            thr: 0.5,
            gain: 100.0,
            nvar: 0.005,
            vm_act_thr: 0.01,
            sig_mult: 0.33,
            sig_mult_pow: 0.8,
            sig_gain: 3.0,
            interp_range: 0.01,
            gain_cor_range: 10.0,
            gain_cor: 0.1,
            sig_gain_nvar: 0.0,
            sig_mult_eff: 0.0,
            sig_val_at0: 0.0,
            interp_val: 0.0,
        };
        xp.update();
        xp
    }
}

impl Xx1Params {
    pub fn update(&mut self) {
        self.sig_gain_nvar = self.sig_gain / self.nvar;
        self.sig_mult_eff = self.sig_mult * (self.gain * self.nvar).powf(self.sig_mult_pow);
        self.sig_val_at0 = 0.5 * self.sig_mult_eff;
        self.interp_val = self.xx1_gain_cor(self.interp_range) - self.sig_val_at0;
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.nvar > 0.0) {
            return Err(NeuralError::invalid(
                "act.xx1.nvar",
                format!("must be > 0, got {}", self.nvar),
            ));
        }
        if !(self.gain >= 0.0) {
            return Err(NeuralError::invalid(
                "act.xx1.gain",
                format!("must be >= 0, got {}", self.gain),
            ));
        }
        if !(self.interp_range > 0.0) || !(self.gain_cor_range > 0.0) {
            return Err(NeuralError::invalid(
                "act.xx1.interp_range",
                "interp_range and gain_cor_range must be > 0",
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn xx1(&self, x: f32) -> f32 {
        x / (x + 1.0)
    }

    /// XX1 with gain reduced near threshold, where noise flattens the curve
    pub fn xx1_gain_cor(&self, x: f32) -> f32 {
        let gain_cor_fact = (self.gain_cor_range - (x / self.nvar)) / self.gain_cor_range;
        if gain_cor_fact < 0.0 {
            return self.xx1(self.gain * x);
        }
        let new_gain = self.gain * (1.0 - self.gain_cor * gain_cor_fact);
        self.xx1(new_gain * x)
    }

    /// Noise-convolved XX1 of the above-threshold drive `x`
    pub fn noisy_xx1(&self, x: f32) -> f32 {
        if x < 0.0 {
            self.sig_mult_eff / (1.0 + (-(x * self.sig_gain_nvar)).exp())
        } else if x < self.interp_range {
            let interp = 1.0 - ((self.interp_range - x) / self.interp_range);
            self.sig_val_at0 + interp * self.interp_val
        } else {
            self.xx1_gain_cor(x)
        }
    }
}
