// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Base Activation Parameters
//!
//! Conductance-based point neuron shared by the rate-coded and spiking models.
//!
//! ## Net current
//!
//! ```text
//! Inet = ge·(E_e − Vm) + gbar_l·(E_l − Vm) + gi·(E_i − Vm) + gk·(E_k − Vm)
//!
//!     Where:
//!     - ge, gi, gk are already scaled by their Gbar factors
//!     - E_* are reversal (driving) potentials in normalized units
//! ```

use serde::{Deserialize, Serialize};

use super::xx1::Xx1Params;
use crate::types::{NeuralError, Neuron, Result};

/// Maximal conductances for each channel
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GbarParams {
    /// Excitatory (glutamate AMPA)
    pub e: f32,
    /// Constant leak (potassium)
    pub l: f32,
    /// Inhibitory (GABA-A)
    pub i: f32,
    /// Adaptation (sodium-gated potassium)
    pub k: f32,
}

impl Default for GbarParams {
    fn default() -> Self {
        Self {
            e: 1.0,
            l: 0.1,
            i: 1.0,
            k: 1.0,
        }
    }
}

/// Reversal potentials for each channel
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ErevParams {
    pub e: f32,
    pub l: f32,
    pub i: f32,
    pub k: f32,
}

impl Default for ErevParams {
    fn default() -> Self {
        Self {
            e: 1.0,
            l: 0.3,
            i: 0.25,
            k: 0.25,
        }
    }
}

/// Integration time constants
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DtParams {
    /// Overall rate multiplier for all integration
    pub integ: f32,
    /// Membrane potential time constant, in cycles
    pub vm_tau: f32,
    /// Seconds per cycle, for converting intervals to firing rates
    pub time_inc: f32,
    /// 1 / vm_tau (derived)
    #[serde(skip)]
    pub vm_dt: f32,
}

impl Default for DtParams {
    fn default() -> Self {
        let mut dt = Self {
            integ: 1.0,
            vm_tau: 3.3,
            time_inc: 0.001,
            vm_dt: 0.0,
        };
        dt.update();
        dt
    }
}

impl DtParams {
    pub fn update(&mut self) {
        self.vm_dt = self.integ / self.vm_tau;
    }
}

/// Closed value range
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MinMax {
    pub min: f32,
    pub max: f32,
}

impl Default for MinMax {
    fn default() -> Self {
        Self { min: 0.0, max: 2.0 }
    }
}

impl MinMax {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Saturate `val` into `[min, max]` (never panics, unlike `f32::clamp`)
    #[inline(always)]
    pub fn clip(&self, val: f32) -> f32 {
        if val < self.min {
            self.min
        } else if val > self.max {
            self.max
        } else {
            val
        }
    }
}

/// Initial values applied by `init_acts`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ActInitParams {
    pub vm: f32,
    pub act: f32,
}

impl Default for ActInitParams {
    fn default() -> Self {
        Self { vm: 0.4, act: 0.0 }
    }
}

/// Where per-cycle noise is injected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseKind {
    #[default]
    None,
    /// Added directly to the membrane potential
    Vm,
    /// Added to excitatory conductance (applied by the caller)
    Ge,
    /// Added to activation (applied by the caller)
    Act,
    /// Multiplies excitatory conductance (applied by the caller)
    GeMult,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NoiseParams {
    pub kind: NoiseKind,
    /// Variance of the Gaussian the caller samples per-cycle noise from
    pub var: f32,
}

impl NoiseParams {
    /// Standard deviation of the per-cycle sample
    pub fn std_dev(&self) -> f32 {
        self.var.max(0.0).sqrt()
    }
}

/// Full set of base activation parameters
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ActParams {
    pub gbar: GbarParams,
    pub erev: ErevParams,
    pub dt: DtParams,
    pub vm_range: MinMax,
    pub init: ActInitParams,
    pub xx1: Xx1Params,
    pub noise: NoiseParams,
}

impl ActParams {
    /// Recompute every derived field
    pub fn update(&mut self) {
        self.dt.update();
        self.xx1.update();
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.dt.vm_tau > 0.0) {
            return Err(NeuralError::invalid(
                "act.dt.vm_tau",
                format!("must be > 0, got {}", self.dt.vm_tau),
            ));
        }
        if !(self.dt.integ > 0.0) {
            return Err(NeuralError::invalid(
                "act.dt.integ",
                format!("must be > 0, got {}", self.dt.integ),
            ));
        }
        // vm_dt above 1 overshoots the activation filter past its target
        if self.dt.vm_tau < self.dt.integ {
            return Err(NeuralError::invalid(
                "act.dt.vm_tau",
                format!(
                    "must be >= integ ({}) so that vm_dt <= 1, got {}",
                    self.dt.integ, self.dt.vm_tau
                ),
            ));
        }
        if !(self.dt.time_inc > 0.0) {
            return Err(NeuralError::invalid(
                "act.dt.time_inc",
                format!("must be > 0, got {}", self.dt.time_inc),
            ));
        }
        if !(self.vm_range.min <= self.vm_range.max) {
            return Err(NeuralError::invalid(
                "act.vm_range",
                format!(
                    "min ({}) must not exceed max ({})",
                    self.vm_range.min, self.vm_range.max
                ),
            ));
        }
        if self.gbar.e < 0.0 || self.gbar.l < 0.0 || self.gbar.i < 0.0 || self.gbar.k < 0.0 {
            return Err(NeuralError::invalid("act.gbar", "conductances must be >= 0"));
        }
        if !(self.noise.var >= 0.0 && self.noise.var.is_finite()) {
            return Err(NeuralError::invalid(
                "act.noise.var",
                format!("must be >= 0, got {}", self.noise.var),
            ));
        }
        self.xx1.validate()
    }

    /// Net current at `vm` for already-scaled conductances
    #[inline(always)]
    pub fn inet_from_g(&self, vm: f32, ge: f32, gi: f32, gk: f32) -> f32 {
        ge * (self.erev.e - vm)
            + self.gbar.l * (self.erev.l - vm)
            + gi * (self.erev.i - vm)
            + gk * (self.erev.k - vm)
    }

    /// Excitatory conductance that would hold Vm exactly at the XX1 threshold
    #[inline]
    pub fn ge_thr_from_g(&self, gi: f32, gk: f32) -> f32 {
        let thr = self.xx1.thr;
        (gi * (self.erev.i - thr) + self.gbar.l * (self.erev.l - thr) + gk * (self.erev.k - thr))
            / (thr - self.erev.e)
    }

    /// Reset a neuron's electrical state to its initial values
    pub fn init_acts(&self, nrn: &mut Neuron) {
        nrn.act = self.init.act;
        nrn.act_delta = 0.0;
        nrn.vm = self.init.vm;
        nrn.inet = 0.0;
        nrn.gk = 0.0;
        nrn.noise = 0.0;
    }
}
