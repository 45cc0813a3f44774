// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Parameter sections reuse the kernel's own serde-enabled parameter structs,
//! so a TOML key maps one-to-one onto a field of `ActParams`, `SpikeParams`,
//! or `KnaAdaptParams`. Every section is `#[serde(default)]`; an empty file
//! is a valid configuration.

use serde::{Deserialize, Serialize};
use tracing::debug;

use spikeact_neural::{
    ActParams, KnaAdaptParams, NeuronKind, RateCodedParams, SpikeActParams, SpikeParams,
};
use spikeact_observability::LoggingConfig;

use crate::ConfigResult;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpikeActConfig {
    pub neuron: NeuronConfig,
    pub act: ActParams,
    pub spike: SpikeParams,
    pub kna: KnaAdaptParams,
    pub logging: LoggingConfig,
}

/// Which activation model a layer runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeuronModel {
    #[default]
    Spiking,
    RateCoded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NeuronConfig {
    pub model: NeuronModel,
}

impl SpikeActConfig {
    /// Recompute derived fields of every parameter section
    pub fn update(&mut self) {
        self.act.update();
        self.spike.update();
        self.kna.update();
    }

    /// Finalized, validated spiking kernel parameters
    pub fn spike_act_params(&self) -> ConfigResult<SpikeActParams> {
        let params = SpikeActParams::new_validated(self.act, self.spike, self.kna)?;
        debug!(
            threshold = params.threshold(),
            exp = params.spike.exp,
            tr = params.spike.tr,
            max_hz = params.spike.max_hz,
            kna = params.kna.on,
            "spiking parameters built from config"
        );
        Ok(params)
    }

    /// Finalized neuron kind selected by `[neuron] model`
    pub fn neuron_kind(&self) -> ConfigResult<NeuronKind> {
        let mut kind = match self.neuron.model {
            NeuronModel::Spiking => NeuronKind::Spiking(SpikeActParams {
                act: self.act,
                spike: self.spike,
                kna: self.kna,
            }),
            NeuronModel::RateCoded => NeuronKind::RateCoded(RateCodedParams {
                act: self.act,
                kna: self.kna,
            }),
        };
        kind.finalize()?;
        Ok(kind)
    }

    /// Serialize to TOML (derived fields are not written)
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
