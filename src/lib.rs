// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikeact
//!
//! Spiking activation for conductance-based point neurons, with a running
//! inter-spike-interval estimate that turns spike trains back into a rate
//! code.
//!
//! ## Quick Start
//!
//! ```rust
//! use spikeact::prelude::*;
//!
//! let params = SpikeActParams::new();
//! let mut nrn = Neuron::with_conductances(1.0, 0.0);
//! let mut state = SpikingNeuronState::new();
//! params.init_acts(&mut nrn, &mut state);
//!
//! for _ in 0..50 {
//!     params.spike_vm_from_g(&mut nrn, &state);
//!     params.spike_act_from_vm(&mut nrn, &mut state);
//! }
//! assert!(nrn.act > 0.0);
//! ```
//!
//! ## Crates
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  neural: state, parameters, spiking kernel, population  │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  config: spikeact.toml + env/CLI overrides              │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  observability: tracing subscriber, debug flags         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Feature Flags
//! - **`parallel`** (default): rayon population stepping
//! - **`file-logging`**: JSON log files with retention
//!
//! ## License
//!
//! Apache-2.0

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export members
pub use spikeact_config as config;
pub use spikeact_neural as neural;
pub use spikeact_observability as observability;

pub mod probe;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::neural::{
        ActParams, ActivationModel, IsiEstimate, KnaAdaptParams, ModelParameters, Neuron,
        NeuronKind, Population, RateCodedParams, SpikeActParams, SpikeParams,
        SpikingNeuronState,
    };

    pub use crate::config::{load_config, load_config_or_default, SpikeActConfig};
    pub use crate::probe::{run_probe, ProbeSettings, ProbeSummary};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_facade_imports() {
        use crate::prelude::*;
        let state = SpikingNeuronState::new();
        assert_eq!(state.avg_isi, IsiEstimate::Unstarted);
        assert!(!crate::VERSION.is_empty());
    }
}
