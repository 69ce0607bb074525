// ─────────────────────────────────────────────────────────────────────
// SCPN Photon Core — Transport Engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Data-parallel stochastic photon transport through a voxelized
//! heterogeneous turbid medium: free-flight sampling, Henyey-Greenstein
//! scattering, Beer-Lambert absorption, constant-length voxel stepping
//! and fluence accumulation.

pub mod fluence;
pub mod kernel;
pub mod medium;
pub mod rng;
pub mod source;

pub use fluence::{AtomicFluence, FluenceGrid};
pub use kernel::{RunOutput, RunSummary, TransportKernel};
pub use medium::MediumGrid;
pub use rng::PhotonRng;
pub use source::PhotonSource;
