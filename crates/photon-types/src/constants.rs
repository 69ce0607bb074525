// ─────────────────────────────────────────────────────────────────────
// SCPN Photon Core — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Number of sampled scattering-angle cosines in a Mueller table.
pub const NANGLES: usize = 1000;

/// Radii sampled across the Gaussian size distribution (±3σ).
pub const NRS: usize = 1001;

/// Photons per data-parallel work block.
pub const MAX_THREAD: usize = 128;

/// Iteration cap for the Lentz continued fraction.
pub const LENTZ_MAX_ITER: usize = 100_000;

/// Lentz termination tolerance on the running ratio.
pub const LENTZ_TOL: f64 = 1e-12;

/// Size parameters above this are rejected as unvalidated.
pub const X_MAX_VALIDATED: f64 = 20_000.0;

/// Cut-over to the small-particle (Rayleigh-plus-correction) branch.
pub const SMALL_MIE_CUTOFF: f64 = 0.1;

/// Negative residual free flight signalling "draw a new flight".
pub const FLIGHT_SENTINEL: f64 = -1.0;

/// Tolerance on the photon direction unit norm.
pub const DIR_NORM_TOL: f64 = 1e-5;

/// Material ID reserved for vacuum / exterior.
pub const VACUUM_ID: u8 = 0;
