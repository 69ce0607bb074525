// ─────────────────────────────────────────────────────────────────────
// SCPN Photon Core — Mie Precomputation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Scattering-parameter precomputation: Mie theory for spherical
//! scatterers plus the Whittle-Matern continuous-random-medium model.
//! Produces the Mueller-matrix tables consumed by polarized transport.

pub mod lut;
pub mod mie;
pub mod polydisperse;
pub mod recurrence;
pub mod table;
pub mod whittle_matern;

pub use mie::{mie, small_mie, MieSolution};
pub use polydisperse::mie_polydisperse;
pub use table::{cosine_grid, MuellerTable};
pub use whittle_matern::whittle_matern;
