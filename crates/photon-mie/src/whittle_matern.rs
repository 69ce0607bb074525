// ─────────────────────────────────────────────────────────────────────
// SCPN Photon Core — Whittle-Matern Phase Function
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Closed-form Mueller table for a continuous random medium with a
//! Whittle-Matern refractive-index correlation: correlation length
//! `lc` and fractal dimension `d` set the spectral density directly,
//! with no multipole series involved.

use std::f64::consts::PI;

use photon_types::error::{PhotonError, PhotonResult};

use crate::table::MuellerTable;

/// Mueller table and anisotropy for the Whittle-Matern spectral model.
/// The table is sampled uniformly in angle over [0, π) with `mu.len()`
/// points; `mu` supplies the cosine grid for the anisotropy quadrature.
pub fn whittle_matern(
    lc: f64,
    d: f64,
    lambda: f64,
    mu: &[f64],
) -> PhotonResult<(MuellerTable, f64)> {
    if !(lc > 0.0) || !(lambda > 0.0) {
        return Err(PhotonError::InvalidInput(format!(
            "correlation length and wavelength must be positive: lc = {lc}, lambda = {lambda}"
        )));
    }

    let nang = mu.len();
    let klc = 2.0 * PI * lc / lambda;
    let mut table = MuellerTable::zeros(nang);

    for k in 0..nang {
        let theta = k as f64 * PI / nang as f64;
        let half_sin = (theta / 2.0).sin();
        let spectral_density =
            1.0 / (1.0 + 4.0 * klc * klc * half_sin * half_sin).powf(d / 2.0);
        let cos_theta = theta.cos();
        table.s11[k] = (1.0 + cos_theta * cos_theta) * spectral_density;
        table.s12[k] = (cos_theta * cos_theta - 1.0) * spectral_density;
        table.s33[k] = 2.0 * cos_theta * spectral_density;
        table.s43[k] = 0.0;
    }

    let g = table.anisotropy(mu);
    Ok((table, g))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::cosine_grid;

    fn tissue_like() -> (MuellerTable, f64) {
        // l_c = 1 µm, D = 2.5 at λ = 633 nm.
        let mu = cosine_grid();
        whittle_matern(1.0, 2.5, 0.633, &mu).unwrap()
    }

    #[test]
    fn test_s43_identically_zero() {
        let (table, _) = tissue_like();
        assert!(table.s43.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_s11_decreasing_over_the_lobe() {
        // The forward lobe decays monotonically; the (1 + cos²θ)
        // factor allows a sub-1e-4 uptick only in the last few bins
        // near θ = π.
        let (table, _) = tissue_like();
        for k in 1..table.len() {
            assert!(
                table.s11[k] <= table.s11[k - 1] * (1.0 + 1e-4),
                "S11 rising at bin {k}: {} -> {}",
                table.s11[k - 1],
                table.s11[k]
            );
        }
    }

    #[test]
    fn test_anisotropy_in_expected_band() {
        let (_, g) = tissue_like();
        assert!(g > 0.6 && g < 0.95, "Whittle-Matern g = {g}");
    }

    #[test]
    fn test_pointwise_invariants() {
        let (table, _) = tissue_like();
        for k in 0..table.len() {
            assert!(table.s11[k] >= 0.0);
            assert!(table.s12[k].abs() <= table.s11[k] * (1.0 + 1e-12));
            assert!(table.s12[k] <= 0.0, "S12 must be non-positive here");
        }
    }

    #[test]
    fn test_longer_correlation_sharpens_forward_lobe() {
        let mu = cosine_grid();
        let (short, g_short) = whittle_matern(0.2, 2.5, 0.633, &mu).unwrap();
        let (long, g_long) = whittle_matern(2.0, 2.5, 0.633, &mu).unwrap();
        assert!(g_long > g_short);
        // Normalized forward-to-side ratio grows with l_c.
        let mid = mu.len() / 2;
        assert!(long.s11[0] / long.s11[mid] > short.s11[0] / short.s11[mid]);
    }

    #[test]
    fn test_rejects_nonpositive_parameters() {
        let mu = cosine_grid();
        assert!(whittle_matern(0.0, 2.5, 0.633, &mu).is_err());
        assert!(whittle_matern(1.0, 2.5, 0.0, &mu).is_err());
    }
}
