// ─────────────────────────────────────────────────────────────────────
// SCPN Photon Core — Polydisperse Integrator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Gaussian polydisperse averaging of the Mie engine: a discretized
//! normal distribution of sphere radii, one Mie evaluation per sampled
//! radius, Mueller entries accumulated with the normalized weights.

use std::f64::consts::PI;

use num_complex::Complex64;
use photon_types::constants::NRS;
use photon_types::error::{PhotonError, PhotonResult};

use crate::mie::{mie, MieSolution};
use crate::table::MuellerTable;

/// Mueller matrix and efficiency of a Gaussian size distribution with
/// mean radius `mean_radius` and coefficient of variation `cv`, in a
/// medium of index `n_med` at vacuum wavelength `lambda` (same length
/// units as the radius). `m` is the relative index of the spheres.
///
/// Radii are sampled uniformly across ±3σ with `NRS` points; weights
/// are the untruncated normal density renormalized by their sum. The
/// anisotropy is recomputed from the averaged S11 by the trapezoidal
/// rule rather than taken from any single radius.
pub fn mie_polydisperse(
    mean_radius: f64,
    cv: f64,
    n_med: f64,
    lambda: f64,
    m: Complex64,
    mu: &[f64],
) -> PhotonResult<MieSolution> {
    if !(mean_radius > 0.0) || !(lambda > 0.0) || !(n_med > 0.0) {
        return Err(PhotonError::InvalidInput(format!(
            "polydisperse parameters must be positive: mean_radius = {mean_radius}, \
             lambda = {lambda}, n_med = {n_med}"
        )));
    }
    if !(cv > 0.0) {
        return Err(PhotonError::InvalidInput(format!(
            "coefficient of variation must be positive, got {cv}"
        )));
    }

    let st_dev = mean_radius * cv;
    let delta_size = 6.0 * st_dev / NRS as f64;
    let norm = 1.0 / (2.0 * PI * st_dev * st_dev).sqrt();

    let mut radii = [0.0_f64; NRS];
    let mut weights = [0.0_f64; NRS];
    let mut tot = 0.0;
    for ir in 0..NRS {
        radii[ir] = mean_radius - 3.0 * st_dev + ir as f64 * delta_size;
        let dev = radii[ir] - mean_radius;
        weights[ir] = norm * (-dev * dev / (2.0 * st_dev * st_dev)).exp();
        tot += weights[ir];
    }

    let mut avg = MuellerTable::zeros(mu.len());
    let mut qsca = 0.0;
    for ir in 0..NRS {
        let x = 2.0 * PI * radii[ir] * n_med / lambda;
        let sol = mie(x, m, mu)?;
        let w = weights[ir] / tot;
        avg.accumulate(&sol.smatrix, w);
        qsca += w * sol.qsca;
    }

    let g = avg.anisotropy(mu);
    Ok(MieSolution {
        smatrix: avg,
        qsca,
        g,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::cosine_grid;

    /// Polystyrene beads in water: mean_r = 0.5 µm, CV = 5%, λ = 633 nm.
    fn polystyrene() -> MieSolution {
        let mu = cosine_grid();
        let m = Complex64::new(1.59 / 1.33, 0.0);
        mie_polydisperse(0.5, 0.05, 1.33, 0.633, m, &mu).unwrap()
    }

    #[test]
    fn test_polystyrene_anisotropy() {
        let sol = polystyrene();
        assert!(
            sol.g > 0.91 && sol.g < 0.93,
            "polystyrene g expected near 0.92, got {}",
            sol.g
        );
    }

    #[test]
    fn test_forward_dominates_backscatter() {
        let sol = polystyrene();
        let n = sol.smatrix.len();
        assert!(sol.smatrix.s11[0] > sol.smatrix.s11[n - 1]);
    }

    #[test]
    fn test_averaged_normalization_matches_qsca() {
        let mu = cosine_grid();
        let sol = polystyrene();
        let x = 2.0 * PI * 0.5 * 1.33 / 0.633;
        let mut integral = 0.0;
        for k in 1..mu.len() {
            integral +=
                0.5 * (sol.smatrix.s11[k] + sol.smatrix.s11[k - 1]) * (mu[k - 1] - mu[k]);
        }
        let expected = sol.qsca * x * x / 2.0;
        assert!(
            (integral - expected).abs() / expected < 0.01,
            "normalization: {} vs {}",
            integral,
            expected
        );
    }

    #[test]
    fn test_pointwise_invariants_survive_averaging() {
        let sol = polystyrene();
        for k in 0..sol.smatrix.len() {
            assert!(sol.smatrix.s11[k] >= 0.0);
            assert!(sol.smatrix.s12[k].abs() <= sol.smatrix.s11[k] * (1.0 + 1e-12));
        }
    }

    #[test]
    fn test_rejects_degenerate_distribution() {
        let mu = cosine_grid();
        let m = Complex64::new(1.2, 0.0);
        assert!(mie_polydisperse(0.5, 0.0, 1.33, 0.633, m, &mu).is_err());
        assert!(mie_polydisperse(-0.5, 0.05, 1.33, 0.633, m, &mu).is_err());
    }
}
