// ─────────────────────────────────────────────────────────────────────
// SCPN Photon Core — Logarithmic-Derivative Recurrences
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Complex recurrence primitives for the Riccati-Bessel logarithmic
//! derivative D_n(z) = ψ_n'(z)/ψ_n(z): a Lentz continued-fraction seed
//! and the upward/downward recursions built on it.

use num_complex::Complex64;
use photon_types::constants::{LENTZ_MAX_ITER, LENTZ_TOL};
use photon_types::error::{PhotonError, PhotonResult};

/// D_n(z) at a single order via the Lentz continued fraction.
///
/// Terminates when the running ratio settles to unit modulus within
/// `LENTZ_TOL`; overrunning `LENTZ_MAX_ITER` is a convergence failure.
pub fn lentz_dn(z: Complex64, n: i64) -> PhotonResult<Complex64> {
    let mut zinv = 2.0 / z;
    let alpha = (n as f64 + 0.5) * zinv;
    let mut aj = (-(n as f64) - 1.5) * zinv;
    let mut alpha_j1 = aj + 1.0 / alpha;
    let mut alpha_j2 = aj;
    let mut ratio = alpha_j1 / alpha_j2;
    let mut runratio = alpha * ratio;

    for _ in 0..LENTZ_MAX_ITER {
        aj = zinv - aj;
        alpha_j1 = 1.0 / alpha_j1 + aj;
        alpha_j2 = 1.0 / alpha_j2 + aj;
        ratio = alpha_j1 / alpha_j2;
        zinv = -zinv;
        runratio *= ratio;

        if (ratio.norm() - 1.0).abs() <= LENTZ_TOL {
            return Ok(-(n as f64) / z + runratio);
        }
    }

    Err(PhotonError::ConvergenceFailure {
        iterations: LENTZ_MAX_ITER,
        message: format!("Lentz continued fraction stalled at z = {z}, n = {n}"),
    })
}

/// Upward recurrence for D_0..D_{nstop-1}, seeded from cot(z).
///
/// Only stable while |Im(m)|·x stays under the index-dependent threshold
/// checked by the caller; strongly absorbing media need [`dn_down`].
/// The returned vector has `nstop + 1` entries; the last stays zero, as
/// the series termination order never receives a recurrence value.
pub fn dn_up(z: Complex64, nstop: usize) -> Vec<Complex64> {
    let mut d = vec![Complex64::new(0.0, 0.0); nstop + 1];
    let zinv = 1.0 / z;

    d[0] = 1.0 / z.tan();
    for k in 1..nstop {
        let k_over_z = k as f64 * zinv;
        d[k] = 1.0 / (k_over_z - d[k - 1]) - k_over_z;
    }
    d
}

/// Downward recurrence seeded at order `nstop` by [`lentz_dn`].
///
/// Mandatory branch for strongly absorbing media where the upward
/// recursion loses significance.
pub fn dn_down(z: Complex64, nstop: usize) -> PhotonResult<Vec<Complex64>> {
    let mut d = vec![Complex64::new(0.0, 0.0); nstop + 1];
    let zinv = 1.0 / z;

    d[nstop - 1] = lentz_dn(z, nstop as i64)?;
    for k in (1..nstop).rev() {
        let k_over_z = k as f64 * zinv;
        d[k - 1] = k_over_z - 1.0 / (d[k] + k_over_z);
    }
    Ok(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// D_1(z) has the closed form -1/z + 1/(1/z - cot z).
    fn d1_closed_form(z: Complex64) -> Complex64 {
        let cot = 1.0 / z.tan();
        -1.0 / z + 1.0 / (1.0 / z - cot)
    }

    #[test]
    fn test_dn_up_matches_closed_form_order_one() {
        let z = Complex64::new(3.0, 0.0);
        let d = dn_up(z, 8);
        let expected = d1_closed_form(z);
        assert!(
            (d[1] - expected).norm() < 1e-10,
            "D_1 mismatch: {} vs {}",
            d[1],
            expected
        );
    }

    #[test]
    fn test_up_and_down_agree_for_real_z() {
        // Lossless case: both recursions are stable and must agree.
        let z = Complex64::new(10.0, 0.0);
        let nstop = 16;
        let up = dn_up(z, nstop);
        let down = dn_down(z, nstop).unwrap();
        for k in 0..nstop {
            assert!(
                (up[k] - down[k]).norm() < 1e-8,
                "D[{k}] diverges: up = {}, down = {}",
                up[k],
                down[k]
            );
        }
    }

    #[test]
    fn test_up_and_down_agree_for_weakly_absorbing_z() {
        let z = Complex64::new(12.0, -0.05);
        let nstop = 20;
        let up = dn_up(z, nstop);
        let down = dn_down(z, nstop).unwrap();
        for k in 0..nstop {
            assert!(
                (up[k] - down[k]).norm() < 1e-6,
                "D[{k}] diverges: up = {}, down = {}",
                up[k],
                down[k]
            );
        }
    }

    #[test]
    fn test_lentz_converges_for_absorbing_argument() {
        // Water-like absorbing sphere at x = 100.
        let z = Complex64::new(133.0, -1.0);
        let seed = lentz_dn(z, 120).unwrap();
        assert!(seed.re.is_finite() && seed.im.is_finite());
    }

    #[test]
    fn test_last_entry_stays_zero() {
        let z = Complex64::new(5.0, 0.0);
        let nstop = 10;
        assert_eq!(dn_up(z, nstop)[nstop], Complex64::new(0.0, 0.0));
        assert_eq!(dn_down(z, nstop).unwrap()[nstop], Complex64::new(0.0, 0.0));
    }
}
