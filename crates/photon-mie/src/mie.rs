// ─────────────────────────────────────────────────────────────────────
// SCPN Photon Core — Mie Engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Scattering efficiency, anisotropy and Mueller matrix for a single
//! (size parameter, relative index) pair, after Bohren & Huffman.
//!
//! The series branch walks the multipole expansion with Riccati-Bessel
//! functions advanced by two-term recurrences; the logarithmic
//! derivative comes from the upward or downward recursion depending on
//! how absorbing the sphere is. Spheres far below the wavelength take
//! the closed-form small-particle branch instead.

use num_complex::Complex64;
use photon_types::constants::{SMALL_MIE_CUTOFF, X_MAX_VALIDATED};
use photon_types::error::{PhotonError, PhotonResult};

use crate::recurrence::{dn_down, dn_up};
use crate::table::MuellerTable;

/// Output of one Mie evaluation.
#[derive(Debug, Clone)]
pub struct MieSolution {
    pub smatrix: MuellerTable,
    /// Scattering efficiency Q_sca.
    pub qsca: f64,
    /// Anisotropy <cos θ> from the multipole series.
    pub g: f64,
}

/// The upward D_n recursion holds significance only while |Im m|·x is
/// below this index-dependent threshold.
fn upward_is_stable(x: f64, m: Complex64) -> bool {
    (m.im * x).abs() < (13.78 * m.re - 10.8) * m.re + 3.9
}

/// Mie scattering parameters at size parameter `x` for relative index
/// `m` (convention: Im m ≤ 0), sampled at the cosines `mu`.
pub fn mie(x: f64, m: Complex64, mu: &[f64]) -> PhotonResult<MieSolution> {
    if x <= 0.0 {
        return Err(PhotonError::InvalidInput(format!(
            "sphere size parameter must be positive, got {x}"
        )));
    }
    if x > X_MAX_VALIDATED {
        return Err(PhotonError::Unvalidated(format!(
            "spheres with x > {X_MAX_VALIDATED} are not validated, got {x}"
        )));
    }
    if (m.re == 0.0 && x < SMALL_MIE_CUTOFF)
        || (m.re > 0.0 && m.norm() * x < SMALL_MIE_CUTOFF)
    {
        return Ok(small_mie(x, m, mu));
    }

    let nstop = (x + 4.05 * x.powf(1.0 / 3.0) + 2.0).floor() as usize;
    let nang = mu.len();

    let mut s1 = vec![Complex64::new(0.0, 0.0); nang];
    let mut s2 = vec![Complex64::new(0.0, 0.0); nang];
    let mut pi0 = vec![0.0_f64; nang];
    let mut pi1 = vec![1.0_f64; nang];

    // Perfectly reflecting spheres (Re m = 0) need no logarithmic
    // derivative at all.
    let d = if m.re > 0.0 {
        let z = x * m;
        if upward_is_stable(x, m) {
            dn_up(z, nstop)
        } else {
            dn_down(z, nstop)?
        }
    } else {
        Vec::new()
    };

    let mut psi0 = x.sin();
    let mut psi1 = psi0 / x - x.cos();
    let mut xi0 = Complex64::new(psi0, x.cos());
    let mut xi1 = Complex64::new(psi1, x.cos() / x + x.sin());

    let mut qsca = 0.0;
    let mut g = 0.0;
    let mut anm1 = Complex64::new(0.0, 0.0);
    let mut bnm1 = Complex64::new(0.0, 0.0);

    for n in 1..=nstop {
        let nf = n as f64;

        let (an, bn) = if m.re == 0.0 {
            let an = (nf * psi1 / x - psi0) / (nf / x * xi1 - xi0);
            let bn = psi1 / xi1;
            (an, bn)
        } else if m.im == 0.0 {
            let za = d[n].re / m.re + nf / x;
            let an = (za * psi1 - psi0) / (za * xi1 - xi0);
            let zb = d[n].re * m.re + nf / x;
            let bn = (zb * psi1 - psi0) / (zb * xi1 - xi0);
            (an, bn)
        } else {
            let za = d[n] / m + nf / x;
            let an = Complex64::new(za.re * psi1 - psi0, za.im * psi1) / (za * xi1 - xi0);
            let zb = d[n] * m + nf / x;
            let bn = Complex64::new(zb.re * psi1 - psi0, zb.im * psi1) / (zb * xi1 - xi0);
            (an, bn)
        };

        let factor = (2.0 * nf + 1.0) / (nf + 1.0) / nf;
        for k in 0..nang {
            let tau = nf * mu[k] * pi1[k] - (nf + 1.0) * pi0[k];
            let alpha = factor * pi1[k];
            let beta = factor * tau;
            s1[k] += alpha * an + beta * bn;
            s2[k] += alpha * bn + beta * an;
        }
        for k in 0..nang {
            let prev = pi1[k];
            pi1[k] = ((2.0 * nf + 1.0) * mu[k] * pi1[k] - (nf + 1.0) * pi0[k]) / nf;
            pi0[k] = prev;
        }

        let weight = 2.0 * nf + 1.0;
        g += (nf - 1.0 / nf) * ((anm1.conj() * an).re + (bnm1.conj() * bn).re);
        g += weight / (nf * (nf + 1.0)) * (an.conj() * bn).re;
        qsca += weight * (an.norm_sqr() + bn.norm_sqr());

        let xi = (weight / x) * xi1 - xi0;
        xi0 = xi1;
        xi1 = xi;
        psi0 = psi1;
        psi1 = xi1.re;

        anm1 = an;
        bnm1 = bn;
    }

    qsca *= 2.0 / (x * x);
    g *= 4.0 / (qsca * x * x);

    let mut smatrix = MuellerTable::zeros(nang);
    for k in 0..nang {
        let p2 = s2[k].norm_sqr();
        let p1 = s1[k].norm_sqr();
        smatrix.s11[k] = 0.5 * (p2 + p1);
        smatrix.s12[k] = 0.5 * (p2 - p1);
        let cross = s1[k].conj() * s2[k];
        smatrix.s33[k] = cross.re;
        smatrix.s43[k] = cross.im;
    }

    Ok(MieSolution { smatrix, qsca, g })
}

/// Closed-form Rayleigh-plus-correction branch for spheres far below
/// the wavelength: â₁, b̂₁, â₂ in powers of x, with a dedicated branch
/// for perfectly reflecting spheres (Re m = 0).
pub fn small_mie(x: f64, m: Complex64, mu: &[f64]) -> MieSolution {
    let m2 = m * m;
    let m4 = m2 * m2;
    let x2 = x * x;
    let mut x3 = x2 * x;
    let x4 = x2 * x2;
    let z0 = Complex64::new(-m2.im, m2.re - 1.0);

    let ahat1 = if m.re == 0.0 {
        let num = Complex64::new(0.0, 2.0 / 3.0 * (1.0 - 0.2 * x2));
        let den = Complex64::new(1.0 - 0.5 * x2, 2.0 / 3.0 * x3);
        num / den
    } else {
        let z1 = 2.0 / 3.0 * z0;
        let z2 = Complex64::new(
            1.0 - 0.1 * x2 + (4.0 * m2.re + 5.0) * x4 / 1400.0,
            4.0 * x4 * m2.im / 1400.0,
        );
        let z4 = x3 * (1.0 - 0.1 * x2) * z1;
        let den = Complex64::new(
            2.0 + m2.re
                + (1.0 - 0.7 * m2.re) * x2
                + (8.0 * m4.re - 385.0 * m2.re + 350.0) / 1400.0 * x4
                + z4.re,
            -0.7 * m2.im * x2 + (8.0 * m4.im - 385.0 * m2.im) / 1400.0 * x4 + z4.im,
        );
        z1 * z2 / den
    };

    let bhat1 = if m.re == 0.0 {
        Complex64::new(0.0, -(1.0 - 0.1 * x2) / 3.0)
            / Complex64::new(1.0 + 0.5 * x2, -x3 / 3.0)
    } else {
        let z2 = x2 / 45.0 * z0;
        let z6 = Complex64::new(1.0 + (2.0 * m2.re - 5.0) * x2 / 70.0, m2.im * x2 / 35.0);
        let z7 = Complex64::new(1.0 - (2.0 * m2.re - 5.0) * x2 / 30.0, -m2.im * x2 / 15.0);
        z2 * (z6 / z7)
    };

    let ahat2 = if m.re == 0.0 {
        Complex64::new(0.0, x2 / 30.0)
    } else {
        let z3 = (1.0 - x2 / 14.0) * x2 / 15.0 * z0;
        let z8 = Complex64::new(
            2.0 * m2.re + 3.0 - (m2.re / 7.0 - 0.5) * x2,
            2.0 * m2.im - m2.im / 7.0 * x2,
        );
        z3 / z8
    };

    let t = ahat1.norm_sqr() + bhat1.norm_sqr() + 5.0 / 3.0 * ahat2.norm_sqr();
    let qsca = 6.0 * x4 * t;
    let g = (ahat1.conj() * (ahat2 + bhat1)).re / t;

    x3 *= 1.5;
    let ahat1 = ahat1 * x3;
    let bhat1 = bhat1 * x3;
    let ahat2 = ahat2 * (x3 * 5.0 / 3.0);

    let mut smatrix = MuellerTable::zeros(mu.len());
    for (j, &muj) in mu.iter().enumerate() {
        let angle = 2.0 * muj * muj - 1.0;
        let s1 = ahat1 + (bhat1 + ahat2) * muj;
        let s2 = bhat1 + (ahat1 + ahat2) * angle;
        let p2 = s2.norm_sqr();
        let p1 = s1.norm_sqr();
        smatrix.s11[j] = 0.5 * (p2 + p1);
        smatrix.s12[j] = 0.5 * (p2 - p1);
        let cross = s1.conj() * s2;
        smatrix.s33[j] = cross.re;
        smatrix.s43[j] = cross.im;
    }

    MieSolution { smatrix, qsca, g }
}
