// ─────────────────────────────────────────────────────────────────────
// SCPN Photon Core — RNG Substrate
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Per-photon uniform (0, 1) streams. Every photon owns an independent
//! generator derived deterministically from the 32-bit base seed and
//! the photon index, so a run is reproducible for a fixed seed no
//! matter how workers are scheduled.

use rand::distributions::Open01;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// SplitMix64 finalizer; decorrelates consecutive photon indices.
fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Worker-exclusive uniform stream for one photon.
pub struct PhotonRng {
    inner: StdRng,
}

impl PhotonRng {
    /// Stream for photon `index` under the run's base seed.
    pub fn for_photon(base_seed: u32, index: u64) -> Self {
        let mixed = splitmix64(((base_seed as u64) << 32) ^ index);
        PhotonRng {
            inner: StdRng::seed_from_u64(mixed),
        }
    }

    /// Uniform draw strictly inside (0, 1); safe under -ln(u).
    pub fn uniform_open01(&mut self) -> f64 {
        self.inner.sample(Open01)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streams_are_reproducible() {
        let mut a = PhotonRng::for_photon(42, 7);
        let mut b = PhotonRng::for_photon(42, 7);
        for _ in 0..1000 {
            assert_eq!(a.uniform_open01(), b.uniform_open01());
        }
    }

    #[test]
    fn test_streams_differ_across_photons() {
        let mut a = PhotonRng::for_photon(42, 0);
        let mut b = PhotonRng::for_photon(42, 1);
        let same = (0..64)
            .filter(|_| a.uniform_open01() == b.uniform_open01())
            .count();
        assert!(same < 4, "adjacent photon streams overlap: {same}/64");
    }

    #[test]
    fn test_streams_differ_across_seeds() {
        let mut a = PhotonRng::for_photon(1, 0);
        let mut b = PhotonRng::for_photon(2, 0);
        let same = (0..64)
            .filter(|_| a.uniform_open01() == b.uniform_open01())
            .count();
        assert!(same < 4, "seed change did not decorrelate: {same}/64");
    }

    #[test]
    fn test_draws_lie_strictly_inside_unit_interval() {
        let mut rng = PhotonRng::for_photon(7, 0);
        for _ in 0..100_000 {
            let u = rng.uniform_open01();
            assert!(u > 0.0 && u < 1.0, "draw escaped (0, 1): {u}");
        }
    }

    #[test]
    fn test_mean_is_near_half() {
        let mut rng = PhotonRng::for_photon(1234, 0);
        let n = 200_000;
        let sum: f64 = (0..n).map(|_| rng.uniform_open01()).sum();
        let mean = sum / n as f64;
        assert!((mean - 0.5).abs() < 0.005, "mean = {mean}");
    }
}
