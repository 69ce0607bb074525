// ─────────────────────────────────────────────────────────────────────
// SCPN Photon Core — Photon Source
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Pencil-beam source: a fixed launch position and unit direction that
//! every photon (and every relaunch) starts from.

use photon_types::config::SourceConfig;
use photon_types::error::{PhotonError, PhotonResult};
use photon_types::state::PhotonState;

#[derive(Debug, Clone, Copy)]
pub struct PhotonSource {
    pub position: [f64; 3],
    pub direction: [f64; 3],
}

impl PhotonSource {
    pub fn new(position: [f64; 3], direction: [f64; 3]) -> PhotonResult<Self> {
        if position.iter().any(|v| !v.is_finite()) {
            return Err(PhotonError::InvalidInput(
                "source position must be finite".to_string(),
            ));
        }
        let norm = (direction[0] * direction[0]
            + direction[1] * direction[1]
            + direction[2] * direction[2])
            .sqrt();
        if !norm.is_finite() || (norm - 1.0).abs() > 1e-6 {
            return Err(PhotonError::InvalidInput(format!(
                "source direction must be a unit vector, got norm {norm}"
            )));
        }
        Ok(PhotonSource {
            position,
            direction,
        })
    }

    pub fn from_config(config: &SourceConfig) -> PhotonResult<Self> {
        Self::new(config.position, config.direction)
    }

    /// Fresh photon at the source.
    pub fn launch(&self) -> PhotonState {
        PhotonState::launch(self.position, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_carries_source_geometry() {
        let src = PhotonSource::new([64.0, 64.0, 0.0], [0.0, 0.0, 1.0]).unwrap();
        let p = src.launch();
        assert_eq!(p.pos, [64.0, 64.0, 0.0]);
        assert_eq!(p.dir, [0.0, 0.0, 1.0]);
        assert_eq!(p.weight, 1.0);
    }

    #[test]
    fn test_rejects_non_unit_direction() {
        assert!(PhotonSource::new([0.0, 0.0, 0.0], [0.0, 0.0, 0.5]).is_err());
        assert!(PhotonSource::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]).is_err());
    }

    #[test]
    fn test_rejects_non_finite_position() {
        assert!(PhotonSource::new([f64::NAN, 0.0, 0.0], [0.0, 0.0, 1.0]).is_err());
    }

    #[test]
    fn test_accepts_oblique_unit_direction() {
        let s = 1.0 / 3.0_f64.sqrt();
        assert!(PhotonSource::new([1.0, 2.0, 3.0], [s, s, s]).is_ok());
    }
}
