// ─────────────────────────────────────────────────────────────────────
// SCPN Photon Core — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::constants::DIR_NORM_TOL;
use crate::error::{PhotonError, PhotonResult};

/// Optical properties of one medium type.
///
/// Units: mua and mus in 1/voxel, g dimensionless, n relative to vacuum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Absorption coefficient μa.
    pub mua: f64,
    /// Scattering coefficient μs.
    pub mus: f64,
    /// Henyey-Greenstein anisotropy.
    pub g: f64,
    /// Refractive index.
    pub n: f64,
}

impl Material {
    /// Entry 0 of every table: exterior with no interaction.
    pub fn vacuum() -> Self {
        Material {
            mua: 0.0,
            mus: 0.0,
            g: 0.0,
            n: 1.0,
        }
    }

    pub fn validate(&self, id: usize) -> PhotonResult<()> {
        if !self.mua.is_finite() || self.mua < 0.0 {
            return Err(PhotonError::InvalidInput(format!(
                "material {id}: mua must be finite and >= 0, got {}",
                self.mua
            )));
        }
        if !self.mus.is_finite() || self.mus < 0.0 {
            return Err(PhotonError::InvalidInput(format!(
                "material {id}: mus must be finite and >= 0, got {}",
                self.mus
            )));
        }
        if !self.g.is_finite() || self.g <= -1.0 || self.g >= 1.0 {
            return Err(PhotonError::InvalidInput(format!(
                "material {id}: g must lie in (-1, 1), got {}",
                self.g
            )));
        }
        if !self.n.is_finite() || self.n <= 0.0 {
            return Err(PhotonError::InvalidInput(format!(
                "material {id}: n must be finite and > 0, got {}",
                self.n
            )));
        }
        Ok(())
    }
}

/// Immutable per-run material table. Entry 0 is always vacuum.
#[derive(Debug, Clone)]
pub struct MaterialTable {
    entries: Vec<Material>,
}

impl MaterialTable {
    /// Validate and freeze a table. Entry 0 must be non-interacting.
    pub fn new(entries: Vec<Material>) -> PhotonResult<Self> {
        if entries.is_empty() {
            return Err(PhotonError::InvalidInput(
                "material table must contain at least the vacuum entry".to_string(),
            ));
        }
        if entries[0].mua != 0.0 || entries[0].mus != 0.0 {
            return Err(PhotonError::InvalidInput(
                "material 0 is reserved for vacuum (mua = mus = 0)".to_string(),
            ));
        }
        for (id, mat) in entries.iter().enumerate() {
            mat.validate(id)?;
        }
        Ok(MaterialTable { entries })
    }

    /// Properties for a voxel ID. Unknown IDs read as vacuum.
    pub fn get(&self, id: u8) -> Material {
        self.entries
            .get(id as usize)
            .copied()
            .unwrap_or_else(Material::vacuum)
    }

    /// True when `id` references a populated entry.
    pub fn contains(&self, id: u8) -> bool {
        (id as usize) < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Mutable per-photon state owned by exactly one worker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotonState {
    /// Position in voxel-index units.
    pub pos: [f64; 3],
    /// Unit propagation direction.
    pub dir: [f64; 3],
    /// Packet weight in (0, 1].
    pub weight: f64,
    /// Residual free flight in scattering mean-free paths.
    pub residual: f64,
    /// Accumulated path length in voxel units.
    pub pathlen: f64,
    /// Scattering events since the last (re)launch.
    pub nscatter: u32,
    /// Boundary / cap relaunches of this photon.
    pub relaunches: u32,
}

impl PhotonState {
    /// Fresh photon at the source: full weight, no scheduled flight.
    pub fn launch(pos: [f64; 3], dir: [f64; 3]) -> Self {
        PhotonState {
            pos,
            dir,
            weight: 1.0,
            residual: 0.0,
            pathlen: 0.0,
            nscatter: 0,
            relaunches: 0,
        }
    }

    /// Reset to the source after a domain exit, keeping the relaunch tally.
    pub fn relaunch(&mut self, pos: [f64; 3], dir: [f64; 3]) {
        self.pos = pos;
        self.dir = dir;
        self.weight = 1.0;
        self.residual = 0.0;
        self.pathlen = 0.0;
        self.nscatter = 0;
        self.relaunches += 1;
    }

    /// ‖dir‖₂ = 1 within tolerance.
    pub fn direction_is_unit(&self) -> bool {
        let norm2 = self.dir[0] * self.dir[0] + self.dir[1] * self.dir[1] + self.dir[2] * self.dir[2];
        (norm2.sqrt() - 1.0).abs() <= DIR_NORM_TOL
    }

    /// End-of-run invariant audit: finite unit direction, positive weight.
    pub fn is_consistent(&self) -> bool {
        self.pos.iter().all(|v| v.is_finite())
            && self.dir.iter().all(|v| v.is_finite())
            && self.direction_is_unit()
            && self.weight > 0.0
            && self.weight.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vacuum_material() {
        let v = Material::vacuum();
        assert_eq!(v.mua, 0.0);
        assert_eq!(v.mus, 0.0);
        assert!(v.validate(0).is_ok());
    }

    #[test]
    fn test_table_rejects_empty() {
        assert!(MaterialTable::new(vec![]).is_err());
    }

    #[test]
    fn test_table_rejects_interacting_entry_zero() {
        let bad = Material {
            mua: 0.1,
            mus: 10.0,
            g: 0.9,
            n: 1.37,
        };
        assert!(MaterialTable::new(vec![bad]).is_err());
    }

    #[test]
    fn test_table_lookup_and_fallback() {
        let tissue = Material {
            mua: 0.01,
            mus: 10.0,
            g: 0.9,
            n: 1.37,
        };
        let table = MaterialTable::new(vec![Material::vacuum(), tissue]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1), tissue);
        // IDs past the table read as vacuum
        assert_eq!(table.get(7), Material::vacuum());
        assert!(table.contains(1));
        assert!(!table.contains(7));
    }

    #[test]
    fn test_material_rejects_bad_anisotropy() {
        let m = Material {
            mua: 0.0,
            mus: 1.0,
            g: 1.0,
            n: 1.0,
        };
        assert!(m.validate(1).is_err());
    }

    #[test]
    fn test_launch_state() {
        let p = PhotonState::launch([64.0, 64.0, 0.0], [0.0, 0.0, 1.0]);
        assert_eq!(p.weight, 1.0);
        assert_eq!(p.residual, 0.0);
        assert_eq!(p.nscatter, 0);
        assert!(p.direction_is_unit());
        assert!(p.is_consistent());
    }

    #[test]
    fn test_relaunch_preserves_tally() {
        let mut p = PhotonState::launch([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        p.weight = 0.3;
        p.nscatter = 12;
        p.relaunch([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        assert_eq!(p.weight, 1.0);
        assert_eq!(p.nscatter, 0);
        assert_eq!(p.relaunches, 1);
    }
}
