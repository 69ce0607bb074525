// ─────────────────────────────────────────────────────────────────────
// SCPN Photon Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::error::{PhotonError, PhotonResult};
use crate::state::{Material, MaterialTable};

/// Top-level simulation configuration.
/// Maps 1:1 to the JSON input deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub simulation_name: String,
    /// Voxel counts (nx, ny, nz).
    pub grid_resolution: [usize; 3],
    /// Photons to launch.
    pub photons: u64,
    /// Micro-steps per photon before it retires.
    pub totalmove: u32,
    /// Cartesian jump length per voxel step.
    pub minstep: f64,
    /// Residual free-flight cap triggering relaunch.
    pub lmax: f64,
    /// Base RNG seed; per-photon streams derive from it.
    pub seed: u32,
    pub source: SourceConfig,
    #[serde(default)]
    pub accumulation: AccumulationMode,
    /// Material table; entry 0 must be vacuum.
    pub materials: Vec<Material>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Launch position in voxel-index units.
    pub position: [f64; 3],
    /// Launch direction (unit vector).
    pub direction: [f64; 3],
}

/// How concurrent photons share the fluence grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccumulationMode {
    /// Per-worker private grids merged at the end.
    #[default]
    ShadowGrids,
    /// One shared grid updated with atomic additions.
    Atomic,
}

impl SimulationConfig {
    /// Load from a JSON input deck and validate.
    pub fn from_file(path: &str) -> PhotonResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Structural validation beyond what serde enforces.
    pub fn validate(&self) -> PhotonResult<()> {
        let [nx, ny, nz] = self.grid_resolution;
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(PhotonError::ConfigError(format!(
                "grid_resolution must be non-zero on every axis, got [{nx}, {ny}, {nz}]"
            )));
        }
        if self.photons == 0 {
            return Err(PhotonError::ConfigError("photons must be >= 1".to_string()));
        }
        if self.totalmove == 0 {
            return Err(PhotonError::ConfigError(
                "totalmove must be >= 1".to_string(),
            ));
        }
        if !self.minstep.is_finite() || self.minstep <= 0.0 {
            return Err(PhotonError::ConfigError(format!(
                "minstep must be finite and > 0, got {}",
                self.minstep
            )));
        }
        if !self.lmax.is_finite() || self.lmax <= 0.0 {
            return Err(PhotonError::ConfigError(format!(
                "lmax must be finite and > 0, got {}",
                self.lmax
            )));
        }
        let d = self.source.direction;
        let norm = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
        if !norm.is_finite() || (norm - 1.0).abs() > 1e-6 {
            return Err(PhotonError::ConfigError(format!(
                "source.direction must be a unit vector, got norm {norm}"
            )));
        }
        if self.source.position.iter().any(|v| !v.is_finite()) {
            return Err(PhotonError::ConfigError(
                "source.position must be finite".to_string(),
            ));
        }
        // Delegates the per-entry checks and the vacuum-0 rule.
        self.material_table().map(|_| ())
    }

    /// Validated material table for the run.
    pub fn material_table(&self) -> PhotonResult<MaterialTable> {
        MaterialTable::new(self.materials.clone())
            .map_err(|e| PhotonError::ConfigError(e.to_string()))
    }
}
