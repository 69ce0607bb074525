// ─────────────────────────────────────────────────────────────────────
// SCPN Photon Core — Medium Grid
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Dense voxel array of material IDs with out-of-bounds reads mapped
//! to vacuum, plus the 2-bit packed wire format used when a medium
//! holds at most four material types.

use ndarray::Array3;
use photon_types::constants::VACUUM_ID;
use photon_types::error::{PhotonError, PhotonResult};

/// Read-only voxelized medium, one material ID per voxel.
#[derive(Debug, Clone)]
pub struct MediumGrid {
    voxels: Array3<u8>,
}

impl MediumGrid {
    /// Grid filled with a single material.
    pub fn uniform(dims: [usize; 3], id: u8) -> Self {
        MediumGrid {
            voxels: Array3::from_elem((dims[0], dims[1], dims[2]), id),
        }
    }

    pub fn from_ids(voxels: Array3<u8>) -> Self {
        MediumGrid { voxels }
    }

    pub fn dims(&self) -> [usize; 3] {
        let (nx, ny, nz) = self.voxels.dim();
        [nx, ny, nz]
    }

    /// Material ID at integer voxel coordinates; anything outside the
    /// grid reads as vacuum.
    pub fn material_at(&self, i: i64, j: i64, k: i64) -> u8 {
        if i < 0 || j < 0 || k < 0 {
            return VACUUM_ID;
        }
        self.voxels
            .get((i as usize, j as usize, k as usize))
            .copied()
            .unwrap_or(VACUUM_ID)
    }

    /// Material ID of the voxel containing a continuous position.
    pub fn material_at_pos(&self, pos: [f64; 3]) -> u8 {
        self.material_at(
            pos[0].floor() as i64,
            pos[1].floor() as i64,
            pos[2].floor() as i64,
        )
    }

    pub fn set(&mut self, i: usize, j: usize, k: usize, id: u8) {
        self.voxels[(i, j, k)] = id;
    }

    /// Largest material ID present; the kernel checks it against the
    /// material table before a run.
    pub fn max_id(&self) -> u8 {
        self.voxels.iter().copied().max().unwrap_or(VACUUM_ID)
    }

    /// Pack into the 2-bit wire format: four voxels per byte, voxel
    /// n = i·ny·nz + j·nz + k at byte n/4, bit offset (n mod 4)·2.
    pub fn to_packed(&self) -> PhotonResult<Vec<u8>> {
        if self.max_id() > 3 {
            return Err(PhotonError::InvalidInput(format!(
                "packed media hold IDs 0-3, grid contains {}",
                self.max_id()
            )));
        }
        let total = self.voxels.len();
        let mut bytes = vec![0_u8; total.div_ceil(4)];
        for (n, &id) in self.voxels.iter().enumerate() {
            bytes[n / 4] |= id << ((n % 4) * 2);
        }
        Ok(bytes)
    }

    /// Decode the 2-bit wire format back into a dense grid.
    pub fn from_packed(dims: [usize; 3], bytes: &[u8]) -> PhotonResult<Self> {
        let total = dims[0] * dims[1] * dims[2];
        let expected = total.div_ceil(4);
        if bytes.len() != expected {
            return Err(PhotonError::InvalidInput(format!(
                "packed medium for {dims:?} needs {expected} bytes, got {}",
                bytes.len()
            )));
        }
        let mut voxels = Array3::zeros((dims[0], dims[1], dims[2]));
        for (n, cell) in voxels.iter_mut().enumerate() {
            *cell = (bytes[n / 4] >> ((n % 4) * 2)) & 0x3;
        }
        Ok(MediumGrid { voxels })
    }
}
