// ─────────────────────────────────────────────────────────────────────
// SCPN Photon Core — Fluence Accumulator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The shared fluence grid. Two accumulation strategies with the same
//! observable sum: per-worker shadow grids merged at the end, or one
//! grid of atomic cells updated in place. Float additions commute only
//! approximately, so reduction order shifts the result by O(eps);
//! callers comparing runs use a relative tolerance.

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::Array3;
use photon_types::error::PhotonResult;

/// Accumulated energy deposition, one cell per medium voxel.
#[derive(Debug, Clone)]
pub struct FluenceGrid {
    data: Array3<f64>,
}

impl FluenceGrid {
    pub fn zeros(dims: [usize; 3]) -> Self {
        FluenceGrid {
            data: Array3::zeros((dims[0], dims[1], dims[2])),
        }
    }

    pub fn dims(&self) -> [usize; 3] {
        let (nx, ny, nz) = self.data.dim();
        [nx, ny, nz]
    }

    pub fn deposit(&mut self, voxel: [usize; 3], weight: f64) {
        self.data[(voxel[0], voxel[1], voxel[2])] += weight;
    }

    pub fn at(&self, voxel: [usize; 3]) -> f64 {
        self.data[(voxel[0], voxel[1], voxel[2])]
    }

    /// Add another grid cell by cell (shadow-grid reduction).
    pub fn merge(&mut self, other: &FluenceGrid) {
        self.data.zip_mut_with(&other.data, |a, &b| *a += b);
    }

    pub fn total(&self) -> f64 {
        self.data.sum()
    }

    pub fn as_array(&self) -> &Array3<f64> {
        &self.data
    }

    /// Largest per-cell relative difference against another grid.
    pub fn max_relative_difference(&self, other: &FluenceGrid) -> f64 {
        let mut worst = 0.0_f64;
        for (&a, &b) in self.data.iter().zip(other.data.iter()) {
            let scale = a.abs().max(b.abs());
            if scale > 0.0 {
                worst = worst.max((a - b).abs() / scale);
            }
        }
        worst
    }

    /// Raw dump: little-endian IEEE-754 f32, x-major then y then z
    /// (index = i·ny·nz + j·nz + k).
    pub fn write_to<W: Write>(&self, out: &mut W) -> PhotonResult<()> {
        for &v in self.data.iter() {
            out.write_all(&(v as f32).to_le_bytes())?;
        }
        Ok(())
    }
}

/// Shared fluence grid for the atomic accumulation mode: f64 cell
/// values stored as bits in `AtomicU64`, added with compare-exchange.
pub struct AtomicFluence {
    dims: [usize; 3],
    cells: Vec<AtomicU64>,
}

impl AtomicFluence {
    pub fn zeros(dims: [usize; 3]) -> Self {
        let total = dims[0] * dims[1] * dims[2];
        let mut cells = Vec::with_capacity(total);
        cells.resize_with(total, || AtomicU64::new(0.0_f64.to_bits()));
        AtomicFluence { dims, cells }
    }

    fn linear(&self, voxel: [usize; 3]) -> usize {
        (voxel[0] * self.dims[1] + voxel[1]) * self.dims[2] + voxel[2]
    }

    /// Race-free additive deposit from any worker.
    pub fn add(&self, voxel: [usize; 3], weight: f64) {
        let cell = &self.cells[self.linear(voxel)];
        let mut current = cell.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(current) + weight).to_bits();
            match cell.compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }
    }

    /// Unwrap into a plain grid once all workers are done.
    pub fn into_grid(self) -> FluenceGrid {
        let dims = self.dims;
        let values: Vec<f64> = self
            .cells
            .into_iter()
            .map(|c| f64::from_bits(c.into_inner()))
            .collect();
        FluenceGrid {
            data: Array3::from_shape_vec((dims[0], dims[1], dims[2]), values)
                .expect("cell count matches dims by construction"),
        }
    }
}
