// ─────────────────────────────────────────────────────────────────────
// SCPN Photon Core — Transport Kernel
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The data-parallel photon advancement loop. Each photon runs a fixed
//! number of micro-steps; one micro-step arms the next free flight
//! (with a Henyey-Greenstein turn once the photon has absorbed), walks
//! the medium by constant-length Cartesian jumps, and either deposits
//! the current weight or relaunches the photon from the source.
//!
//! The voxel walk deliberately skips exact face intersection: equal
//! jumps of `minstep` trade a small positional blur for bandwidth, and
//! reproduce the reference trajectories bitwise under a fixed RNG.

use std::f64::consts::PI;

use rayon::prelude::*;

use photon_types::config::{AccumulationMode, SimulationConfig};
use photon_types::constants::{FLIGHT_SENTINEL, MAX_THREAD};
use photon_types::error::{PhotonError, PhotonResult};
use photon_types::state::{MaterialTable, PhotonState};

use crate::fluence::{AtomicFluence, FluenceGrid};
use crate::medium::MediumGrid;
use crate::rng::PhotonRng;
use crate::source::PhotonSource;

/// Runtime knobs of a transport run.
#[derive(Debug, Clone, Copy)]
pub struct KernelSettings {
    /// Micro-steps per photon before it retires.
    pub totalmove: u32,
    /// Cartesian jump length per voxel step.
    pub minstep: f64,
    /// Residual free-flight cap triggering relaunch.
    pub lmax: f64,
    /// Base RNG seed.
    pub seed: u32,
    pub accumulation: AccumulationMode,
}

impl KernelSettings {
    pub fn from_config(config: &SimulationConfig) -> Self {
        KernelSettings {
            totalmove: config.totalmove,
            minstep: config.minstep,
            lmax: config.lmax,
            seed: config.seed,
            accumulation: config.accumulation,
        }
    }
}

/// Aggregated counters over all photons of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Photons launched (excluding relaunches).
    pub photons: u64,
    /// Boundary / cap relaunches across the population.
    pub relaunches: u64,
    /// Scattering events across the population, relaunched segments
    /// included.
    pub total_scatters: u64,
    /// Photons ending the run with a broken invariant (non-unit or
    /// non-finite direction, non-positive weight).
    pub invariant_violations: u64,
}

impl RunSummary {
    fn combine(&mut self, other: &RunSummary) {
        self.photons += other.photons;
        self.relaunches += other.relaunches;
        self.total_scatters += other.total_scatters;
        self.invariant_violations += other.invariant_violations;
    }

    fn tally(&mut self, outcome: &PhotonOutcome) {
        self.photons += 1;
        self.relaunches += outcome.state.relaunches as u64;
        self.total_scatters += outcome.scatters;
        if !outcome.state.is_consistent() {
            self.invariant_violations += 1;
        }
    }
}

/// Final state of one photon plus its whole-history scatter count.
#[derive(Debug, Clone, Copy)]
pub struct PhotonOutcome {
    pub state: PhotonState,
    pub scatters: u64,
}

/// Fluence grid and counters produced by [`TransportKernel::run`].
#[derive(Debug)]
pub struct RunOutput {
    pub fluence: FluenceGrid,
    pub summary: RunSummary,
}

/// Cosine of the Henyey-Greenstein scattering angle for anisotropy `g`
/// and a uniform draw `u`. The closed form is singular at g = 0, which
/// falls back to uniform sampling.
pub fn henyey_greenstein_cosine(g: f64, u: f64) -> f64 {
    if g != 0.0 {
        let frac = (1.0 - g * g) / (1.0 - g + 2.0 * g * u);
        ((1.0 + g * g - frac * frac) / (2.0 * g)).clamp(-1.0, 1.0)
    } else {
        2.0 * u - 1.0
    }
}

/// Azimuthal/polar direction update about the current axis.
pub fn rotate_direction(dir: &mut [f64; 3], cos_theta: f64, phi: f64) {
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let [dx, dy, dz] = *dir;

    if dz.abs() < 1.0 {
        let horiz = (1.0 - dz * dz).sqrt();
        dir[0] = sin_theta * (dx * dz * cos_phi - dy * sin_phi) / horiz + dx * cos_theta;
        dir[1] = sin_theta * (dy * dz * cos_phi + dx * sin_phi) / horiz + dy * cos_theta;
        dir[2] = -sin_theta * horiz * cos_phi + dz * cos_theta;
    } else {
        // Degenerate axis: any azimuth serves as the reference frame.
        dir[0] = sin_theta * cos_phi;
        dir[1] = sin_theta * sin_phi;
        dir[2] = cos_theta * dz.signum();
    }
}

/// Immutable description of one transport run.
pub struct TransportKernel {
    medium: MediumGrid,
    materials: MaterialTable,
    source: PhotonSource,
    settings: KernelSettings,
}

impl TransportKernel {
    pub fn new(
        medium: MediumGrid,
        materials: MaterialTable,
        source: PhotonSource,
        settings: KernelSettings,
    ) -> PhotonResult<Self> {
        let max_id = medium.max_id();
        if !materials.contains(max_id) {
            return Err(PhotonError::InvalidInput(format!(
                "medium references material {max_id} but the table has {} entries",
                materials.len()
            )));
        }
        if settings.totalmove == 0 {
            return Err(PhotonError::InvalidInput(
                "totalmove must be >= 1".to_string(),
            ));
        }
        if !(settings.minstep > 0.0) || !(settings.lmax > 0.0) {
            return Err(PhotonError::InvalidInput(format!(
                "minstep and lmax must be positive, got {} and {}",
                settings.minstep, settings.lmax
            )));
        }
        Ok(TransportKernel {
            medium,
            materials,
            source,
            settings,
        })
    }

    /// Assemble a kernel from a validated input deck plus the medium
    /// loaded alongside it.
    pub fn from_config(config: &SimulationConfig, medium: MediumGrid) -> PhotonResult<Self> {
        config.validate()?;
        let materials = config.material_table()?;
        let source = PhotonSource::from_config(&config.source)?;
        Self::new(medium, materials, source, KernelSettings::from_config(config))
    }

    pub fn settings(&self) -> &KernelSettings {
        &self.settings
    }

    fn outside(&self, pos: [f64; 3]) -> bool {
        let [nx, ny, nz] = self.medium.dims();
        pos[0] < 0.0
            || pos[1] < 0.0
            || pos[2] < 0.0
            || pos[0] >= nx as f64
            || pos[1] >= ny as f64
            || pos[2] >= nz as f64
    }

    /// Advance photon `index` through all its micro-steps, streaming
    /// deposits into `deposit`.
    fn simulate_photon<F: FnMut([usize; 3], f64)>(
        &self,
        index: u64,
        mut deposit: F,
    ) -> PhotonOutcome {
        let mut rng = PhotonRng::for_photon(self.settings.seed, index);
        let mut photon = self.source.launch();
        let mut scatters = 0_u64;

        for _ in 0..self.settings.totalmove {
            // 1. Scatter decision: the scheduled flight is consumed.
            if photon.residual <= 0.0 {
                photon.residual = -rng.uniform_open01().ln();
                // Weight below 1 means the photon has propagated
                // already; the very first flight leaves the source
                // direction untouched.
                if photon.weight < 1.0 {
                    let mat = self.materials.get(self.medium.material_at_pos(photon.pos));
                    let phi = 2.0 * PI * rng.uniform_open01();
                    let cos_theta = henyey_greenstein_cosine(mat.g, rng.uniform_open01());
                    rotate_direction(&mut photon.dir, cos_theta, phi);
                    photon.nscatter += 1;
                    scatters += 1;
                }
            }

            // 2. Voxel step at the local optical properties.
            let mat = self.materials.get(self.medium.material_at_pos(photon.pos));
            let delta = self.settings.minstep * mat.mus;
            if delta > photon.residual {
                // Scattering event lands inside this voxel.
                let s = photon.residual / mat.mus;
                photon.pos[0] += s * photon.dir[0];
                photon.pos[1] += s * photon.dir[1];
                photon.pos[2] += s * photon.dir[2];
                photon.weight *= (-mat.mua * s).exp();
                photon.pathlen += s;
                photon.residual = FLIGHT_SENTINEL;
            } else {
                photon.pos[0] += self.settings.minstep * photon.dir[0];
                photon.pos[1] += self.settings.minstep * photon.dir[1];
                photon.pos[2] += self.settings.minstep * photon.dir[2];
                photon.weight *= (-mat.mua * self.settings.minstep).exp();
                photon.residual -= delta;
                photon.pathlen += self.settings.minstep;
            }

            // 3. Boundary / cap, else deposit. The step that completes
            // a flight (sentinel residual) deposits nothing.
            if photon.residual > self.settings.lmax || self.outside(photon.pos) {
                photon.relaunch(self.source.position, self.source.direction);
            } else if photon.residual > 0.0 {
                let voxel = [
                    photon.pos[0].floor() as usize,
                    photon.pos[1].floor() as usize,
                    photon.pos[2].floor() as usize,
                ];
                deposit(voxel, photon.weight);
            }
        }

        PhotonOutcome {
            state: photon,
            scatters,
        }
    }

    /// Sequential single-photon run, depositing into `grid`. Pins down
    /// individual trajectories independent of worker scheduling.
    pub fn simulate_photon_into(&self, index: u64, grid: &mut FluenceGrid) -> PhotonOutcome {
        self.simulate_photon(index, |voxel, w| grid.deposit(voxel, w))
    }

    /// Run the full population, parallel over blocks of `MAX_THREAD`
    /// photons.
    pub fn run(&self, photons: u64) -> PhotonResult<RunOutput> {
        if photons == 0 {
            return Err(PhotonError::InvalidInput(
                "photon population must be >= 1".to_string(),
            ));
        }
        match self.settings.accumulation {
            AccumulationMode::ShadowGrids => Ok(self.run_shadow(photons)),
            AccumulationMode::Atomic => Ok(self.run_atomic(photons)),
        }
    }

    fn blocks(photons: u64) -> Vec<std::ops::Range<u64>> {
        let size = MAX_THREAD as u64;
        (0..photons.div_ceil(size))
            .map(|b| b * size..((b + 1) * size).min(photons))
            .collect()
    }

    fn run_shadow(&self, photons: u64) -> RunOutput {
        let dims = self.medium.dims();
        let (fluence, summary) = Self::blocks(photons)
            .into_par_iter()
            .fold(
                || (FluenceGrid::zeros(dims), RunSummary::default()),
                |(mut grid, mut summary), block| {
                    for index in block {
                        let outcome =
                            self.simulate_photon(index, |voxel, w| grid.deposit(voxel, w));
                        summary.tally(&outcome);
                    }
                    (grid, summary)
                },
            )
            .reduce(
                || (FluenceGrid::zeros(dims), RunSummary::default()),
                |(mut ga, mut sa), (gb, sb)| {
                    ga.merge(&gb);
                    sa.combine(&sb);
                    (ga, sa)
                },
            );
        RunOutput { fluence, summary }
    }

    fn run_atomic(&self, photons: u64) -> RunOutput {
        let shared = AtomicFluence::zeros(self.medium.dims());
        let summary = Self::blocks(photons)
            .into_par_iter()
            .map(|block| {
                let mut summary = RunSummary::default();
                for index in block {
                    let outcome =
                        self.simulate_photon(index, |voxel, w| shared.add(voxel, w));
                    summary.tally(&outcome);
                }
                summary
            })
            .reduce(RunSummary::default, |mut a, b| {
                a.combine(&b);
                a
            });
        RunOutput {
            fluence: shared.into_grid(),
            summary,
        }
    }
}
