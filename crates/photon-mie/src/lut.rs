// ─────────────────────────────────────────────────────────────────────
// SCPN Photon Core — Mueller LUT Serialization
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Wire format of the precomputed look-up tables consumed by polarized
//! transport: for each (size parameter, index) pair, one record per
//! sampled cosine holding (S11, S12, S33, S43) as little-endian f32.

use std::io::Write;

use photon_types::error::PhotonResult;

use crate::table::MuellerTable;

/// Serialize one Mueller table: `len()` records of four LE f32 each.
pub fn write_table<W: Write>(out: &mut W, table: &MuellerTable) -> PhotonResult<()> {
    for k in 0..table.len() {
        for v in [table.s11[k], table.s12[k], table.s33[k], table.s43[k]] {
            out.write_all(&(v as f32).to_le_bytes())?;
        }
    }
    Ok(())
}

/// Serialize the full LUT, one table per (size parameter, index) pair,
/// in the order given.
pub fn write_lut<W: Write>(out: &mut W, tables: &[MuellerTable]) -> PhotonResult<()> {
    for table in tables {
        write_table(out, table)?;
    }
    Ok(())
}
