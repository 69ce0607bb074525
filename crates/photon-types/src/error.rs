// ─────────────────────────────────────────────────────────────────────
// SCPN Photon Core — Error
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotonError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unvalidated regime: {0}")]
    Unvalidated(String),

    #[error("Continued fraction did not converge after {iterations} iterations: {message}")]
    ConvergenceFailure { iterations: usize, message: String },

    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PhotonResult<T> = Result<T, PhotonError>;
