//! Centralized error type for the monovox umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] monovox_core::Error),

    #[error(transparent)]
    Voice(#[from] monovox_voice::Error),

    #[error("Export: {0}")]
    Export(#[from] monovox_export::ExportError),
}

pub type Result<T> = std::result::Result<T, Error>;
