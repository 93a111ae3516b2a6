//! Container formats.

pub mod wav;

pub use wav::{encode_wav, export_wav_file, float_to_i16, WAV_HEADER_LEN};
