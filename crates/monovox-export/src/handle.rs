//! Non-blocking export handle with polling.

use crate::format::wav::encode_wav;
use crate::{ExportError, Result};
use monovox_core::{Arc, SampleBuffer, TaskHandle};

/// Status of a background export operation.
#[derive(Debug)]
pub enum ExportStatus {
    /// Export is still serializing.
    Pending,
    /// Export completed; the WAV bytes are ready.
    Complete(Vec<u8>),
    /// Export failed.
    Failed(ExportError),
}

/// Handle to a background WAV export.
///
/// The buffer is shared, not copied, so playback of the same buffer keeps
/// going while the export runs.
///
/// # Example
/// ```ignore
/// let mut export = ExportJob::spawn(buffer.clone())?;
///
/// // Poll each frame
/// loop {
///     session.pump();
///     match export.poll() {
///         ExportStatus::Complete(bytes) => { save(bytes); break; }
///         ExportStatus::Failed(e) => { eprintln!("Error: {}", e); break; }
///         ExportStatus::Pending => {}
///     }
/// }
/// ```
pub struct ExportJob {
    task: TaskHandle<Result<Vec<u8>>>,
    finished: bool,
}

impl ExportJob {
    /// Start serializing `buffer` on a worker thread.
    pub fn spawn(buffer: Arc<SampleBuffer>) -> Result<Self> {
        let task = TaskHandle::spawn("export", move || encode_wav(&buffer))?;
        Ok(Self {
            task,
            finished: false,
        })
    }

    /// Poll for the export result (non-blocking).
    ///
    /// Returns `Complete` or `Failed` exactly once; later calls report
    /// `Failed` with an `InvalidData` error.
    pub fn poll(&mut self) -> ExportStatus {
        if self.finished {
            return ExportStatus::Failed(ExportError::InvalidData(
                "export result already taken".into(),
            ));
        }
        match self.task.try_take() {
            None => ExportStatus::Pending,
            Some(result) => {
                self.finished = true;
                match result {
                    Ok(Ok(bytes)) => ExportStatus::Complete(bytes),
                    Ok(Err(e)) => ExportStatus::Failed(e),
                    Err(e) => ExportStatus::Failed(e.into()),
                }
            }
        }
    }

    /// Block until the export finishes and return the bytes.
    pub fn wait(self) -> Result<Vec<u8>> {
        self.task.wait()?
    }

    /// Check if the export has finished (non-blocking).
    pub fn is_done(&self) -> bool {
        self.finished || self.task.is_done()
    }
}
