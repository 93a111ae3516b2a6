//! CPAL voice backend (feature `device`).
//!
//! Each voice owns its own output stream. The stream renders the buffer
//! from the requested offset, resampling by linear interpolation to the
//! device rate with the playback rate folded into the step size.

use crate::voice::{Voice, VoiceBackend, VoiceRequest};
use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::time::Instant;

/// Wrapper to hold `cpal::Stream` in a `Send` context.
///
/// # Safety
/// `cpal::Stream` is `!Send` due to platform internals. The stream is only
/// touched through the voice slot, which serializes access behind a mutex.
struct StreamHandle(cpal::Stream);

unsafe impl Send for StreamHandle {}

/// Backend that plays voices on a CPAL output device.
pub struct CpalBackend {
    origin: Instant,
    device_index: Option<usize>,
}

impl CpalBackend {
    /// Use the output device at `device_index`, or the host default.
    pub fn new(device_index: Option<usize>) -> Result<Self> {
        let device = get_device(device_index)?;
        tracing::info!(device = %device.name().unwrap_or_default(), "using output device");
        Ok(Self {
            origin: Instant::now(),
            device_index,
        })
    }

    pub fn device_name(&self) -> Result<String> {
        Ok(get_device(self.device_index)?.name()?)
    }

    /// Output devices of the default host, as `"index: name"`.
    pub fn list_output_devices() -> Result<Vec<String>> {
        cpal::default_host()
            .output_devices()?
            .enumerate()
            .map(|(i, d)| Ok(format!("{i}: {}", d.name()?)))
            .collect()
    }
}

impl VoiceBackend for CpalBackend {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    fn start(&self, request: VoiceRequest) -> Result<Box<dyn Voice>> {
        let device = get_device(self.device_index)?;
        let config = device.default_output_config()?;

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config.into(), request)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config.into(), request)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config.into(), request)?,
            format => {
                return Err(Error::DeviceStartFailure(format!(
                    "Unsupported sample format: {format:?}"
                )));
            }
        };

        stream.play()?;
        Ok(Box::new(CpalVoice {
            stream: Some(StreamHandle(stream)),
        }))
    }

    fn name(&self) -> &str {
        "cpal"
    }
}

struct CpalVoice {
    stream: Option<StreamHandle>,
}

impl Voice for CpalVoice {
    fn stop(&mut self) {
        if let Some(StreamHandle(stream)) = self.stream.take() {
            if let Err(e) = stream.pause() {
                tracing::warn!(error = %e, "failed to pause stream");
            }
        }
    }
}

fn get_device(index: Option<usize>) -> Result<cpal::Device> {
    let host = cpal::default_host();

    match index {
        Some(i) => {
            let devices: Vec<_> = host.output_devices()?.collect();
            let count = devices.len();
            devices.into_iter().nth(i).ok_or_else(|| {
                Error::InvalidDevice(format!("Device index {i} out of range ({count} available)"))
            })
        }
        None => host
            .default_output_device()
            .ok_or_else(|| Error::InvalidDevice("No output device available".into())),
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    request: VoiceRequest,
) -> Result<cpal::Stream>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = (config.channels as usize).max(1);
    let VoiceRequest {
        buffer,
        offset,
        rate,
        notifier,
    } = request;

    let source_rate = buffer.sample_rate() as f64;
    let step = rate * source_rate / config.sample_rate.0 as f64;
    let end = buffer.len() as f64;
    let mut frame = offset * source_rate;

    let end_notifier = notifier.clone();
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for out in data.chunks_mut(channels) {
                let value = if frame < end {
                    T::from_sample(buffer.sample_at(frame))
                } else {
                    T::from_sample(0.0f32)
                };
                out.fill(value);
                frame += step;
            }
            if frame >= end {
                end_notifier.ended();
            }
        },
        move |err| {
            notifier.failed(err.to_string());
        },
        None,
    )?;

    Ok(stream)
}
