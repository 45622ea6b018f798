// syn-kick -- a 909-style kick drum synthesizer
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The glue turning knob settings into a WAV file.

use std::io;

use log::{debug, info};
use snafu::{ensure, ResultExt, Snafu};

use crate::output::{self, wav, OutputError, Target};
use crate::synth::{synthesize, KickParams, KickTiming};

#[derive(Debug, Snafu)]
pub enum RenderError {
    #[snafu(display("Invalid duration {} seconds", duration))]
    InvalidDuration { duration: f64 },
    #[snafu(display("Sample rate must be positive"))]
    ZeroSampleRate,
    #[snafu(display("{}", source))]
    Output { source: OutputError },
    #[snafu(display("{}", source))]
    Wav { source: wav::WavError },
}

impl From<OutputError> for RenderError {
    fn from(source: OutputError) -> Self {
        RenderError::Output { source }
    }
}

/// How a kick is sampled.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// Samples per second.
    pub sample_rate: u32,
    /// Length of the rendered audio in seconds.
    pub duration: f64,
}

impl Default for RenderSettings {
    /// One second at 48 kHz.
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            duration: 1.0,
        }
    }
}

impl RenderSettings {
    /// Number of samples covering `duration`, rounded down.
    ///
    /// A sample rate of 0 Hz is rejected, since the oscillator divides by it.
    ///
    /// ```
    /// use syn_kick::render::RenderSettings;
    ///
    /// assert_eq!(RenderSettings::default().sample_count().unwrap(), 48000);
    /// let settings = RenderSettings { sample_rate: 44100, duration: 0.5 };
    /// assert_eq!(settings.sample_count().unwrap(), 22050);
    /// ```
    pub fn sample_count(&self) -> Result<usize, RenderError> {
        ensure!(self.sample_rate > 0, ZeroSampleRate);
        let duration = self.duration;
        ensure!(
            duration.is_finite() && duration >= 0.0,
            InvalidDuration { duration }
        );
        Ok((f64::from(self.sample_rate) * duration) as usize)
    }
}

/// Synthesize a kick and write it as a WAV file to `sink`.
///
/// Returns the number of samples written.
pub fn render_to<W: io::Write + ?Sized>(
    params: KickParams,
    settings: &RenderSettings,
    sink: &mut W,
) -> Result<usize, RenderError> {
    let sample_count = settings.sample_count()?;
    let sample_rate = f64::from(settings.sample_rate);
    debug!("{:?}", params);
    debug!("{:?}", KickTiming::new(&params, sample_rate));

    let buffer = synthesize(params, sample_count, sample_rate);
    wav::write_wav(sink, &buffer, settings.sample_rate).context(Wav)?;
    Ok(sample_count)
}

/// Synthesize a kick and write it as a WAV file to `target`.
pub fn render(
    params: KickParams,
    settings: &RenderSettings,
    target: Target,
) -> Result<usize, RenderError> {
    info!(
        "rendering {:.3} seconds at {} Hz to {}",
        settings.duration, settings.sample_rate, target
    );
    let sample_count = output::with_target(target, |sink| render_to(params, settings, sink))?;
    info!("wrote {} samples", sample_count);
    Ok(sample_count)
}
