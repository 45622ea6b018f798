// syn-kick -- a 909-style kick drum synthesizer
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! A 909-style kick drum: a sine oscillator swept from a high "thwack" down to
//! a low body frequency, shaped by a linear attack-decay envelope and topped
//! with a short click at the onset.

use super::envelope::{ramp_step, AttackDecay, Rise};
use super::oscillator::SineOscillator;
use crate::wave::SampleBuffer;

/// Length of the onset click in seconds.
pub const CLICK_DURATION: f64 = 0.0005;

/// Offset added to the oscillator output while the click is sounding.
pub const CLICK_OFFSET: f64 = 0.5;

/// The four knobs of the kick.
///
/// Each knob is meant to be turned between 0.0 and 1.0, but values outside that
/// range are not rejected. They simply extrapolate the formulas in [`KickTiming`],
/// e.g. a negative `attack` shortens the attack further and a large `tune` pushes
/// the body frequency above the usual 40-80 Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KickParams {
    /// Pitch of both the body and the initial transient.
    pub tune: f64,
    /// Length of the amplitude attack, from about 1 ms to about 6 ms.
    pub attack: f64,
    /// Length of the amplitude decay and the pitch sweep, from about 150 ms to about 450 ms.
    pub decay: f64,
    /// Output gain.
    pub level: f64,
}

impl KickParams {
    pub fn new(tune: f64, attack: f64, decay: f64, level: f64) -> Self {
        Self {
            tune,
            attack,
            decay,
            level,
        }
    }
}

/// Timing and frequencies derived from [`KickParams`] at a given sample rate.
///
/// ```
/// use syn_kick::synth::kick::*;
///
/// let timing = KickTiming::new(&KickParams::new(0.5, 0.0, 0.5, 1.0), 48000.0);
/// assert_eq!(timing.attack_samples, 48);
/// assert_eq!(timing.decay_samples, 14400);
/// assert_eq!(timing.click_samples, 24);
/// assert_eq!(timing.base_frequency, 60.0);
/// assert_eq!(timing.start_frequency, 400.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct KickTiming {
    /// Attack time in seconds.
    pub attack_time: f64,
    /// Decay time in seconds, also the duration of the pitch sweep.
    pub decay_time: f64,
    /// Frequency the pitch settles on.
    pub base_frequency: f64,
    /// Frequency the pitch sweep starts at.
    pub start_frequency: f64,
    pub attack_samples: usize,
    pub decay_samples: usize,
    pub click_samples: usize,
}

impl KickTiming {
    pub fn new(params: &KickParams, sample_rate: f64) -> Self {
        let attack_time = 0.001 + 0.005 * params.attack;
        let decay_time = 0.15 + 0.3 * params.decay;
        // `as` truncates towards zero and saturates, so negative durations end up as 0 samples.
        Self {
            attack_time,
            decay_time,
            base_frequency: 40.0 + 40.0 * params.tune,
            start_frequency: 300.0 + 200.0 * params.tune,
            attack_samples: (attack_time * sample_rate) as usize,
            decay_samples: (decay_time * sample_rate) as usize,
            click_samples: (CLICK_DURATION * sample_rate) as usize,
        }
    }

    /// Per-sample amplitude increment during the attack.
    pub fn attack_step(&self) -> f64 {
        ramp_step(self.attack_samples)
    }

    /// Per-sample amplitude decrement after the attack.
    pub fn decay_step(&self) -> f64 {
        ramp_step(self.decay_samples)
    }

    /// Per-sample increment of the pitch sweep.
    pub fn pitch_step(&self) -> f64 {
        ramp_step(self.decay_samples)
    }

    /// Oscillator frequency for a pitch envelope value between 0.0 (start) and 1.0 (settled).
    pub fn frequency(&self, pitch_envelope: f64) -> f64 {
        self.start_frequency * (1.0 - pitch_envelope) + self.base_frequency * pitch_envelope
    }
}

/// Endless stream of kick samples.
///
/// The stream never ends by itself; once the envelope has decayed it yields zeros.
/// Apart from the samples, the state of the envelopes after the most recent sample
/// can be inspected.
#[derive(Debug, Clone)]
pub struct KickVoice {
    timing: KickTiming,
    level: f64,
    amplitude: AttackDecay,
    pitch: Rise,
    oscillator: SineOscillator,
    frequency: f64,
    current_sample: usize,
}

impl KickVoice {
    pub fn new(params: KickParams, sample_rate: f64) -> Self {
        let timing = KickTiming::new(&params, sample_rate);
        Self {
            amplitude: AttackDecay::new(timing.attack_samples, timing.decay_samples),
            pitch: Rise::new(timing.decay_samples),
            oscillator: SineOscillator::new(sample_rate),
            frequency: timing.start_frequency,
            level: params.level,
            current_sample: 0,
            timing,
        }
    }

    pub fn timing(&self) -> &KickTiming {
        &self.timing
    }

    /// Number of samples generated so far.
    pub fn position(&self) -> usize {
        self.current_sample
    }

    /// Amplitude envelope applied to the most recent sample.
    pub fn amplitude(&self) -> f64 {
        self.amplitude.level()
    }

    /// Pitch envelope (0.0 at the start frequency, 1.0 at the base frequency)
    /// of the most recent sample.
    pub fn pitch_envelope(&self) -> f64 {
        self.pitch.level()
    }

    /// Oscillator frequency used for the most recent sample.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    fn sample(&mut self) -> f64 {
        let amplitude = self.amplitude.step();
        let pitch = self.pitch.step();
        self.frequency = self.timing.frequency(pitch);

        let mut value = self.oscillator.next_sample(self.frequency);
        if self.current_sample < self.timing.click_samples {
            value += CLICK_OFFSET;
        }
        self.current_sample = self.current_sample.saturating_add(1);

        // No clipping: the click and `level` may push the value outside of [-1, 1].
        value * (amplitude * self.level)
    }
}

impl Iterator for KickVoice {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.sample())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// Render `sample_count` samples of a kick at `sample_rate` samples per second.
///
/// This never fails and always yields exactly `sample_count` samples. Pathological
/// parameters degrade the sound. The samples stay finite as long as `sample_rate`
/// is positive and the resulting frequencies and `level` are far from the limits
/// of `f64`; otherwise the phase overflows and the output turns into NaN.
///
/// ```
/// use syn_kick::synth::kick::*;
///
/// let params = KickParams::new(0.5, 0.0, 0.5, 1.0);
/// let buffer = synthesize(params, 48000, 48000.0);
/// assert_eq!(buffer.len(), 48000);
/// assert_eq!(buffer, synthesize(params, 48000, 48000.0));
/// ```
pub fn synthesize(params: KickParams, sample_count: usize, sample_rate: f64) -> SampleBuffer {
    let mut buffer = SampleBuffer::new(sample_count);
    let filled = buffer.fill_from(KickVoice::new(params, sample_rate));
    debug_assert_eq!(filled, sample_count);
    buffer
}
