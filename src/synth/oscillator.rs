// syn-kick -- a 909-style kick drum synthesizer
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

use std::f64::consts::TAU;

/// A sine oscillator whose frequency may change from one sample to the next.
///
/// The phase is kept in radians. When an increment pushes it past 2π, 2π is
/// subtracted once; the phase is not reduced any further. That is exact as long
/// as a single increment stays below 2π, i.e. the frequency stays below the
/// sample rate.
#[derive(Debug, Clone)]
pub struct SineOscillator {
    sample_rate: f64,
    phase: f64,
}

impl SineOscillator {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            phase: 0.0,
        }
    }

    /// Current phase in radians, i.e. the phase of the next sample.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Sample the wave at the current phase, then advance by one sample at `frequency`.
    ///
    /// ```
    /// use syn_kick::synth::oscillator::SineOscillator;
    ///
    /// let mut osc = SineOscillator::new(4.0);
    /// assert_eq!(osc.next_sample(1.0), 0.0);
    /// assert!((osc.next_sample(1.0) - 1.0).abs() < 1e-12);
    /// ```
    pub fn next_sample(&mut self, frequency: f64) -> f64 {
        let value = self.phase.sin();
        self.phase += TAU * frequency / self.sample_rate;
        if self.phase > TAU {
            self.phase -= TAU;
        }
        value
    }
}
