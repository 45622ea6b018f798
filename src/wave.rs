// syn-kick -- a 909-style kick drum synthesizer
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! This is the namespace for all parts dealing with data in sampled waves.

/// A fixed-length buffer holding mono floating point audio data.
///
/// Samples are nominally in `[-1.0, 1.0]`, but nothing enforces that here.
/// Clipping is left to whoever turns the samples into a concrete format.
///
/// ```
/// use syn_kick::wave::SampleBuffer;
///
/// let mut buffer = SampleBuffer::new(4);
/// assert_eq!(buffer.len(), 4);
/// buffer.samples_mut()[1] = 0.5;
/// assert_eq!(buffer.samples(), &[0.0, 0.5, 0.0, 0.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f64>,
}

impl SampleBuffer {
    /// Create a silent buffer of `sample_count` samples.
    pub fn new(sample_count: usize) -> Self {
        Self {
            samples: vec![0.0; sample_count],
        }
    }

    /// Size of the buffer in samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Mutable access to the samples. The length of the buffer cannot change through this.
    pub fn samples_mut(&mut self) -> &mut [f64] {
        &mut self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.samples.iter()
    }

    /// Overwrite the buffer with consecutive samples of `source`.
    ///
    /// Returns the number of samples that were actually filled.
    /// Might be less than the length of the buffer if the source ran dry.
    pub fn fill_from<I: Iterator<Item = f64>>(&mut self, source: I) -> usize {
        let mut filled = 0;
        for (target, sample) in self.samples.iter_mut().zip(source) {
            *target = sample;
            filled += 1;
        }
        filled
    }
}

impl From<Vec<f64>> for SampleBuffer {
    fn from(samples: Vec<f64>) -> Self {
        Self { samples }
    }
}
