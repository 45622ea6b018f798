// syn-kick -- a 909-style kick drum synthesizer
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Sample-exact linear ramps used for shaping amplitude and pitch.

/// Per-sample increment of a ramp spanning `samples` samples.
///
/// A ramp of zero samples completes in a single step.
pub fn ramp_step(samples: usize) -> f64 {
    if samples > 0 {
        1.0 / samples as f64
    } else {
        1.0
    }
}

/// A linear attack-decay envelope without a sustain phase.
///
/// During the first `attack_samples` steps the level rises by a constant
/// increment, capped at 1.0. Every later step lowers it by a constant
/// decrement, floored at 0.0. Which phase a step belongs to only depends on
/// the number of steps taken so far, not on the current level.
///
/// # Example
///
/// ```
/// use syn_kick::synth::envelope::*;
/// let mut env = AttackDecay::new(2, 4);
/// assert_eq!(env.step(), 0.5);
/// assert_eq!(env.step(), 1.0);
/// assert_eq!(env.step(), 0.75);
/// assert_eq!(env.step(), 0.5);
/// assert_eq!(env.step(), 0.25);
/// assert!(!env.faded());
/// assert_eq!(env.step(), 0.0);
/// assert!(env.faded());
/// assert_eq!(env.step(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct AttackDecay {
    attack_samples: usize,
    attack_step: f64,
    decay_step: f64,
    level: f64,
    current_sample: usize,
}

impl AttackDecay {
    pub fn new(attack_samples: usize, decay_samples: usize) -> Self {
        Self {
            attack_samples,
            attack_step: ramp_step(attack_samples),
            decay_step: ramp_step(decay_samples),
            level: 0.0,
            current_sample: 0,
        }
    }

    /// Called for every sample, returning the envelope gain at that sample.
    pub fn step(&mut self) -> f64 {
        if self.current_sample < self.attack_samples {
            self.level = (self.level + self.attack_step).min(1.0);
        } else {
            self.level = (self.level - self.decay_step).max(0.0);
        }
        self.current_sample = self.current_sample.saturating_add(1);
        self.level
    }

    /// Gain returned by the most recent `step`.
    pub fn level(&self) -> f64 {
        self.level
    }

    /// The envelope has faded when all subsequent `step` calls would return zero.
    pub fn faded(&self) -> bool {
        self.current_sample >= self.attack_samples && self.level == 0.0
    }
}

/// A linear ramp from 0.0 to 1.0 over `samples` steps, held at 1.0 afterwards.
///
/// The last step of the ramp lands exactly on 1.0, so accumulated rounding
/// cannot leave the held value a hair below it.
///
/// # Example
///
/// ```
/// use syn_kick::synth::envelope::*;
/// let mut ramp = Rise::new(4);
/// assert_eq!(ramp.step(), 0.25);
/// assert_eq!(ramp.step(), 0.5);
/// assert_eq!(ramp.step(), 0.75);
/// assert_eq!(ramp.step(), 1.0);
/// assert_eq!(ramp.step(), 1.0);
///
/// let mut instant = Rise::new(0);
/// assert_eq!(instant.step(), 0.0);
/// assert_eq!(instant.step(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Rise {
    samples: usize,
    step: f64,
    level: f64,
    current_sample: usize,
}

impl Rise {
    pub fn new(samples: usize) -> Self {
        Self {
            samples,
            step: ramp_step(samples),
            level: 0.0,
            current_sample: 0,
        }
    }

    pub fn step(&mut self) -> f64 {
        if self.current_sample < self.samples {
            self.current_sample += 1;
            self.level = if self.current_sample == self.samples {
                1.0
            } else {
                (self.level + self.step).min(1.0)
            };
        }
        self.level
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    /// Whether the ramp has reached its final value.
    pub fn finished(&self) -> bool {
        self.current_sample >= self.samples
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn degenerate_ramp_steps() {
        assert_eq!(ramp_step(0), 1.0);
        assert_eq!(ramp_step(1), 1.0);
        assert_eq!(ramp_step(4), 0.25);
    }

    #[test]
    fn instant_attack_decays_immediately() {
        let mut env = AttackDecay::new(0, 0);
        assert_eq!(env.step(), 0.0);
        assert!(env.faded());
    }

    #[test]
    fn single_step_attack_and_decay() {
        let mut env = AttackDecay::new(1, 0);
        assert_eq!(env.step(), 1.0);
        assert_eq!(env.step(), 0.0);
        assert_eq!(env.step(), 0.0);
    }

    #[test]
    fn attack_is_capped() {
        // 7 steps of 1/3 would overshoot without the cap
        let mut env = AttackDecay::new(3, 10);
        env.attack_samples = 7;
        for _ in 0..7 {
            let level = env.step();
            assert!(level <= 1.0);
        }
        assert_eq!(env.level(), 1.0);
    }

    #[test]
    fn attack_decay_bounds() {
        for &(attack, decay) in &[(48, 7200), (288, 21599), (3, 7), (0, 5)] {
            let mut env = AttackDecay::new(attack, decay);
            let mut previous = 0.0;
            for n in 0..(attack + decay + 10) {
                let level = env.step();
                assert!((0.0..=1.0).contains(&level));
                if n < attack {
                    assert!(level >= previous);
                } else {
                    assert!(level <= previous);
                }
                previous = level;
            }
            assert!(env.faded());
        }
    }

    #[test]
    fn rise_reaches_one_exactly() {
        // Summing 1/21599 that many times falls short of 1.0 in f64.
        for &samples in &[1, 7, 14400, 21599] {
            let mut ramp = Rise::new(samples);
            for _ in 0..samples {
                assert!(!ramp.finished());
                let level = ramp.step();
                assert!((0.0..=1.0).contains(&level));
            }
            assert!(ramp.finished());
            assert_eq!(ramp.level(), 1.0);
            assert_eq!(ramp.step(), 1.0);
        }
    }
}
