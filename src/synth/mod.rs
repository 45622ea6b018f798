//! This namespace contains all the parts turning knob settings into wave data.

pub mod envelope;
pub mod kick;
pub mod oscillator;

pub use kick::{synthesize, KickParams, KickTiming, KickVoice};
