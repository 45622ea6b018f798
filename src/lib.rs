// modules for making sounds
pub mod synth;
pub mod wave;

// Getting sounds out
pub mod output;
pub mod render;
