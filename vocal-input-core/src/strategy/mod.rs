//! Built-in pitch detection strategies.

pub mod yin;

pub use yin::{detect_pitch, YinStrategy};
