pub mod analyser;
pub mod context;
pub mod ring_buffer;
pub mod signal;
