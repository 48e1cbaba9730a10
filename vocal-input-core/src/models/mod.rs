pub mod access;
pub mod assignment;
pub mod audio_models;
pub mod config;
pub mod constraints;
pub mod error;
pub mod readings;
pub mod state;
