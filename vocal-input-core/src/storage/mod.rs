pub mod debug;
pub mod settings;
