pub mod app;
pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod mesh;
pub mod setup;
pub mod shader;
pub mod uniforms;
pub mod vertex;
