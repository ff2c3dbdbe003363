use std::path::PathBuf;

use thiserror::Error;

use crate::shader::ShaderStage;

/// Fatal startup failures. Each variant maps to its own process exit code.
#[derive(Error, Debug)]
pub enum InitError {
    #[error("Failed to load vulkan library or create instance: {0}")]
    Instance(String),

    #[error("Failed to create window: {0}")]
    Window(String),

    #[error("Failed to create logical device: {0}")]
    Device(String),

    #[error("No physical device supports the required extension: {0}")]
    MissingExtension(&'static str),

    #[error("Failed to create render targets: {0}")]
    RenderTarget(String),

    #[error("Shader program: {0}")]
    Shader(#[from] ShaderError),

    #[error("Mesh: {0}")]
    Mesh(#[from] MeshError),
}

impl InitError {
    pub fn exit_code(&self) -> i32 {
        match self {
            InitError::Device(_) => 1,
            InitError::MissingExtension(_) => 2,
            InitError::Instance(_) => 3,
            InitError::Window(_) => 4,
            InitError::Shader(_) => 5,
            InitError::RenderTarget(_) => 6,
            InitError::Mesh(_) => 7,
        }
    }
}

#[derive(Error, Debug)]
pub enum ShaderError {
    #[error("Failed to read shader source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("GLSL compiler is not available")]
    CompilerUnavailable,

    #[error("Compile error ({stage}): {log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("Failed to create {stage} shader module: {reason}")]
    Module { stage: ShaderStage, reason: String },

    #[error("Entry point `main` missing from {0} shader")]
    MissingEntryPoint(ShaderStage),

    #[error("Link error: {0}")]
    Link(String),

    #[error("Validate error: {0}")]
    Validate(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MeshError {
    #[error("Vertex data has {0} floats, expected a multiple of 3")]
    MalformedVertices(usize),

    #[error("Index data has {0} entries, expected a multiple of 3")]
    MalformedIndices(usize),

    #[error("Index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("Mesh has no triangles")]
    Empty,

    #[error("Failed to allocate mesh buffer: {0}")]
    Allocation(String),

    #[error("Mesh drawn before upload")]
    NotUploaded,

    #[error("Failed to record draw: {0}")]
    Draw(String),
}

/// Per-frame failures. The frame is dropped and the loop keeps going.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Failed to acquire swapchain image: {0}")]
    Acquire(String),

    #[error("Failed to allocate uniform buffer: {0}")]
    Uniform(String),

    #[error("Failed to record commands: {0}")]
    Record(String),

    #[error("Shader program: {0}")]
    Shader(#[from] ShaderError),

    #[error("Mesh: {0}")]
    Mesh(#[from] MeshError),
}
