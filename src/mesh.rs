use std::sync::Arc;

use vulkano::{
    buffer::{BufferUsage, CpuAccessibleBuffer},
    command_buffer::{AutoCommandBufferBuilder, PrimaryAutoCommandBuffer},
    memory::allocator::StandardMemoryAllocator,
};

use crate::error::MeshError;
use crate::vertex::Vertex;

/// The four-faced pyramid every scene object is drawn with.
pub const PYRAMID_VERTICES: [f32; 12] = [
    -1.0, -1.0, 0.0, //
    0.0, -1.0, 1.0, //
    1.0, -1.0, 0.0, //
    0.0, 1.0, 0.0,
];

pub const PYRAMID_INDICES: [u32; 12] = [
    0, 3, 1, //
    1, 3, 2, //
    2, 3, 0, //
    0, 1, 2,
];

/// Validated CPU-side geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Checks a flat `xyz` float list and a triangle index list.
    pub fn from_raw(vertices: &[f32], indices: &[u32]) -> Result<MeshData, MeshError> {
        if vertices.len() % 3 != 0 {
            return Err(MeshError::MalformedVertices(vertices.len()));
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::MalformedIndices(indices.len()));
        }
        if indices.is_empty() {
            return Err(MeshError::Empty);
        }

        let vertex_count = vertices.len() / 3;
        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= vertex_count)
        {
            return Err(MeshError::IndexOutOfRange {
                position,
                index,
                vertex_count,
            });
        }

        Ok(MeshData {
            vertices: Vertex::from_flat(vertices),
            indices: indices.to_vec(),
        })
    }

    pub fn pyramid() -> MeshData {
        MeshData {
            vertices: Vertex::from_flat(&PYRAMID_VERTICES),
            indices: PYRAMID_INDICES.to_vec(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

struct MeshBuffers {
    vertices: Arc<CpuAccessibleBuffer<[Vertex]>>,
    indices: Arc<CpuAccessibleBuffer<[u32]>>,
    index_count: u32,
}

/// Indexed triangle list living in GPU memory.
#[derive(Default)]
pub struct Mesh {
    buffers: Option<MeshBuffers>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the geometry and copies it into freshly allocated buffers.
    /// A previous upload is replaced.
    pub fn upload(
        &mut self,
        allocator: &StandardMemoryAllocator,
        vertices: &[f32],
        indices: &[u32],
    ) -> Result<(), MeshError> {
        let data = MeshData::from_raw(vertices, indices)?;
        self.upload_data(allocator, &data)
    }

    pub fn upload_data(
        &mut self,
        allocator: &StandardMemoryAllocator,
        data: &MeshData,
    ) -> Result<(), MeshError> {
        let vertices = CpuAccessibleBuffer::from_iter(
            allocator,
            BufferUsage {
                vertex_buffer: true,
                ..BufferUsage::empty()
            },
            false,
            data.vertices.iter().cloned(),
        )
        .map_err(|e| MeshError::Allocation(format!("{:?}", e)))?;

        let indices = CpuAccessibleBuffer::from_iter(
            allocator,
            BufferUsage {
                index_buffer: true,
                ..BufferUsage::empty()
            },
            false,
            data.indices.iter().cloned(),
        )
        .map_err(|e| MeshError::Allocation(format!("{:?}", e)))?;

        self.buffers = Some(MeshBuffers {
            vertices,
            indices,
            index_count: data.indices.len() as u32,
        });
        Ok(())
    }

    /// Records an indexed draw. A pipeline with a matching vertex layout must
    /// already be bound.
    pub fn draw(
        &self,
        commands: &mut AutoCommandBufferBuilder<PrimaryAutoCommandBuffer>,
    ) -> Result<(), MeshError> {
        let buffers = self.uploaded()?;
        commands
            .bind_vertex_buffers(0, buffers.vertices.clone())
            .bind_index_buffer(buffers.indices.clone())
            .draw_indexed(buffers.index_count, 1, 0, 0, 0)
            .map_err(|e| MeshError::Draw(format!("{:?}", e)))?;
        Ok(())
    }

    /// Frees the GPU buffers. Safe to call more than once.
    pub fn release(&mut self) {
        if self.buffers.take().is_some() {
            log::trace!("mesh buffers released");
        }
    }

    pub fn is_uploaded(&self) -> bool {
        self.buffers.is_some()
    }

    pub fn index_count(&self) -> u32 {
        self.buffers.as_ref().map_or(0, |b| b.index_count)
    }

    fn uploaded(&self) -> Result<&MeshBuffers, MeshError> {
        self.buffers.as_ref().ok_or(MeshError::NotUploaded)
    }
}
