use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// CPU mirror of the shader's transform block:
///
/// ```glsl
/// layout(set = 0, binding = 0) uniform Transforms {
///     mat4 model;
///     mat4 view;
///     mat4 projection;
/// };
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Transforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl Transforms {
    pub const SET: u32 = 0;
    pub const BINDING: u32 = 0;
    pub const MEMBERS: [&'static str; 3] = ["model", "view", "projection"];

    pub fn new() -> Transforms {
        Transforms {
            model: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }

    /// Writes a matrix at a resolved location. Locations are only handed out
    /// for members that lie inside the block.
    pub fn set(&mut self, location: UniformLocation, value: &Mat4) {
        let start = location.offset as usize;
        let bytes = bytemuck::bytes_of_mut(self);
        bytes[start..start + MAT4_SIZE].copy_from_slice(bytemuck::bytes_of(value));
    }
}

impl Default for Transforms {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) const MAT4_SIZE: usize = std::mem::size_of::<Mat4>();

/// Address of a named member of the transform block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation {
    set: u32,
    binding: u32,
    offset: u32,
}

impl UniformLocation {
    /// `offset` must leave room for a `mat4` inside [`Transforms`].
    pub(crate) fn new(set: u32, binding: u32, offset: u32) -> Option<UniformLocation> {
        let end = (offset as usize).checked_add(MAT4_SIZE)?;
        (end <= std::mem::size_of::<Transforms>()).then_some(UniformLocation {
            set,
            binding,
            offset,
        })
    }

    pub fn set(&self) -> u32 {
        self.set
    }

    pub fn binding(&self) -> u32 {
        self.binding
    }

    /// Byte offset inside the block.
    pub fn offset(&self) -> u32 {
        self.offset
    }
}

/// Uniform locations cached after a successful link.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformLocations {
    by_name: HashMap<&'static str, UniformLocation>,
}

impl UniformLocations {
    pub(crate) fn insert(&mut self, name: &'static str, location: UniformLocation) {
        self.by_name.insert(name, location);
    }

    pub fn get(&self, name: &str) -> Option<UniformLocation> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_name.clear();
    }
}
