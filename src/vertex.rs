use bytemuck::{Pod, Zeroable};

/// Position-only vertex, bound at `location = 0`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
pub struct Vertex {
    pub position: [f32; 3],
}
vulkano::impl_vertex!(Vertex, position);

impl Vertex {
    /// Groups a flat float list into vertices. Trailing floats that do not
    /// complete a vertex are ignored.
    pub fn from_flat(floats: &[f32]) -> Vec<Vertex> {
        floats
            .chunks_exact(3)
            .map(|p| Vertex {
                position: [p[0], p[1], p[2]],
            })
            .collect()
    }
}
