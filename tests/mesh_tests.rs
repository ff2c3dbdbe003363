use insanity::error::MeshError;
use insanity::mesh::{Mesh, MeshData, PYRAMID_INDICES, PYRAMID_VERTICES};
use insanity::vertex::Vertex;

#[cfg(test)]
mod mesh_data_tests {
    use super::*;

    #[test]
    fn test_pyramid_is_valid() {
        let data = MeshData::from_raw(&PYRAMID_VERTICES, &PYRAMID_INDICES).expect("valid pyramid");
        assert_eq!(data.vertices.len(), 4);
        assert_eq!(data.triangle_count(), 4);
        assert_eq!(data, MeshData::pyramid());
        assert_eq!(data.vertices[3], Vertex { position: [0.0, 1.0, 0.0] });
    }

    #[test]
    fn test_index_out_of_range_is_rejected() {
        let vertices = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let err = MeshData::from_raw(&vertices, &[0, 1, 3]).unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOutOfRange {
                position: 2,
                index: 3,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn test_partial_vertex_is_rejected() {
        let err = MeshData::from_raw(&[0.0, 1.0, 2.0, 3.0], &[0, 0, 0]).unwrap_err();
        assert_eq!(err, MeshError::MalformedVertices(4));
    }

    #[test]
    fn test_partial_triangle_is_rejected() {
        let err = MeshData::from_raw(&PYRAMID_VERTICES, &[0, 1]).unwrap_err();
        assert_eq!(err, MeshError::MalformedIndices(2));
    }

    #[test]
    fn test_empty_index_list_is_rejected() {
        let err = MeshData::from_raw(&PYRAMID_VERTICES, &[]).unwrap_err();
        assert_eq!(err, MeshError::Empty);
    }

    #[test]
    fn test_from_flat_groups_triples() {
        let vertices = Vertex::from_flat(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(
            vertices,
            vec![
                Vertex { position: [1.0, 2.0, 3.0] },
                Vertex { position: [4.0, 5.0, 6.0] },
            ]
        );
    }
}

#[cfg(test)]
mod mesh_lifecycle_tests {
    use super::*;

    #[test]
    fn test_new_mesh_is_not_uploaded() {
        let mesh = Mesh::new();
        assert!(!mesh.is_uploaded());
        assert_eq!(mesh.index_count(), 0);
    }

    #[test]
    fn test_release_without_upload_is_safe() {
        let mut mesh = Mesh::new();
        mesh.release();
        mesh.release();
        assert!(!mesh.is_uploaded());
    }
}
