//! glTF 2.0 loader
//!
//! Loads `.gltf` and `.glb` files using the `gltf` crate. Only what
//! the configurator consumes is lifted out of the document: the node
//! hierarchy (with child order preserved), mesh primitives with
//! positions/normals/indices, and material base colors.

use super::{LoadError, LoadedMesh, LoadedNode, LoadedScene, LoadedTransform};
use atelier_core::Color;
use glam::{Quat, Vec3};
use std::path::Path;

/// glTF 2.0 loader
#[derive(Clone, Copy, Debug, Default)]
pub struct GltfLoader;

impl GltfLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a scene from a `.gltf`/`.glb` file
    pub fn load(&self, path: &Path) -> Result<LoadedScene, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let (document, buffers, _images) =
            gltf::import(path).map_err(|e| LoadError::Parse(e.to_string()))?;

        let mut scene = LoadedScene {
            name: path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("scene")
                .to_string(),
            ..Default::default()
        };

        // Mesh primitives, flattened in document order. `primitive_base`
        // maps a glTF mesh index to its first primitive's slot.
        let mut primitive_base = Vec::with_capacity(document.meshes().len());
        for mesh in document.meshes() {
            primitive_base.push(scene.meshes.len());
            for primitive in mesh.primitives() {
                scene
                    .meshes
                    .push(load_primitive(&mesh, &primitive, &buffers)?);
            }
        }
        let primitive_counts: Vec<usize> = document
            .meshes()
            .map(|m| m.primitives().len())
            .collect();

        // Hierarchy. glTF nodes are a flat indexed list, so the loaded
        // nodes can mirror the document indices directly.
        for node in document.nodes() {
            let (translation, rotation, scale) = node.transform().decomposed();
            let mesh_primitives = node
                .mesh()
                .map(|mesh| {
                    let base = primitive_base[mesh.index()];
                    (base..base + primitive_counts[mesh.index()]).collect()
                })
                .unwrap_or_default();
            scene.nodes.push(LoadedNode {
                name: node
                    .name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("node{}", node.index())),
                transform: LoadedTransform {
                    position: Vec3::from_array(translation),
                    rotation: Quat::from_array(rotation),
                    scale: Vec3::from_array(scale),
                },
                mesh_primitives,
                children: node.children().map(|c| c.index()).collect(),
            });
        }

        let gltf_scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or_else(|| LoadError::InvalidData("document contains no scene".into()))?;
        scene.root_nodes = gltf_scene.nodes().map(|n| n.index()).collect();

        tracing::debug!(
            name = %scene.name,
            nodes = scene.nodes.len(),
            meshes = scene.meshes.len(),
            vertices = scene.total_vertices(),
            "asset loaded"
        );
        Ok(scene)
    }
}

fn load_primitive(
    mesh: &gltf::Mesh<'_>,
    primitive: &gltf::Primitive<'_>,
    buffers: &[gltf::buffer::Data],
) -> Result<LoadedMesh, LoadError> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|b| &b.0[..]));

    let positions: Vec<Vec3> = reader
        .read_positions()
        .ok_or_else(|| LoadError::InvalidData("primitive has no positions".into()))?
        .map(Vec3::from_array)
        .collect();

    let mut normals: Vec<Vec3> = reader
        .read_normals()
        .map(|iter| iter.map(Vec3::from_array).collect())
        .unwrap_or_default();
    if !normals.is_empty() && normals.len() != positions.len() {
        tracing::warn!(
            mesh = mesh.name().unwrap_or("mesh"),
            normals = normals.len(),
            positions = positions.len(),
            "normal count mismatch, regenerating flat normals"
        );
        normals.clear();
    }

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        // Non-indexed primitive: synthesize a trivial index buffer.
        None => (0..positions.len() as u32).collect(),
    };
    if let Some(&max) = indices.iter().max() {
        if max as usize >= positions.len() {
            return Err(LoadError::InvalidData(format!(
                "primitive index {max} out of range for {} vertices",
                positions.len()
            )));
        }
    }

    let factor = primitive
        .material()
        .pbr_metallic_roughness()
        .base_color_factor();

    Ok(LoadedMesh {
        name: mesh.name().unwrap_or("mesh").to_string(),
        positions,
        normals,
        indices,
        base_color: Color::rgba(factor[0], factor[1], factor[2], factor[3]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    // Nodes-only document: a parent with three children in a fixed
    // order. Enough to exercise hierarchy and ordering without
    // binary buffers.
    const NODES_ONLY: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "sofa", "children": [1, 2, 3] },
            { "name": "frame" },
            { "name": "legs" },
            { "name": "seat" }
        ]
    }"#;

    // One triangle with an embedded buffer: three vertices in the XZ
    // plane, u16 indices [0, 1, 9] where 9 exceeds the vertex count.
    const BAD_INDICES: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "name": "bad", "mesh": 0 }],
        "meshes": [{
            "name": "bad",
            "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }]
        }],
        "accessors": [
            {
                "bufferView": 0, "componentType": 5126, "count": 3,
                "type": "VEC3", "min": [0, 0, 0], "max": [1, 0, 1]
            },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6 }
        ],
        "buffers": [{
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAAAAAAIA/AAABAAkA",
            "byteLength": 42
        }]
    }"#;

    #[test]
    fn missing_file_is_not_found() {
        let err = GltfLoader::new()
            .load(Path::new("/nonexistent/chair.gltf"))
            .unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.gltf");
        fs::write(&path, "{ not gltf").unwrap();
        let err = GltfLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn out_of_range_indices_are_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.gltf");
        fs::write(&path, BAD_INDICES).unwrap();
        let err = GltfLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, LoadError::InvalidData(_)));
    }

    #[test]
    fn hierarchy_preserves_child_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sofa.gltf");
        fs::write(&path, NODES_ONLY).unwrap();

        let scene = GltfLoader::new().load(&path).unwrap();
        assert_eq!(scene.name, "sofa");
        assert_eq!(scene.root_nodes, vec![0]);
        assert_eq!(scene.nodes[0].children, vec![1, 2, 3]);
        assert_eq!(scene.nodes[1].name, "frame");
        assert_eq!(scene.nodes[2].name, "legs");
        assert_eq!(scene.nodes[3].name, "seat");
        assert!(scene.meshes.is_empty());
    }
}
