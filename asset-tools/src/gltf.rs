use anyhow::{bail, ensure};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

const GLB_MAGIC: &[u8; 4] = b"glTF";
const CHUNK_JSON: u32 = 0x4E4F_534A; // "JSON"

#[derive(Debug, Deserialize)]
struct Gltf {
    #[serde(default)]
    meshes: Vec<Mesh>,
    #[serde(default)]
    materials: Vec<Value>,
    #[serde(default)]
    accessors: Vec<Accessor>,
}

#[derive(Debug, Deserialize)]
struct Mesh {
    #[serde(default)]
    primitives: Vec<Primitive>,
}

#[derive(Debug, Deserialize)]
struct Primitive {
    #[serde(default)]
    attributes: HashMap<String, usize>,
}

#[derive(Debug, Deserialize)]
struct Accessor {
    count: u64,
    #[serde(default)]
    min: Vec<f64>,
    #[serde(default)]
    max: Vec<f64>,
}

#[derive(Debug, PartialEq)]
pub struct ModelSummary {
    pub meshes: usize,
    pub primitives: usize,
    pub vertices: u64,
    pub materials: usize,
    // min/max over all POSITION accessors
    pub bounds: Option<([f64; 3], [f64; 3])>,
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} meshes, {} primitives, {} vertices, {} materials",
            self.meshes, self.primitives, self.vertices, self.materials
        )?;
        if let Some((min, max)) = self.bounds {
            write!(
                f,
                ", bounds [{:.3}, {:.3}, {:.3}]..[{:.3}, {:.3}, {:.3}]",
                min[0], min[1], min[2], max[0], max[1], max[2]
            )?;
        }
        Ok(())
    }
}

// Accepts either a binary .glb container or raw .gltf JSON
pub fn summarize(bytes: &[u8]) -> anyhow::Result<ModelSummary> {
    let json = if bytes.starts_with(GLB_MAGIC) {
        glb_json_chunk(bytes)?
    } else {
        bytes
    };

    let doc: Gltf = serde_json::from_slice(json)?;

    let mut primitives = 0usize;
    let mut vertices = 0u64;
    let mut bounds: Option<([f64; 3], [f64; 3])> = None;

    for mesh in &doc.meshes {
        for primitive in &mesh.primitives {
            primitives += 1;
            let Some(&index) = primitive.attributes.get("POSITION") else {
                continue;
            };
            let Some(accessor) = doc.accessors.get(index) else {
                bail!("primitive references missing accessor {}", index);
            };
            vertices += accessor.count;
            merge_bounds(&mut bounds, accessor);
        }
    }

    Ok(ModelSummary {
        meshes: doc.meshes.len(),
        primitives,
        vertices,
        materials: doc.materials.len(),
        bounds,
    })
}

fn merge_bounds(bounds: &mut Option<([f64; 3], [f64; 3])>, accessor: &Accessor) {
    if accessor.min.len() != 3 || accessor.max.len() != 3 {
        return;
    }
    let (min, max) = bounds.get_or_insert((
        [f64::INFINITY; 3],
        [f64::NEG_INFINITY; 3],
    ));
    for axis in 0..3 {
        min[axis] = min[axis].min(accessor.min[axis]);
        max[axis] = max[axis].max(accessor.max[axis]);
    }
}

// 12-byte header (magic, version, total length) then length-prefixed
// chunks; the JSON chunk is the glTF document itself.
fn glb_json_chunk(bytes: &[u8]) -> anyhow::Result<&[u8]> {
    ensure!(bytes.len() >= 12, "GLB shorter than its header");

    let version = read_u32(bytes, 4);
    ensure!(version == 2, "unsupported GLB version {}", version);

    let declared_len = read_u32(bytes, 8) as usize;
    ensure!(declared_len <= bytes.len(), "GLB truncated");

    let mut offset = 12;
    while offset + 8 <= declared_len {
        let chunk_len = read_u32(bytes, offset) as usize;
        let chunk_type = read_u32(bytes, offset + 4);
        let start = offset + 8;
        let end = start
            .checked_add(chunk_len)
            .filter(|end| *end <= declared_len)
            .ok_or_else(|| anyhow::anyhow!("GLB chunk overruns the file"))?;

        if chunk_type == CHUNK_JSON {
            return Ok(&bytes[start..end]);
        }
        offset = end;
    }

    bail!("GLB has no JSON chunk")
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(raw)
}
