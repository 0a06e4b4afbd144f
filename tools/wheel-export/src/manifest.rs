//! Manifest parsing and build orchestration
//!
//! Parses wheels.toml and generates every mesh artifact it lists.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use wheel_model::{Layout, MATERIAL_LIBRARY, generate, write_obj};

use crate::OBJ_EXT;

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub meshes: BTreeMap<String, MeshEntry>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Material library named by the `mtllib` line
    #[serde(default = "default_material_library")]
    pub material_library: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            material_library: default_material_library(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_material_library() -> String {
    MATERIAL_LIBRARY.to_string()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MeshEntry {
    Simple(String),
    Detailed { layout: String },
}

impl MeshEntry {
    pub fn layout_name(&self) -> &str {
        match self {
            MeshEntry::Simple(layout) => layout,
            MeshEntry::Detailed { layout } => layout,
        }
    }

    pub fn layout(&self) -> Result<Layout> {
        self.layout_name().parse().map_err(anyhow::Error::msg)
    }
}

impl Default for Manifest {
    /// The two standard artifacts: `wheel.obj` and `dual-wheel.obj`
    fn default() -> Self {
        let meshes = [Layout::Single, Layout::Dual]
            .into_iter()
            .map(|layout| {
                let name = layout
                    .default_file_name()
                    .trim_end_matches(&format!(".{OBJ_EXT}"))
                    .to_string();
                (name, MeshEntry::Simple(layout.name().to_string()))
            })
            .collect();
        Self {
            output: OutputConfig::default(),
            meshes,
        }
    }
}

/// One generated artifact
#[derive(Debug, Clone)]
pub struct BuiltMesh {
    pub name: String,
    pub path: PathBuf,
    pub layout: Layout,
    pub vertex_count: usize,
    pub normal_count: usize,
    pub face_count: usize,
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let manifest: Manifest = toml::from_str(&content)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))?;
    Ok(manifest)
}

/// Load `path` if given, else `wheels.toml` if present, else the default manifest
pub fn load_or_default(path: Option<&Path>) -> Result<Manifest> {
    match path {
        Some(path) => load_manifest(path),
        None => {
            let fallback = Path::new(crate::DEFAULT_MANIFEST);
            if fallback.exists() {
                load_manifest(fallback)
            } else {
                tracing::debug!("No {} found, using built-in manifest", crate::DEFAULT_MANIFEST);
                Ok(Manifest::default())
            }
        }
    }
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    if manifest.meshes.is_empty() {
        anyhow::bail!("Manifest lists no meshes");
    }
    if manifest.output.material_library.trim().is_empty() {
        anyhow::bail!("Material library name must not be empty");
    }
    for (name, entry) in &manifest.meshes {
        if name.is_empty() || name.contains(['/', '\\']) {
            anyhow::bail!("Invalid mesh name: {:?}", name);
        }
        entry
            .layout()
            .with_context(|| format!("Mesh '{}' has an invalid layout", name))?;
    }
    Ok(())
}

/// Build all meshes from a manifest
///
/// `only` restricts the build to a single mesh name.
pub fn build_all(
    manifest: &Manifest,
    output_override: Option<&Path>,
    only: Option<&str>,
) -> Result<Vec<BuiltMesh>> {
    validate(manifest)?;
    if let Some(only) = only {
        if !manifest.meshes.contains_key(only) {
            anyhow::bail!("Mesh '{}' is not listed in the manifest", only);
        }
    }

    let output_dir = output_override.unwrap_or(&manifest.output.dir);
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output dir: {:?}", output_dir))?;

    let mut built = Vec::new();
    for (name, entry) in &manifest.meshes {
        if only.is_some_and(|only| only != name) {
            continue;
        }
        let layout = entry.layout()?;
        let output = output_dir.join(format!("{}.{}", name, OBJ_EXT));
        tracing::info!("Generating mesh: {} ({}) -> {:?}", name, layout, output);

        let mesh = generate(layout).with_context(|| format!("Failed to generate '{}'", name))?;
        let file = File::create(&output)
            .with_context(|| format!("Failed to create output: {:?}", output))?;
        let mut writer = BufWriter::new(file);
        write_obj(&mesh, &mut writer, &manifest.output.material_library)
            .with_context(|| format!("Failed to write {:?}", output))?;

        tracing::info!(
            "Wrote {:?}: {} vertices, {} normals, {} faces",
            output,
            mesh.vertex_count(),
            mesh.normal_count(),
            mesh.face_count()
        );
        built.push(BuiltMesh {
            name: name.clone(),
            path: output,
            layout,
            vertex_count: mesh.vertex_count(),
            normal_count: mesh.normal_count(),
            face_count: mesh.face_count(),
        });
    }
    Ok(built)
}
