//! wheel-export - truck wheel mesh generator
//!
//! Generates the single and dual wheel meshes (.obj) and converts them into
//! flattened per-corner mesh data (.json).

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use wheel_export::{flatten, manifest, obj};
use wheel_model::{Layout, MATERIAL_LIBRARY};

#[derive(Parser)]
#[command(name = "wheel-export")]
#[command(about = "Truck wheel mesh generator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate all meshes listed in a manifest
    Build {
        /// Path to wheels.toml manifest (built-in defaults if omitted and absent)
        manifest: Option<PathBuf>,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only generate the named mesh
        #[arg(long)]
        only: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Parse a generated mesh and report its counts
    Check {
        /// Input .obj file
        input: PathBuf,
    },

    /// Convert a mesh into flattened per-corner mesh data
    Flatten {
        /// Input .obj file
        input: PathBuf,

        /// Output .json file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write one mesh to stdout
    Dump {
        /// Wheel layout: single or dual
        #[arg(short, long, default_value = "single")]
        layout: Layout,

        /// Material library named by the mtllib line
        #[arg(short, long, default_value = MATERIAL_LIBRARY)]
        material_library: String,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            manifest,
            output,
            only,
            verbose,
        } => {
            if verbose {
                tracing::info!("Building meshes from {:?}", manifest);
            }
            let config = manifest::load_or_default(manifest.as_deref())?;
            let built = manifest::build_all(&config, output.as_deref(), only.as_deref())?;
            tracing::info!("Build complete! {} mesh(es) written", built.len());
        }

        Commands::Check { input } => {
            let mesh = obj::load_obj(&input)?;
            println!(
                "{}: {} vertices, {} normals, {} faces, {} material directives ({} materials)",
                input.display(),
                mesh.vertex_count(),
                mesh.normal_count(),
                mesh.face_count(),
                mesh.material_directives,
                mesh.materials.len()
            );
            if let Some(lib) = &mesh.material_library {
                println!("  mtllib {}", lib);
            }
        }

        Commands::Flatten { input, output } => {
            let output = output.unwrap_or_else(|| input.with_extension("json"));
            tracing::info!("Converting {:?} -> {:?}", input, output);
            flatten::convert_obj_to_json(&input, &output)?;
            tracing::info!("Done!");
        }

        Commands::Dump {
            layout,
            material_library,
        } => {
            let mesh = wheel_model::generate(layout)?;
            let stdout = std::io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            wheel_model::write_obj(&mesh, &mut writer, &material_library)?;
            writer.flush()?;
        }
    }

    Ok(())
}
