//! uvkit CLI - UV flip/rotate, copy and wrap tool.
//!
//! Usage: uvkit <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `uvkit --help` for available commands.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use uvkit::algo::transfer::Strategy;
use uvkit::io;
use uvkit::mesh::{FaceId, HalfEdgeMesh};
use uvkit::ops::{
    CopyUvOptions, EditSession, FlipRotateOptions, FlipRotateUv, MeshObject, Mode,
    OperatorResult, PasteUvOptions, ReportLevel, TextureWrapOptions, TextureWrapRefer,
    TextureWrapSet, TextureWrapState, UvClipboard, UvMapSelection,
};

#[derive(Parser)]
#[command(name = "uvkit")]
#[command(author, version, about = "UV flip/rotate, copy and wrap CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh and UV information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Flip and/or rotate the UVs of faces in place
    FlipRotate {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Reverse each face's UV order
        #[arg(long)]
        flip: bool,

        /// Rotate each face's UVs by this many corners (0 to 30)
        #[arg(short, long, default_value = "0")]
        rotate: usize,

        /// Leave edge seams where they are
        #[arg(long)]
        no_seams: bool,

        /// Face indices to process (default: all faces)
        #[arg(long, value_delimiter = ',')]
        faces: Vec<usize>,
    },

    /// Copy UVs from one mesh onto another
    CopyUv {
        /// Mesh to copy UVs from
        source: PathBuf,

        /// Mesh to paste UVs onto
        target: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// How target faces pick their source face
        #[arg(short, long, value_enum, default_value = "one-to-one")]
        strategy: StrategyArg,

        /// Reverse each face's UV order
        #[arg(long)]
        flip: bool,

        /// Rotate each face's UVs by this many corners
        #[arg(short, long, default_value = "0")]
        rotate: usize,

        /// Leave edge seams where they are
        #[arg(long)]
        no_seams: bool,

        /// Source face indices (default: all faces)
        #[arg(long, value_delimiter = ',')]
        source_faces: Vec<usize>,

        /// Target face indices (default: all faces)
        #[arg(long, value_delimiter = ',')]
        target_faces: Vec<usize>,
    },

    /// Extend a face's UVs onto a chain of adjacent faces
    Wrap {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Face whose UV layout is extended
        #[arg(short, long)]
        reference: usize,

        /// Faces to wrap, each adjacent to the one before it
        #[arg(long, value_delimiter = ',', required = true)]
        faces: Vec<usize>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Face i takes source face i; face counts must match
    OneToOne,
    /// Face i takes source face i modulo the source count
    Broadcast,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::OneToOne => Strategy::OneToOne,
            StrategyArg::Broadcast => Strategy::Broadcast,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::FlipRotate {
            input,
            output,
            flip,
            rotate,
            no_seams,
            faces,
        } => {
            let options = FlipRotateOptions::new()
                .with_flip(flip)
                .with_rotate(rotate)
                .with_copy_seams(!no_seams);
            cmd_flip_rotate(&input, &output, options, &faces)?;
        }

        Commands::CopyUv {
            source,
            target,
            output,
            strategy,
            flip,
            rotate,
            no_seams,
            source_faces,
            target_faces,
        } => {
            let options = PasteUvOptions::new(UvMapSelection::Default)
                .with_strategy(strategy.into())
                .with_flip(flip)
                .with_rotate(rotate)
                .with_copy_seams(!no_seams)
                .with_only_selected(true);
            cmd_copy_uv(&source, &target, &output, options, &source_faces, &target_faces)?;
        }

        Commands::Wrap {
            input,
            output,
            reference,
            faces,
        } => {
            cmd_wrap(&input, &output, reference, &faces)?;
        }
    }

    Ok(())
}

/// Select the listed faces, or every face when the list is empty.
fn select_faces(mesh: &mut HalfEdgeMesh, faces: &[usize]) -> Result<(), Box<dyn std::error::Error>> {
    if faces.is_empty() {
        mesh.select_all();
        return Ok(());
    }

    mesh.deselect_all();
    for &f in faces {
        if f >= mesh.num_faces() {
            return Err(format!("face index {} out of range ({} faces)", f, mesh.num_faces()).into());
        }
        mesh.select_face(FaceId::new(f));
    }
    Ok(())
}

fn object_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh")
        .to_string()
}

fn print_reports(result: &OperatorResult) {
    for report in &result.reports {
        match report.level {
            ReportLevel::Info => println!("{}", report.message),
            ReportLevel::Warning => eprintln!("Warning: {}", report.message),
        }
    }
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: HalfEdgeMesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());
    println!("Edges: {}", mesh.num_edges());

    let mut valences: BTreeMap<usize, usize> = BTreeMap::new();
    for f in mesh.face_ids() {
        *valences.entry(mesh.face_vertex_count(f)).or_insert(0) += 1;
    }
    let histogram: Vec<String> = valences
        .iter()
        .map(|(valence, count)| format!("{}x{}", count, valence))
        .collect();
    println!("Face sizes: {}", histogram.join(", "));

    if mesh.is_triangle_mesh() {
        println!("Mesh type: Triangle mesh");
    } else if mesh.is_quad_mesh() {
        println!("Mesh type: Quad mesh");
    } else {
        println!("Mesh type: Mixed polygon mesh");
    }

    if let Some((min, max)) = mesh.bounding_box() {
        println!("Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z);
    }

    if !mesh.has_uv_layers() {
        println!("UV maps: none");
        return Ok(());
    }

    let active = mesh.active_uv_layer();
    println!("UV maps:");
    for id in mesh.uv_layer_ids() {
        let layer = mesh.uv_layer(id);
        let marker = if Some(id) == active { " (active)" } else { "" };
        let loops = mesh.face_ids().flat_map(|f| mesh.face_loops(f));
        match layer.bounding_box(loops) {
            Some((min, max)) => println!(
                "  {}{}: ({:.3}, {:.3}) to ({:.3}, {:.3})",
                layer.name(), marker, min.x, min.y, max.x, max.y
            ),
            None => println!("  {}{}", layer.name(), marker),
        }
    }

    Ok(())
}

fn cmd_flip_rotate(
    input: &Path,
    output: &Path,
    options: FlipRotateOptions,
    faces: &[usize],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh: HalfEdgeMesh = io::load(input)?;
    println!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());
    select_faces(&mut mesh, faces)?;

    let mut session = EditSession::new();
    let idx = session.add_object(MeshObject::new(object_name(input), mesh));
    session.select_only(idx);
    session.set_mode(Mode::Edit);

    println!("Flipping/rotating UVs (flip={}, rotate={}, seams={})...",
        options.flip, options.rotate, options.copy_seams);
    let start = Instant::now();
    let result = FlipRotateUv::new(options).execute(&mut session);
    let elapsed = start.elapsed();
    print_reports(&result);
    if !result.is_finished() {
        return Err("flip/rotate was cancelled".into());
    }

    let object = session.object(idx).ok_or("object missing from session")?;
    io::save(&object.mesh, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_copy_uv(
    source: &Path,
    target: &Path,
    output: &Path,
    options: PasteUvOptions,
    source_faces: &[usize],
    target_faces: &[usize],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut src_mesh: HalfEdgeMesh = io::load(source)?;
    let mut dest_mesh: HalfEdgeMesh = io::load(target)?;
    select_faces(&mut src_mesh, source_faces)?;
    select_faces(&mut dest_mesh, target_faces)?;

    let mut clipboard = UvClipboard::new();
    let copied = clipboard.copy(
        &src_mesh,
        &CopyUvOptions::default().with_only_selected(true),
    )?;
    println!("Copied: {} face(s) from {}", copied, source.display());

    if !dest_mesh.has_uv_layers() {
        dest_mesh.add_uv_layer(io::obj::UV_LAYER_NAME)?;
    }

    let start = Instant::now();
    let written = clipboard.paste(&mut dest_mesh, &options)?;
    let elapsed = start.elapsed();
    println!("Pasted: {} face(s) onto {}", written, target.display());

    io::save(&dest_mesh, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_wrap(
    input: &Path,
    output: &Path,
    reference: usize,
    faces: &[usize],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh: HalfEdgeMesh = io::load(input)?;
    println!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());
    select_faces(&mut mesh, &[reference])?;

    let mut session = EditSession::new();
    let idx = session.add_object(MeshObject::new(object_name(input), mesh));
    session.select_only(idx);
    session.set_mode(Mode::Edit);

    let mut state = TextureWrapState::new();
    let referred = TextureWrapRefer.execute(&session, &mut state);
    print_reports(&referred);
    if !referred.is_finished() {
        return Err("texture wrap refer was cancelled".into());
    }

    let object = session.object_mut(idx).ok_or("object missing from session")?;
    select_faces(&mut object.mesh, faces)?;

    let start = Instant::now();
    let options = TextureWrapOptions::new().with_selection_sequence(true);
    let result = TextureWrapSet::new(options).execute(&mut session, &mut state);
    let elapsed = start.elapsed();
    print_reports(&result);
    if !result.is_finished() {
        return Err("texture wrap set was cancelled".into());
    }
    println!("Wrapped: {} face(s)", faces.len());

    let object = session.object(idx).ok_or("object missing from session")?;
    io::save(&object.mesh, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}
