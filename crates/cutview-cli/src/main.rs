//! cutview CLI - create and delete cut views in a JSON document
//!
//! The document's selection is set from the arguments, the command runs
//! against an in-memory workbench, and the document is written back.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cutview::{
    run, BoxSize, CutviewConfig, Dialogs, Host, Letter, Outcome, Workbench,
};
use cutview_ir::{Document, NodeData, NodeId, Shape};
use cutview_math::{Placement, Point3, Vec3};
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cutview")]
#[command(about = "Cut views of CAD assemblies", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cut every solid under an object with a box centered on a plane
    Create {
        /// Document file (.json)
        file: PathBuf,
        /// Assembly, body or group to cut (label or id)
        #[arg(long)]
        root: String,
        /// Cutting plane (label or id)
        #[arg(long)]
        plane: String,
        /// Box edge length: 500, 1000, 1500, 2000, 3000, 4000 or 5000
        #[arg(long, value_parser = parse_size)]
        size: Option<BoxSize>,
        /// Session letter (default: first free letter)
        #[arg(long, value_parser = parse_letter)]
        letter: Option<Letter>,
        /// Mark faces whose normal opposes the plane normal
        #[arg(long)]
        reversed: bool,
        /// Style and defaults (.toml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Where to write the result (default: overwrite the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete a cut-view group, its cuts, links and boxes
    Delete {
        /// Document file (.json)
        file: PathBuf,
        /// The Cut_{letter} group (label or id)
        #[arg(long)]
        group: String,
        /// Where to write the result (default: overwrite the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the object tree of a document
    Info {
        /// Document file (.json)
        file: PathBuf,
    },
    /// Write a sample assembly to try the other commands on
    Demo {
        /// Output file (.json)
        output: PathBuf,
    },
}

fn parse_letter(s: &str) -> std::result::Result<Letter, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Letter::try_from(c).map_err(|c| format!("'{c}' is not a letter A-Z")),
        _ => Err(format!("expected a single letter, got '{s}'")),
    }
}

fn parse_size(s: &str) -> std::result::Result<BoxSize, String> {
    s.parse::<BoxSize>().map_err(|e| e.to_string())
}

fn init_logging(verbose: u8) {
    let mut builder = Builder::from_default_env();
    builder.target(Target::Stderr);
    if verbose > 0 || std::env::var_os("RUST_LOG").is_none() {
        let level = match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        builder.filter(None, level);
    }
    builder.init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Create {
            file,
            root,
            plane,
            size,
            letter,
            reversed,
            config,
            output,
        } => {
            let mut config = match config {
                Some(path) => CutviewConfig::load(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => CutviewConfig::default(),
            };
            config.defaults.reversed |= reversed;
            let mut dialogs = ArgsDialogs { letter, size };
            let doc = load(&file)?;
            let selection = [resolve(&doc, &plane)?, resolve(&doc, &root)?];
            let doc = execute(doc, &selection, &mut dialogs, &config)?;
            save(&doc, output.as_deref().unwrap_or(&file))?;
        }
        Commands::Delete {
            file,
            group,
            output,
        } => {
            let doc = load(&file)?;
            let selection = [resolve(&doc, &group)?];
            let mut dialogs = ArgsDialogs {
                letter: None,
                size: None,
            };
            let doc = execute(doc, &selection, &mut dialogs, &CutviewConfig::default())?;
            save(&doc, output.as_deref().unwrap_or(&file))?;
        }
        Commands::Info { file } => {
            show_info(&file)?;
        }
        Commands::Demo { output } => {
            save(&demo_document()?, &output)?;
            println!("Wrote sample assembly to {}", output.display());
            println!(
                "Try: cutview create {} --root Assembly --plane XY_Plane",
                output.display()
            );
        }
    }

    Ok(())
}

/// Answers the dialogs from command-line arguments.
struct ArgsDialogs {
    letter: Option<Letter>,
    size: Option<BoxSize>,
}

impl Dialogs for ArgsDialogs {
    fn choose_letter(&mut self, suggested: Letter, _available: &[Letter]) -> Option<Letter> {
        Some(self.letter.unwrap_or(suggested))
    }

    fn choose_size(&mut self, default: BoxSize) -> Option<BoxSize> {
        Some(self.size.unwrap_or(default))
    }

    fn message(&mut self, text: &str) {
        eprintln!("{}", text);
    }

    fn reveal(&mut self, label: &str) {
        println!("Results filed under {}", label);
    }
}

fn load(path: &Path) -> Result<Document> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Document::from_json(&json).with_context(|| format!("parsing {}", path.display()))
}

fn save(doc: &Document, path: &Path) -> Result<()> {
    fs::write(path, doc.to_json()?).with_context(|| format!("writing {}", path.display()))
}

/// A node by id, or by its exact label.
fn resolve(doc: &Document, key: &str) -> Result<NodeId> {
    if let Ok(id) = key.parse::<NodeId>() {
        if doc.contains(id) {
            return Ok(id);
        }
    }
    match doc.find_by_label(key) {
        Some(id) => Ok(id),
        None => bail!("no object labeled or numbered '{}'", key),
    }
}

fn execute(
    doc: Document,
    selection: &[NodeId],
    dialogs: &mut ArgsDialogs,
    config: &CutviewConfig,
) -> Result<Document> {
    let mut wb = Workbench::with_document(doc);
    for &id in selection {
        wb.document_mut().select(id)?;
    }

    match run(&mut wb, dialogs, config)? {
        Outcome::Created(outcome) => {
            let doc = wb.document();
            println!(
                "Cut view {}: {} cut(s) from {} solid(s)",
                outcome.session.letter,
                outcome.results().len(),
                outcome.map.len()
            );
            for id in outcome.results() {
                println!("  {}", doc.label(id).unwrap_or("?"));
            }
            for diagnostic in &outcome.diagnostics {
                println!("  warning: {}", diagnostic);
            }
        }
        Outcome::Deleted(count) => println!("Deleted {} object(s)", count),
        Outcome::Cancelled => println!("Cancelled"),
        Outcome::Nothing => println!("Nothing to cut"),
    }
    Ok(wb.into_document())
}

fn show_info(file: &Path) -> Result<()> {
    let doc = load(file)?;

    println!("cutview document: {}", file.display());
    println!("  Version: {}", doc.version);
    println!("  Nodes: {}", doc.nodes.len());
    println!("  Top-level: {}", doc.roots.len());

    if !doc.roots.is_empty() {
        println!("\nTree:");
        for &root in &doc.roots {
            print_tree(&doc, root, 1);
        }
    }
    Ok(())
}

fn print_tree(doc: &Document, id: NodeId, depth: usize) {
    let Some(node) = doc.node(id) else {
        return;
    };
    let hidden = if node.view.visible { "" } else { " (hidden)" };
    println!(
        "{:indent$}{} [{:?} #{}]{}",
        "",
        node.label,
        node.kind(),
        id,
        hidden,
        indent = depth * 2
    );
    for &child in doc.members(id) {
        print_tree(doc, child, depth + 1);
    }
}

/// Two blocks either side of the YZ plane and a bolt, in an assembly, plus
/// the three principal planes.
fn demo_document() -> Result<Document> {
    let mut doc = Document::new();
    let assembly = doc.add("Assembly", NodeData::assembly());
    let blocks = [
        ("Left_Block", -2000.0, -100.0),
        ("Right_Block", 100.0, 2000.0),
    ];
    for (label, x0, x1) in blocks {
        let shape = Shape::cuboid(
            Point3::new(x0, -2000.0, -2000.0),
            Point3::new(x1, 2000.0, 2000.0),
        );
        doc.add_child(assembly, label, NodeData::body(shape))?;
    }
    let fasteners = doc.add_child(assembly, "Fasteners", NodeData::group())?;
    let bolt = Shape::cuboid(
        Point3::new(-150.0, -50.0, -300.0),
        Point3::new(150.0, 50.0, 300.0),
    );
    doc.add_child(fasteners, "Bolt", NodeData::body(bolt))?;

    let planes = [
        ("XY_Plane", Vec3::z()),
        ("XZ_Plane", Vec3::y()),
        ("YZ_Plane", Vec3::x()),
    ];
    for (label, normal) in planes {
        doc.add(
            label,
            NodeData::Plane {
                placement: Placement::from_normal(Point3::origin(), normal),
            },
        );
    }
    Ok(doc)
}
