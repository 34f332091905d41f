use reef_core::{
    ApplyOptions, BlockTypeDefinition, CanvasOutput, Direction, EdgeTypeDefinition, Engine,
    EngineOptions, Size,
};
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Reef(reef_core::Error),
    Json(serde_json::Error),
    PatchInvalid(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Reef(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::PatchInvalid(msg) => write!(f, "Invalid patch: {msg}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<reef_core::Error> for CliError {
    fn from(value: reef_core::Error) -> Self {
        Self::Reef(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Parse,
    Patch,
}

impl FromStr for Command {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "layout" => Ok(Self::Layout),
            "parse" => Ok(Self::Parse),
            "patch" => Ok(Self::Patch),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    graph: Option<String>,
    types: Option<String>,
    direction: Option<Direction>,
    extent_parent: bool,
    pretty: bool,
    out: Option<String>,
}

const USAGE: &str = "Usage: reef <command> [options] [input]\n\n\
Commands:\n\
  layout   Compile a canvas document to positioned graph JSON (default)\n\
  parse    Parse a canvas document to semantic-tree JSON (no layout)\n\
  patch    Apply a patch script to a graph snapshot (--graph required)\n\n\
Options:\n\
  --graph <file>      Graph JSON produced by `reef layout` (patch only)\n\
  --types <file>      Extra block/edge type definitions (JSON)\n\
  --direction <dir>   Direction for patch-created edges (LR|RL|TB|BT)\n\
  --extent-parent     Constrain zone children to their parent's bounds\n\
  --pretty            Pretty-print the JSON output\n\
  -o, --out <file>    Write output to a file instead of stdout\n\n\
Reads the input from a path, or from stdin when the path is `-` or omitted.";

fn parse_args() -> Result<Args, CliError> {
    let mut args = Args::default();
    let mut raw = std::env::args().skip(1).peekable();

    if let Some(first) = raw.peek() {
        if let Ok(command) = first.parse::<Command>() {
            args.command = command;
            raw.next();
        }
    }

    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--graph" => args.graph = raw.next(),
            "--types" => args.types = raw.next(),
            "--direction" => {
                let value = raw
                    .next()
                    .ok_or(CliError::Usage("--direction requires a value"))?;
                args.direction = Some(
                    value
                        .parse()
                        .map_err(|_| CliError::Usage("--direction must be LR, RL, TB or BT"))?,
                );
            }
            "--extent-parent" => args.extent_parent = true,
            "--pretty" => args.pretty = true,
            "-o" | "--out" => args.out = raw.next(),
            "-h" | "--help" => return Err(CliError::Usage(USAGE)),
            _ if args.input.is_none() => args.input = Some(arg),
            _ => return Err(CliError::Usage("Unexpected extra argument; see --help")),
        }
    }

    Ok(args)
}

/// Extra type definitions loaded from `--types`. Validators cannot be
/// expressed in JSON; definitions deserialize without them.
#[derive(Debug, Default, Deserialize)]
struct TypesFile {
    #[serde(default, rename = "blockTypes")]
    block_types: Vec<BlockTypeDefinition>,
    #[serde(default, rename = "edgeTypes")]
    edge_types: Vec<EdgeTypeDefinition>,
}

fn build_engine(args: &Args) -> Result<Engine, CliError> {
    let mut engine = Engine::with_options(EngineOptions {
        default_extent: args
            .extent_parent
            .then_some(reef_core::Extent::Parent),
    });

    engine.register_block_type(BlockTypeDefinition::new("shape", Size::new(160.0, 80.0)))?;
    engine.register_block_type(BlockTypeDefinition::new("text", Size::new(200.0, 60.0)))?;
    engine
        .register_block_type(BlockTypeDefinition::new("zone", Size::new(300.0, 200.0)).group())?;

    if let Some(path) = &args.types {
        let text = std::fs::read_to_string(path)?;
        let types: TypesFile = serde_json::from_str(&text)?;
        for definition in types.block_types {
            engine.register_block_type(definition)?;
        }
        for definition in types.edge_types {
            engine.register_edge_type(definition)?;
        }
    }

    Ok(engine)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        Some(path) if path != "-" => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn write_output(args: &Args, value: &serde_json::Value) -> Result<(), CliError> {
    let rendered = if args.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    match &args.out {
        Some(path) => std::fs::write(path, rendered + "\n")?,
        None => println!("{rendered}"),
    }
    Ok(())
}

fn run() -> Result<(), CliError> {
    let args = parse_args()?;
    let engine = build_engine(&args)?;
    let text = read_input(args.input.as_deref())?;

    let value = match args.command {
        Command::Parse => serde_json::to_value(engine.parse(&text)?)?,
        Command::Layout => serde_json::to_value(engine.parse_and_layout(&text)?)?,
        Command::Patch => {
            let graph_path = args
                .graph
                .as_deref()
                .ok_or(CliError::Usage("patch requires --graph <file>"))?;
            let snapshot: CanvasOutput = serde_json::from_str(&std::fs::read_to_string(graph_path)?)?;

            let ops = engine.parse_patch(&text)?;
            let current: Vec<String> = snapshot.nodes.iter().map(|n| n.id.clone()).collect();
            let validation = engine.validate_patch(&ops, &current);
            if !validation.valid {
                let messages: Vec<String> = validation
                    .errors
                    .iter()
                    .map(|e| e.message.clone())
                    .collect();
                return Err(CliError::PatchInvalid(messages.join("; ")));
            }

            let direction = args.direction.unwrap_or(snapshot.metadata.direction);
            let patched = engine.apply_patch(
                &ops,
                snapshot.nodes,
                snapshot.edges,
                &ApplyOptions::new(direction),
            )?;
            serde_json::to_value(patched)?
        }
    };

    write_output(&args, &value)
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
