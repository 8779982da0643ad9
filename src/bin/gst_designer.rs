//! CLI: build, compile and export pipeline documents.
//!
//! Usage:
//!   `gst_designer new <KIND>... [--set NODE.KEY=VALUE]... [--guess-format] [-o pipeline.json]`
//!   `gst_designer compile <DOCUMENT>`
//!   `gst_designer export <DOCUMENT> [--snippet NAME]... [-o OUT]`
//!   `gst_designer kinds`
//!
//! Logs go to stderr; stdout carries only the requested output.
//! Set RUST_LOG=streamweave_gst_designer=trace for span enter/exit events.

use clap::{Parser, Subcommand};
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use streamweave_gst_designer::document::{DocumentMetadata, ExportOptions};
use streamweave_gst_designer::document_io::{
  DOCUMENT_FILENAME, load_document, save_document, to_json,
};
use streamweave_gst_designer::types::ConfigValue;
use streamweave_gst_designer::{
  NodeKind, PipelineGraph, PortDirection, SnippetKind, compile, export_document,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

const DEFAULT_CREATED_BY: &str = "gst_designer";

/// Design GStreamer pipelines as typed node graphs.
#[derive(Parser, Debug)]
#[command(name = "gst_designer")]
#[command(after_help = r#"Environment variables (override flags when set):
  GST_DESIGNER_CREATED_BY   Author recorded in exported document metadata.

Examples:
  gst_designer new camera_source h264_encoder rtmp_sink --set h264_encoder_1.bitrate=2500
  gst_designer compile pipeline.json
  gst_designer export pipeline.json --snippet python -o out.json"#)]
struct Args {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create a document from a linear chain of node kinds.
  New {
    /// Node kinds in chain order; consecutive nodes are connected port 0 to port 0.
    #[arg(value_name = "KIND", required = true)]
    kinds: Vec<NodeKind>,

    /// Configuration override as NODE_ID.KEY=VALUE (repeatable).
    #[arg(long = "set", value_name = "NODE.KEY=VALUE")]
    sets: Vec<String>,

    /// Pick each file source's format from its path extension when left at auto-detect.
    #[arg(long)]
    guess_format: bool,

    /// Author recorded in metadata. Overridden by GST_DESIGNER_CREATED_BY if set.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_CREATED_BY)]
    created_by: String,

    /// Output document path.
    #[arg(short, long, value_name = "PATH", default_value = DOCUMENT_FILENAME)]
    output: PathBuf,
  },

  /// Print the pipeline description compiled from a document.
  Compile {
    #[arg(value_name = "DOCUMENT")]
    document: PathBuf,
  },

  /// Re-export a document with fresh pipeline, snippets and metadata.
  Export {
    #[arg(value_name = "DOCUMENT")]
    document: PathBuf,

    /// Snippet to include (repeatable). Default: all.
    #[arg(long = "snippet", value_name = "NAME")]
    snippets: Vec<SnippetKind>,

    /// Author recorded in metadata. Overridden by GST_DESIGNER_CREATED_BY if set.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_CREATED_BY)]
    created_by: String,

    /// Output path. Default: stdout.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
  },

  /// List node kinds with their ports and configuration fields.
  Kinds,
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
    .with_writer(io::stderr)
    .init();

  let args = Args::parse();
  info!(command = ?args.command, "gst_designer starting");

  let result = match args.command {
    Command::New {
      kinds,
      sets,
      guess_format,
      created_by,
      output,
    } => run_new(
      &kinds,
      &sets,
      guess_format,
      &created_by_from_env(created_by),
      &output,
    ),
    Command::Compile { document } => run_compile(&document),
    Command::Export {
      document,
      snippets,
      created_by,
      output,
    } => run_export(
      &document,
      snippets,
      &created_by_from_env(created_by),
      output.as_deref(),
    ),
    Command::Kinds => {
      print_kinds();
      Ok(())
    }
  };

  if let Err(e) = result {
    eprintln!("Error: {}", e);
    process::exit(1);
  }
}

/// Env var wins over the flag. This is the value used by the program.
fn created_by_from_env(flag: String) -> String {
  env::var("GST_DESIGNER_CREATED_BY").ok().unwrap_or(flag)
}

fn run_new(
  kinds: &[NodeKind],
  sets: &[String],
  guess_format: bool,
  created_by: &str,
  output: &Path,
) -> Result<(), String> {
  let mut graph = PipelineGraph::new();
  let ids: Vec<String> = kinds.iter().map(|k| graph.create_node(*k)).collect();
  for pair in ids.windows(2) {
    graph
      .add_edge(&pair[0], 0, &pair[1], 0)
      .map_err(|e| e.to_string())?;
  }
  for raw in sets {
    let (node_id, key, raw_value) = parse_set(raw)?;
    let value = match graph.node(node_id).and_then(|n| n.kind().field(key)) {
      Some(field) => field.constraint.parse_literal(raw_value),
      None => ConfigValue::parse_literal(raw_value),
    };
    graph
      .set_config(node_id, key, value)
      .map_err(|e| e.to_string())?;
  }
  if guess_format {
    for id in &ids {
      if let Some(format) = graph.guess_format(id).map_err(|e| e.to_string())? {
        info!(node_id = %id, format, "format picked from file extension");
      }
    }
  }

  let options = ExportOptions {
    metadata: Some(DocumentMetadata::new(created_by)),
    ..ExportOptions::default()
  };
  let doc = export_document(&graph, &options).map_err(|e| e.to_string())?;
  save_document(output, &doc).map_err(|e| format!("writing {}: {}", output.display(), e))?;
  info!(path = %output.display(), node_count = graph.len(), "document written");
  println!("{}", doc.pipeline);
  Ok(())
}

fn run_compile(document: &Path) -> Result<(), String> {
  let graph = load_graph(document)?;
  let pipeline = compile(&graph).map_err(|e| e.to_string())?;
  println!("{}", pipeline);
  Ok(())
}

fn run_export(
  document: &Path,
  snippets: Vec<SnippetKind>,
  created_by: &str,
  output: Option<&Path>,
) -> Result<(), String> {
  let graph = load_graph(document)?;
  let options = ExportOptions {
    snippets: if snippets.is_empty() {
      SnippetKind::ALL.to_vec()
    } else {
      snippets
    },
    metadata: Some(DocumentMetadata::new(created_by)),
  };
  let doc = export_document(&graph, &options).map_err(|e| e.to_string())?;
  match output {
    Some(path) => {
      save_document(path, &doc).map_err(|e| format!("writing {}: {}", path.display(), e))?;
      info!(path = %path.display(), "document written");
    }
    None => println!("{}", to_json(&doc).map_err(|e| e.to_string())?),
  }
  Ok(())
}

fn load_graph(path: &Path) -> Result<PipelineGraph, String> {
  let doc = load_document(path).map_err(|e| format!("reading {}: {}", path.display(), e))?;
  PipelineGraph::from_document(&doc).map_err(|e| e.to_string())
}

/// Splits `NODE_ID.KEY=VALUE`. Node ids never contain a dot (see `PipelineGraph::add_node`).
fn parse_set(raw: &str) -> Result<(&str, &str, &str), String> {
  let (target, value) = raw
    .split_once('=')
    .ok_or_else(|| format!("invalid --set '{}': expected NODE.KEY=VALUE", raw))?;
  let (node_id, key) = target
    .split_once('.')
    .filter(|(n, k)| !n.is_empty() && !k.is_empty())
    .ok_or_else(|| format!("invalid --set '{}': expected NODE.KEY=VALUE", raw))?;
  Ok((node_id, key, value))
}

fn print_kinds() {
  for kind in NodeKind::ALL {
    let ports = |d: PortDirection| {
      kind
        .port_types(d)
        .iter()
        .map(|t| t.id)
        .collect::<Vec<_>>()
        .join(",")
    };
    println!(
      "{} ({}) in=[{}] out=[{}]",
      kind,
      kind.role(),
      ports(PortDirection::Input),
      ports(PortDirection::Output)
    );
    for field in kind.fields() {
      println!("  {} = {}  # {}", field.key, field.default, field.label);
    }
  }
}
