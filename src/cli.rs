use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, ValueEnum};

use crate::config::{load_config, load_token_defs};
use crate::dump::{GraphDump, write_graph_dump};
use crate::error::LayoutError;
use crate::ir::{LayoutType, Node, NodeKind, Size};
use crate::layout::apply_layout_with;
use crate::parser::parse;
use crate::serializer::serialize;

#[derive(Parser, Debug)]
#[command(name = "mmk", version, about = "Markdown outline to mind-map graph tool")]
pub struct Args {
    /// Input outline (.md) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// What to emit
    #[arg(short = 'e', long = "emit", value_enum, default_value = "graph")]
    pub emit: EmitKind,

    /// Layout override (radial/horizontal); defaults to the document directive
    #[arg(short = 'l', long = "layout")]
    pub layout: Option<String>,

    /// Layout config JSON/JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Style token definitions JSON/JSON5 file; resolved styles join the dump
    #[arg(short = 't', long = "tokensFile")]
    pub tokens: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum EmitKind {
    /// Parsed nodes and edges, unpositioned
    Graph,
    /// Nodes with estimated sizes run through the layout engine
    Layout,
    /// The outline serialized back to text (round-trip normalization)
    Text,
}

pub fn run() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let input = read_input(args.input.as_deref())?;
    let parsed = parse(&input)?;
    let layout = match args.layout.as_deref() {
        Some(name) => LayoutType::from_token(name).ok_or(LayoutError::InvalidLayoutType)?,
        None => parsed.layout,
    };
    let token_defs = args.tokens.as_deref().map(load_token_defs).transpose()?;

    let mut out: Box<dyn Write> = match args.output.as_deref() {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };

    match args.emit {
        EmitKind::Text => {
            let text = serialize(&parsed.nodes, &parsed.edges, layout)?;
            out.write_all(text.as_bytes())?;
        }
        EmitKind::Graph => {
            let dump = GraphDump::from_graph(&parsed.nodes, &parsed.edges, layout, token_defs.as_ref());
            write_graph_dump(&mut out, &dump)?;
            out.write_all(b"\n")?;
        }
        EmitKind::Layout => {
            let config = load_config(args.config.as_deref())?;
            let measured = estimate_sizes(&parsed.nodes);
            let placed = apply_layout_with(&measured, &parsed.edges, layout, &config)?;
            let dump = GraphDump::from_graph(&placed, &parsed.edges, layout, token_defs.as_ref());
            write_graph_dump(&mut out, &dump)?;
            out.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

// Stand-in for the renderer's measurement obligation: character-count
// estimates, deterministic and good enough to exercise the layout engine.
const CHAR_WIDTH: f32 = 7.4;
const LINE_HEIGHT: f32 = 16.0;
const LABEL_PADDING_X: f32 = 16.0;
const LABEL_PADDING_Y: f32 = 12.0;

fn estimate_sizes(nodes: &[Node]) -> Vec<Node> {
    nodes
        .iter()
        .cloned()
        .map(|mut node| {
            node.measured_size = Some(estimate_node_size(&node));
            node
        })
        .collect()
}

fn estimate_node_size(node: &Node) -> Size {
    match &node.kind {
        NodeKind::Image { .. } => Size {
            width: 160.0,
            height: 120.0,
        },
        NodeKind::Code { .. } => {
            let lines = node.content.lines().count().max(1) as f32;
            let widest = node
                .content
                .lines()
                .map(|line| line.chars().count())
                .max()
                .unwrap_or(0)
                .max(8) as f32;
            Size {
                width: widest * CHAR_WIDTH + LABEL_PADDING_X * 2.0,
                height: lines * LINE_HEIGHT + LABEL_PADDING_Y * 2.0,
            }
        }
        NodeKind::Text { .. } | NodeKind::Header { .. } => Size {
            width: node.content.chars().count().max(2) as f32 * CHAR_WIDTH + LABEL_PADDING_X * 2.0,
            height: LINE_HEIGHT + LABEL_PADDING_Y * 2.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::LayoutType;
    use crate::layout::apply_layout;

    #[test]
    fn estimated_sizes_satisfy_the_layout_precondition() {
        let parsed = parse("# A\n- one\n- two\n\n```sh\nls -la\n```").unwrap();
        let measured = estimate_sizes(&parsed.nodes);
        assert!(measured.iter().all(|n| n.measured_size.is_some()));
        assert!(apply_layout(&measured, &parsed.edges, LayoutType::Radial).is_ok());
    }

    #[test]
    fn longer_content_measures_wider() {
        let parsed = parse("- ab\n- a considerably longer list item").unwrap();
        let measured = estimate_sizes(&parsed.nodes);
        let short = measured[0].measured_size.unwrap().width;
        let long = measured[1].measured_size.unwrap().width;
        assert!(long > short);
    }
}
