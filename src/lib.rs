#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dump;
pub mod error;
pub mod ir;
pub mod layout;
pub mod parser;
pub mod serializer;
pub mod style;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{HorizontalConfig, LayoutConfig, RadialConfig};
pub use error::{LayoutError, ParseError, SerializeError, ValidationError};
pub use ir::{Edge, LayoutType, Node, NodeKind, Parsed, Point, Size};
pub use layout::{apply_layout, apply_layout_with};
pub use parser::parse;
pub use serializer::serialize;
pub use style::{StyleObject, TokenDef, TokenDefs, parse_tokens};
