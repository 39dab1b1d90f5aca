pub mod cli;
pub mod config;
pub mod constants;
pub mod context;
pub mod engine;
pub mod error;
pub mod filter;
pub mod graph;
pub mod markdown;
pub mod registry;
pub mod report;
pub mod select;
pub mod util;

pub use cli::Cli;
pub use config::{Config, Settings};
pub use context::{FileIssue, IssueKind, RunContext};
pub use engine::{run, RankEngine};
pub use error::{Error, Result};
pub use filter::TagFilterSpec;
pub use graph::{LinkGraph, LinkStats};
pub use registry::{Note, NoteRegistry, ScanOptions};
pub use report::RunSummary;
pub use select::{RankedNote, SelectionConstraints};
