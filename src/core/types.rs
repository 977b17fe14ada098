//! Shared types: commands, function bodies, compiled packs, compile options.

use super::conditional::ConditionalNode;
use crate::error::Result;
use indexmap::IndexMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Command tree
// ============================================================================

/// Prefix of every synthesized function path.
pub const DYNAMIC_PREFIX: &str = "bs_dynamic/";

/// Reserved function run every game tick.
pub const TICK_FUNCTION: &str = "__tick__";

/// Reserved function run when the datapack loads.
pub const LOAD_FUNCTION: &str = "__load__";

/// One element of a function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A fully rendered command line.
    Literal(String),
    /// A conditional that lowers into synthesized functions.
    Branch(ConditionalNode),
}

impl From<String> for Command {
    fn from(s: String) -> Self {
        Self::Literal(s)
    }
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        Self::Literal(s.to_string())
    }
}

impl From<ConditionalNode> for Command {
    fn from(node: ConditionalNode) -> Self {
        Self::Branch(node)
    }
}

/// What an entry point returns.
///
/// Only `Sequence` compiles; a `Bare` command is rejected by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionBody {
    Sequence(Vec<Command>),
    Bare(Command),
}

impl From<Vec<Command>> for FunctionBody {
    fn from(cmds: Vec<Command>) -> Self {
        Self::Sequence(cmds)
    }
}

impl From<Vec<String>> for FunctionBody {
    fn from(cmds: Vec<String>) -> Self {
        Self::Sequence(cmds.into_iter().map(Command::Literal).collect())
    }
}

impl<const N: usize> From<[Command; N]> for FunctionBody {
    fn from(cmds: [Command; N]) -> Self {
        Self::Sequence(cmds.into())
    }
}

impl From<String> for FunctionBody {
    fn from(cmd: String) -> Self {
        Self::Bare(Command::Literal(cmd))
    }
}

impl From<Command> for FunctionBody {
    fn from(cmd: Command) -> Self {
        Self::Bare(cmd)
    }
}

impl From<ConditionalNode> for FunctionBody {
    fn from(node: ConditionalNode) -> Self {
        Self::Bare(Command::Branch(node))
    }
}

/// A caller prefix plus the body of the function it calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmissionRecord {
    /// `execute ... run `; the generated `function` call is appended to it.
    pub caller_prefix: String,
    pub body: Vec<Command>,
}

/// Function path → ordered command lines, in registration order.
pub type CompiledPack = IndexMap<String, Vec<String>>;

// ============================================================================
// Entry-point enumeration
// ============================================================================

/// A pack definition the pipeline can enumerate and invoke.
pub trait PackSource {
    /// Namespace used for generated `function <ns>:<path>` calls.
    fn name(&self) -> &str;

    /// Declared function names, in declaration order.
    fn entry_points(&self) -> Vec<&str>;

    /// Evaluate one declared function.
    fn invoke(&self, entry: &str) -> Result<FunctionBody>;
}

// ============================================================================
// Options and outcomes
// ============================================================================

/// Default `pack.mcmeta` pack format (Java Edition 1.21).
pub const DEFAULT_PACK_FORMAT: u32 = 48;

/// Default `pack.mcmeta` description.
pub const DEFAULT_DESCRIPTION: &str = "BlockScript Datapack";

/// Options for one compile invocation.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Directory the `<pack>/` root is created in.
    pub out_dir: PathBuf,
    /// Write into an existing root instead of failing.
    pub overwrite: bool,
    /// Return the compiled pack without touching the filesystem.
    pub dry_run: bool,
}

impl CompileOptions {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            overwrite: false,
            dry_run: false,
        }
    }

    pub fn dry_run() -> Self {
        Self {
            out_dir: PathBuf::new(),
            overwrite: false,
            dry_run: true,
        }
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// Pack-level metadata written to `pack.mcmeta`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackMeta {
    pub name: String,
    pub description: String,
    pub pack_format: u32,
}

impl PackMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: DEFAULT_DESCRIPTION.to_string(),
            pack_format: DEFAULT_PACK_FORMAT,
        }
    }
}

/// Summary of a persisted compile.
#[derive(Debug, Clone)]
pub struct EmitReport {
    pub root: PathBuf,
    pub functions_written: usize,
    pub tags_written: Vec<String>,
    pub duration: Duration,
}

/// Result of a compile invocation.
#[derive(Debug, Clone)]
pub enum EmitOutcome {
    DryRun(CompiledPack),
    Written(EmitReport),
}

impl EmitOutcome {
    /// The compiled pack, if this was a dry run.
    pub fn into_pack(self) -> Option<CompiledPack> {
        match self {
            Self::DryRun(pack) => Some(pack),
            Self::Written(_) => None,
        }
    }
}

impl fmt::Display for EmitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} functions, {} tags → {} ({:.1}ms)",
            self.functions_written,
            self.tags_written.len(),
            self.root.display(),
            self.duration.as_secs_f64() * 1000.0
        )
    }
}
