//! BlockScript: Minecraft datapacks as composable Rust values.
//!
//! Commands are built with a fluent builder that accumulates `execute`
//! modifiers; conditionals lower into synthesized `bs_dynamic/<n>` functions.
//! Packs are declared in Rust ([`Datapack`]) or YAML ([`Manifest`]) and
//! compile into one ordered map of function bodies, optionally written out
//! as a datapack folder.

pub mod cli;
pub mod core;
pub mod error;
pub mod logging;
pub mod pack;

pub use crate::core::conditional::ConditionalNode;
pub use crate::core::context::{Anchor, CommandBuilder, ExecutionContext, Sound, Summon};
pub use crate::core::manifest::Manifest;
pub use crate::core::selector::{Selector, SelectorBase};
pub use crate::core::types::{
    Command, CompileOptions, CompiledPack, EmitOutcome, FunctionBody, PackSource,
};
pub use crate::error::{CompileError, Result};
pub use crate::pack::Datapack;

/// Build a `Vec<Command>` from literals and branches.
///
/// ```
/// use blockscript::{commands, Command};
/// let cmds: Vec<Command> = commands!["say a", String::from("say b")];
/// assert_eq!(cmds.len(), 2);
/// ```
#[macro_export]
macro_rules! commands {
    ($($cmd:expr),* $(,)?) => {
        vec![$($crate::Command::from($cmd)),*]
    };
}
