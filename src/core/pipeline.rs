//! Compilation pipeline. Lowers every declared function of a pack.
//!
//! For each entry point: evaluate it, flatten literals, lower branches into
//! `bs_dynamic/<n>` functions, and record the result in one `CompiledPack`.
//! The `<n>` counter restarts at 1 for every declared function and is shared
//! by all branches nested inside it.

use super::types::{Command, CompiledPack, FunctionBody, PackSource, DYNAMIC_PREFIX};
use crate::error::{CompileError, Result};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Compile every entry point of `source` into a fresh `CompiledPack`.
pub fn compile_pack(source: &dyn PackSource) -> Result<CompiledPack> {
    let entries = source.entry_points();
    check_unique(&entries)?;

    info!(pack = source.name(), functions = entries.len(), "starting precompilation");

    let mut pack = CompiledPack::new();
    for entry in entries {
        debug!(function = entry, "precompiling");
        let commands = match source.invoke(entry)? {
            FunctionBody::Sequence(commands) => commands,
            FunctionBody::Bare(_) => return Err(CompileError::BodyNotSequence(entry.to_string())),
        };

        let mut pass = FunctionPass {
            namespace: source.name(),
            counter: 0,
            pack: &mut pack,
        };
        let lowered = pass.lower(commands)?;
        pass.register(entry.to_string(), lowered);
    }

    Ok(pack)
}

fn check_unique(entries: &[&str]) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(*entry) {
            return Err(CompileError::DuplicateFunction(entry.to_string()));
        }
    }
    Ok(())
}

/// State for lowering one declared function.
struct FunctionPass<'a> {
    namespace: &'a str,
    counter: u32,
    pack: &'a mut CompiledPack,
}

impl FunctionPass<'_> {
    fn lower(&mut self, commands: Vec<Command>) -> Result<Vec<String>> {
        let mut lowered = Vec::with_capacity(commands.len());
        for command in commands {
            match command {
                Command::Literal(line) => lowered.push(line),
                Command::Branch(node) => {
                    for record in node.compile()? {
                        let path = self.allocate();
                        let body = self.lower(record.body)?;
                        self.register(path.clone(), body);
                        lowered.push(format!(
                            "{}function {}:{}",
                            record.caller_prefix, self.namespace, path
                        ));
                    }
                }
            }
        }
        Ok(lowered)
    }

    /// Take the next synthesized path and reserve its slot, so a parent
    /// branch is listed before the branches nested in it.
    fn allocate(&mut self) -> String {
        self.counter += 1;
        let path = format!("{}{}", DYNAMIC_PREFIX, self.counter);
        if self.pack.contains_key(&path) {
            warn!(function = %path, "synthesized function replaces an earlier definition");
        }
        self.pack.insert(path.clone(), Vec::new());
        path
    }

    fn register(&mut self, name: String, body: Vec<String>) {
        debug!(function = %name, commands = body.len(), "registered");
        self.pack.insert(name, body);
    }
}
