//! Datapack emission: dry-run return or on-disk layout.
//!
//! Layout under `<out>/<pack>/`:
//! - `pack.mcmeta`
//! - `data/<pack>/function/<path>.mcfunction`
//! - `data/minecraft/tags/function/{tick,load}.json` (only for `__tick__` / `__load__`)
//!
//! Writes are not transactional: a failure leaves earlier files on disk.

use super::parser::{is_function_path, is_namespace};
use super::types::{
    CompileOptions, CompiledPack, EmitOutcome, EmitReport, PackMeta, LOAD_FUNCTION, TICK_FUNCTION,
};
use crate::error::{CompileError, Result};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Root directory of a pack: `<out>/<pack>`.
pub fn pack_root(out_dir: &Path, pack: &str) -> PathBuf {
    out_dir.join(pack)
}

/// Path of one function file within a pack root.
pub fn function_path(root: &Path, pack: &str, function: &str) -> PathBuf {
    root.join("data")
        .join(pack)
        .join("function")
        .join(format!("{}.mcfunction", function))
}

/// Directory holding the `tick`/`load` function tags.
pub fn tags_dir(root: &Path) -> PathBuf {
    root.join("data")
        .join("minecraft")
        .join("tags")
        .join("function")
}

/// Emit a compiled pack according to `opts`.
pub fn emit(meta: &PackMeta, compiled: CompiledPack, opts: &CompileOptions) -> Result<EmitOutcome> {
    if opts.dry_run {
        info!(pack = %meta.name, functions = compiled.len(), "dry run, nothing written");
        return Ok(EmitOutcome::DryRun(compiled));
    }
    write_pack(meta, &compiled, opts).map(EmitOutcome::Written)
}

fn write_pack(meta: &PackMeta, compiled: &CompiledPack, opts: &CompileOptions) -> Result<EmitReport> {
    check_names(meta, compiled)?;
    let start = Instant::now();
    let root = pack_root(&opts.out_dir, &meta.name);

    if root.exists() && !opts.overwrite {
        return Err(CompileError::AlreadyExists(root));
    }

    let tags = tags_dir(&root);
    create_dir(&root.join("data").join(&meta.name).join("function"))?;
    create_dir(&tags)?;

    let mcmeta = json!({
        "pack": {
            "pack_format": meta.pack_format,
            "description": meta.description,
        }
    });
    write_file(&root.join("pack.mcmeta"), &serde_json::to_string_pretty(&mcmeta)?)?;

    let mut tags_written = Vec::new();
    for (function, commands) in compiled {
        debug!(function = %function, "compiling");
        let path = function_path(&root, &meta.name, function);
        if let Some(parent) = path.parent() {
            create_dir(parent)?;
        }
        write_file(&path, &commands.join("\n"))?;

        if let Some(hook) = hook_tag(function) {
            let tag = json!({ hook: [format!("{}/{}", meta.name, function)] });
            write_file(&tags.join(format!("{}.json", hook)), &serde_json::to_string(&tag)?)?;
            tags_written.push(hook.to_string());
        }
    }

    let report = EmitReport {
        root,
        functions_written: compiled.len(),
        tags_written,
        duration: start.elapsed(),
    };
    info!(pack = %meta.name, "compiled: {}", report);
    Ok(report)
}

/// Names become path components, so they must stay inside the pack root.
fn check_names(meta: &PackMeta, compiled: &CompiledPack) -> Result<()> {
    if !is_namespace(&meta.name) {
        return Err(CompileError::InvalidNamespace(meta.name.clone()));
    }
    match compiled.keys().find(|function| !is_function_path(function)) {
        Some(function) => Err(CompileError::InvalidFunctionPath(function.clone())),
        None => Ok(()),
    }
}

/// Tag name for a reserved hook function.
fn hook_tag(function: &str) -> Option<&'static str> {
    match function {
        TICK_FUNCTION => Some("tick"),
        LOAD_FUNCTION => Some("load"),
        _ => None,
    }
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| CompileError::io(path, e))
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| CompileError::io(path, e))
}
