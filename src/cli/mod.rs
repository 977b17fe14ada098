//! CLI subcommands: init, validate, compile.

use crate::core::types::{CompileOptions, CompiledPack, EmitOutcome};
use crate::core::{manifest, parser};
use clap::Subcommand;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a starter pack.yaml
    Init {
        /// Directory to initialize (default: current)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Pack name (namespace)
        #[arg(short, long, default_value = "my_pack")]
        name: String,
    },

    /// Validate pack.yaml without compiling
    Validate {
        /// Path to pack.yaml
        #[arg(short, long, default_value = "pack.yaml")]
        file: PathBuf,
    },

    /// Compile pack.yaml into a datapack
    Compile {
        /// Path to pack.yaml
        #[arg(short, long, default_value = "pack.yaml")]
        file: PathBuf,

        /// Directory the datapack folder is created in
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Write into an existing datapack folder
        #[arg(long)]
        overwrite: bool,

        /// Print the compiled functions instead of writing files
        #[arg(long)]
        dry_run: bool,
    },
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<(), String> {
    match cmd {
        Commands::Init { path, name } => cmd_init(&path, &name),
        Commands::Validate { file } => cmd_validate(&file),
        Commands::Compile {
            file,
            out,
            overwrite,
            dry_run,
        } => cmd_compile(&file, &out, overwrite, dry_run),
    }
}

fn cmd_init(path: &Path, name: &str) -> Result<(), String> {
    let manifest_path = path.join("pack.yaml");
    if manifest_path.exists() {
        return Err(format!("{} already exists", manifest_path.display()));
    }
    std::fs::create_dir_all(path).map_err(|e| format!("cannot create {}: {}", path.display(), e))?;

    let template = format!(
        r#"name: {name}
description: "BlockScript Datapack"

functions:
  __load__:
    - tellraw: {{ text: "{name} loaded!", target: "@a" }}

  __tick__: []

  is_plains:
    - if: "biome ~ ~ ~ minecraft:plains"
      then:
        - tellraw: "You are in plains"
      else:
        - tellraw: "You are not in plains"
"#
    );
    std::fs::write(&manifest_path, template)
        .map_err(|e| format!("cannot write {}: {}", manifest_path.display(), e))?;

    println!("Initialized blockscript pack at {}", path.display());
    println!("  Created: {}", manifest_path.display());
    Ok(())
}

fn cmd_validate(file: &Path) -> Result<(), String> {
    let manifest = parse_and_validate(file)?;
    println!(
        "OK: {} ({} functions)",
        manifest.name,
        manifest.functions.len()
    );
    Ok(())
}

fn cmd_compile(file: &Path, out: &Path, overwrite: bool, dry_run: bool) -> Result<(), String> {
    let manifest = parse_and_validate(file)?;
    let opts = CompileOptions {
        out_dir: out.to_path_buf(),
        overwrite,
        dry_run,
    };

    match manifest.compile(&opts).map_err(|e| e.to_string())? {
        EmitOutcome::DryRun(pack) => {
            print_pack(&manifest.name, &pack);
            println!("Dry run: no files written.");
        }
        EmitOutcome::Written(report) => {
            println!("Compiled {}: {}", manifest.name, report);
        }
    }
    Ok(())
}

/// Parse and validate a manifest file, returning errors if invalid.
fn parse_and_validate(file: &Path) -> Result<manifest::Manifest, String> {
    let manifest = parser::parse_manifest_file(file).map_err(|e| e.to_string())?;
    let errors = parser::validate_manifest(&manifest);
    if errors.is_empty() {
        return Ok(manifest);
    }
    for e in &errors {
        eprintln!("  ERROR: {}", e);
    }
    Err(format!("{} validation error(s)", errors.len()))
}

/// Display a compiled pack to stdout.
fn print_pack(name: &str, pack: &CompiledPack) {
    println!("Pack: {} ({} functions)", name, pack.len());
    for (function, commands) in pack {
        println!();
        println!("{}:{}", name, function);
        for command in commands {
            println!("  {}", command);
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAINS: &str = r#"
name: example2_pack
functions:
  is_plains:
    - if: "biome ~ ~ ~ minecraft:plains"
      then: [ { tellraw: "You are in plains" } ]
      else: [ { tellraw: "You are not in plains" } ]
"#;

    fn write_manifest(dir: &Path, yaml: &str) -> PathBuf {
        let path = dir.join("pack.yaml");
        std::fs::write(&path, yaml).unwrap();
        path
    }

    #[test]
    fn test_init() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("new-pack");
        cmd_init(&sub, "demo").unwrap();
        let manifest = parser::parse_manifest_file(&sub.join("pack.yaml")).unwrap();
        assert_eq!(manifest.name, "demo");
        assert!(parser::validate_manifest(&manifest).is_empty());
    }

    #[test]
    fn test_init_template_compiles() {
        let dir = tempfile::tempdir().unwrap();
        cmd_init(dir.path(), "demo").unwrap();
        let manifest = parser::parse_manifest_file(&dir.path().join("pack.yaml")).unwrap();
        let pack = manifest
            .compile(&CompileOptions::dry_run())
            .unwrap()
            .into_pack()
            .unwrap();
        assert_eq!(pack["__load__"], vec![r#"tellraw @a "demo loaded!""#]);
        assert!(pack["__tick__"].is_empty());
        assert_eq!(pack.len(), 5);
    }

    #[test]
    fn test_init_already_exists() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pack.yaml"), "exists").unwrap();
        assert!(cmd_init(dir.path(), "demo").is_err());
    }

    #[test]
    fn test_validate_valid() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_manifest(dir.path(), PLAINS);
        cmd_validate(&file).unwrap();
    }

    #[test]
    fn test_validate_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_manifest(dir.path(), "name: \"Bad Name\"\n");
        let err = cmd_validate(&file).unwrap_err();
        assert!(err.contains("validation error"));
    }

    #[test]
    fn test_validate_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(cmd_validate(&dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_compile_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_manifest(dir.path(), PLAINS);
        let out = dir.path().join("out");
        cmd_compile(&file, &out, false, true).unwrap();
        assert!(!out.exists());
    }

    #[test]
    fn test_compile_writes_functions() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_manifest(dir.path(), PLAINS);
        let out = dir.path().join("out");
        cmd_compile(&file, &out, false, false).unwrap();

        let functions = out.join("example2_pack/data/example2_pack/function");
        let caller = std::fs::read_to_string(functions.join("is_plains.mcfunction")).unwrap();
        assert_eq!(
            caller,
            "execute if biome ~ ~ ~ minecraft:plains run function example2_pack:bs_dynamic/1\n\
             execute unless biome ~ ~ ~ minecraft:plains run function example2_pack:bs_dynamic/2"
        );
        assert!(functions.join("bs_dynamic/1.mcfunction").exists());
        assert!(functions.join("bs_dynamic/2.mcfunction").exists());
        assert!(!out.join("example2_pack/data/minecraft/tags/function/tick.json").exists());
    }

    #[test]
    fn test_compile_existing_needs_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_manifest(dir.path(), PLAINS);
        let out = dir.path().join("out");
        cmd_compile(&file, &out, false, false).unwrap();

        let err = cmd_compile(&file, &out, false, false).unwrap_err();
        assert!(err.contains("already exists"));
        cmd_compile(&file, &out, true, false).unwrap();
    }

    #[test]
    fn test_compile_reports_pipeline_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_manifest(dir.path(), "name: p\nfunctions:\n  f:\n    - if: x\n");
        let err = cmd_compile(&file, dir.path(), false, true).unwrap_err();
        assert!(err.contains("then block must be defined"));
    }

    #[test]
    fn test_dispatch_validate() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_manifest(dir.path(), PLAINS);
        dispatch(Commands::Validate { file }).unwrap();
    }

    #[test]
    fn test_dispatch_compile_dry() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_manifest(dir.path(), PLAINS);
        dispatch(Commands::Compile {
            file,
            out: dir.path().to_path_buf(),
            overwrite: false,
            dry_run: true,
        })
        .unwrap();
    }
}
