//! Rust-authored packs: an explicit registry of entry points.
//!
//! ```
//! use blockscript::{commands, Datapack, CompileOptions, Selector};
//!
//! let mut dp = Datapack::new("example2_pack");
//! dp.function("is_plains", |dp| {
//!     commands![dp
//!         .cmd()
//!         .if_("biome ~ ~ ~ minecraft:plains")
//!         .then([dp.cmd().tellraw("You are in plains")])
//!         .else_([dp.cmd().tellraw("You are not in plains")])]
//! });
//! dp.function("__load__", |dp| vec![dp.cmd().tellraw_to("loaded", Selector::everyone())]);
//!
//! let pack = dp.compile(&CompileOptions::dry_run()).unwrap().into_pack().unwrap();
//! assert_eq!(pack.len(), 4);
//! ```

use crate::core::context::CommandBuilder;
use crate::core::types::{CompileOptions, EmitOutcome, FunctionBody, PackMeta, PackSource};
use crate::core::{emitter, pipeline};
use crate::error::{CompileError, Result};
use std::fmt;

type EntryPoint = Box<dyn Fn(&Datapack) -> FunctionBody>;

/// A datapack defined in Rust.
pub struct Datapack {
    meta: PackMeta,
    functions: Vec<(String, EntryPoint)>,
}

impl Datapack {
    /// New pack. `name` is both the output folder and the function namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: PackMeta::new(name),
            functions: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = description.into();
        self
    }

    pub fn pack_format(mut self, format: u32) -> Self {
        self.meta.pack_format = format;
        self
    }

    pub fn meta(&self) -> &PackMeta {
        &self.meta
    }

    /// Declare a function. Entry points are compiled in declaration order.
    pub fn function<F, B>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn(&Datapack) -> B + 'static,
        B: Into<FunctionBody> + 'static,
    {
        let entry: EntryPoint = Box::new(move |dp: &Datapack| -> FunctionBody { body(dp).into() });
        self.functions.push((name.into(), entry));
        self
    }

    /// Builder with an empty execution context.
    pub fn cmd(&self) -> CommandBuilder<'_> {
        CommandBuilder::new(self)
    }

    /// Builder whose context starts with `as <target>`.
    pub fn cmd_as(&self, target: impl fmt::Display) -> CommandBuilder<'_> {
        self.cmd().as_entity(target)
    }

    /// Compile every declared function and emit according to `opts`.
    pub fn compile(&self, opts: &CompileOptions) -> Result<EmitOutcome> {
        let compiled = pipeline::compile_pack(self)?;
        emitter::emit(&self.meta, compiled, opts)
    }
}

impl PackSource for Datapack {
    fn name(&self) -> &str {
        &self.meta.name
    }

    fn entry_points(&self) -> Vec<&str> {
        self.functions.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn invoke(&self, entry: &str) -> Result<FunctionBody> {
        match self.functions.iter().find(|(name, _)| name == entry) {
            Some((_, f)) => Ok(f(self)),
            None => Err(CompileError::UnknownFunction(entry.to_string())),
        }
    }
}

impl fmt::Debug for Datapack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Datapack")
            .field("meta", &self.meta)
            .field("functions", &self.entry_points())
            .finish()
    }
}
