//! Core compiler.

pub mod conditional;
pub mod context;
pub mod emitter;
pub mod manifest;
pub mod markup;
pub mod parser;
pub mod pipeline;
pub mod selector;
pub mod types;
