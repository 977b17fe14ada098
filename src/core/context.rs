//! Execution contexts and the fluent command builder.
//!
//! A builder accumulates `execute` modifier clauses in order, then either
//! renders a leaf command (`execute <clauses> run <command>`) or opens a
//! conditional branch that reuses the clauses as its caller prefix.

use super::conditional::ConditionalNode;
use super::markup;
use super::selector::Selector;
use super::types::PackSource;
use crate::error::CompileError;
use std::fmt;
use std::str::FromStr;

/// Ordered `execute` modifier clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    clauses: Vec<String>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one clause. No validation.
    pub fn push(&mut self, clause: impl Into<String>) {
        self.clauses.push(clause.into());
    }

    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn into_clauses(self) -> Vec<String> {
        self.clauses
    }

    /// Wrap `command` in the accumulated clauses. Empty contexts return it unchanged.
    pub fn render(&self, command: &str) -> String {
        if self.clauses.is_empty() {
            return command.to_string();
        }
        execute_line(&self.clauses, None, command)
    }
}

/// `execute <clauses> [extra] run <command>`.
pub(crate) fn execute_line(clauses: &[String], extra: Option<&str>, command: &str) -> String {
    let mut parts: Vec<&str> = clauses.iter().map(String::as_str).collect();
    if let Some(extra) = extra {
        parts.push(extra);
    }
    format!("execute {} run {}", parts.join(" "), command.trim())
}

/// Anchor for `execute anchored`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Eyes,
    Feet,
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eyes => write!(f, "eyes"),
            Self::Feet => write!(f, "feet"),
        }
    }
}

impl FromStr for Anchor {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eyes" => Ok(Self::Eyes),
            "feet" => Ok(Self::Feet),
            other => Err(CompileError::InvalidAnchor(other.to_string())),
        }
    }
}

/// Arguments of a `summon` command.
#[derive(Debug, Clone, PartialEq)]
pub struct Summon {
    pub entity: String,
    pub coords: String,
    pub nbt: String,
}

impl Summon {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            coords: "~ ~ ~".to_string(),
            nbt: String::new(),
        }
    }

    pub fn coords(mut self, coords: impl Into<String>) -> Self {
        self.coords = coords.into();
        self
    }

    pub fn nbt(mut self, nbt: impl Into<String>) -> Self {
        self.nbt = nbt.into();
        self
    }

    fn command(&self) -> String {
        if self.nbt.is_empty() {
            format!("summon {} {}", self.entity, self.coords)
        } else {
            format!("summon {} {} {}", self.entity, self.coords, self.nbt)
        }
    }
}

impl From<&str> for Summon {
    fn from(entity: &str) -> Self {
        Self::new(entity)
    }
}

/// Arguments of a `playsound` command.
#[derive(Debug, Clone, PartialEq)]
pub struct Sound {
    pub sound: String,
    pub channel: String,
    pub targets: String,
    pub coords: String,
    pub volume: f32,
    pub pitch: f32,
}

impl Sound {
    pub fn new(sound: impl Into<String>) -> Self {
        Self {
            sound: sound.into(),
            channel: "master".to_string(),
            targets: Selector::this().render(),
            coords: "~ ~ ~".to_string(),
            volume: 1.0,
            pitch: 1.0,
        }
    }

    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    pub fn targets(mut self, targets: impl fmt::Display) -> Self {
        self.targets = targets.to_string();
        self
    }

    pub fn coords(mut self, coords: impl Into<String>) -> Self {
        self.coords = coords.into();
        self
    }

    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }

    fn command(&self) -> String {
        format!(
            "playsound {} {} {} {} {} {}",
            self.sound,
            self.channel,
            self.targets,
            self.coords,
            decimal(self.volume),
            decimal(self.pitch)
        )
    }
}

impl From<&str> for Sound {
    fn from(sound: &str) -> Self {
        Self::new(sound)
    }
}

// Whole numbers keep a trailing `.0` so `1` renders as `1.0`.
fn decimal(v: f32) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        v.to_string()
    }
}

/// Fluent builder: modifiers first, then one leaf command or a branch.
///
/// Each builder owns its context; modifiers consume and return it, so a
/// context is never shared between two commands.
pub struct CommandBuilder<'p> {
    pack: &'p dyn PackSource,
    context: ExecutionContext,
}

impl<'p> CommandBuilder<'p> {
    pub fn new(pack: &'p dyn PackSource) -> Self {
        Self {
            pack,
            context: ExecutionContext::new(),
        }
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    // -- execute modifiers --

    /// Append a raw modifier clause. Prefer the named modifiers.
    pub fn clause(mut self, clause: impl Into<String>) -> Self {
        self.context.push(clause);
        self
    }

    /// Set the executor to the target entity.
    pub fn as_entity(self, target: impl fmt::Display) -> Self {
        self.clause(format!("as {}", target))
    }

    /// Set the execution position to an entity, or to coordinates when the
    /// location contains a space.
    pub fn at(self, location: impl fmt::Display) -> Self {
        let location = location.to_string();
        if location.contains(' ') {
            self.clause(format!("positioned {}", location))
        } else {
            self.clause(format!("at {}", location))
        }
    }

    /// Set the execution anchor to the eyes or feet.
    pub fn anchored(self, anchor: Anchor) -> Self {
        self.clause(format!("anchor {}", anchor))
    }

    /// Face a point or entity, as viewed from the anchor.
    pub fn facing(self, location: impl fmt::Display) -> Self {
        self.clause(format!("facing {}", location))
    }

    pub fn in_dimension(self, dimension: &str) -> Self {
        self.clause(format!("in {}", dimension))
    }

    /// Select entities by relation to the current executor.
    pub fn on(self, relation: &str) -> Self {
        self.clause(format!("on {}", relation))
    }

    pub fn rotated(self, rotation: &str) -> Self {
        self.clause(format!("rotated {}", rotation))
    }

    // -- branches --

    /// Open a conditional. The clauses gathered so far prefix both arms.
    pub fn if_(self, condition: impl Into<String>) -> ConditionalNode {
        ConditionalNode::new(self.context.into_clauses(), condition)
    }

    // -- leaf commands --

    /// Run a raw command.
    pub fn run(self, command: &str) -> String {
        self.context.render(command)
    }

    /// Print a message to the executor.
    pub fn tellraw(self, text: &str) -> String {
        self.tellraw_to(text, Selector::this())
    }

    pub fn tellraw_to(self, text: &str, target: impl fmt::Display) -> String {
        let command = format!("tellraw {} {}", target, markup::render(text));
        self.context.render(&command)
    }

    pub fn summon(self, summon: impl Into<Summon>) -> String {
        self.context.render(&summon.into().command())
    }

    pub fn playsound(self, sound: impl Into<Sound>) -> String {
        self.context.render(&sound.into().command())
    }

    /// Call another function of this pack.
    pub fn function(self, path: &str) -> String {
        let command = format!("function {}:{}", self.pack.name(), path);
        self.context.render(&command)
    }
}
