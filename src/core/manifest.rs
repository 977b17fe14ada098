//! YAML pack manifests, lowered through the same builder API as Rust packs.
//!
//! ```yaml
//! name: example2_pack
//! functions:
//!   is_plains:
//!     - if: "biome ~ ~ ~ minecraft:plains"
//!       then: [ { tellraw: "You are in plains" } ]
//!       else: [ { tellraw: "You are not in plains" } ]
//! ```

use super::context::{Anchor, CommandBuilder, Sound, Summon};
use super::emitter;
use super::pipeline;
use super::selector::Selector;
use super::types::*;
use crate::error::{CompileError, Result};
use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml_ng::Value;
use std::fmt;

/// Root of a `pack.yaml` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Pack name, also the function namespace
    pub name: String,

    /// `pack.mcmeta` description
    #[serde(default)]
    pub description: Option<String>,

    /// `pack.mcmeta` pack format
    #[serde(default)]
    pub pack_format: Option<u32>,

    /// Declared functions, in declaration order. Each body must be a list of steps.
    #[serde(default, deserialize_with = "unique_functions")]
    pub functions: IndexMap<String, Value>,
}

/// Deserialize the `functions` mapping, failing on a repeated name instead of
/// letting the later body replace the earlier one.
fn unique_functions<'de, D>(deserializer: D) -> std::result::Result<IndexMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FunctionsVisitor;

    impl<'de> Visitor<'de> for FunctionsVisitor {
        type Value = IndexMap<String, Value>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a mapping of function names to bodies")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut functions = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, body)) = map.next_entry::<String, Value>()? {
                if functions.contains_key(&name) {
                    return Err(de::Error::custom(CompileError::DuplicateFunction(name)));
                }
                functions.insert(name, body);
            }
            Ok(functions)
        }
    }

    deserializer.deserialize_map(FunctionsVisitor)
}

/// A mapping step: modifiers plus exactly one action.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Step {
    #[serde(default)]
    execute: Vec<Value>,
    #[serde(default)]
    run: Option<String>,
    #[serde(default)]
    tellraw: Option<TellrawStep>,
    #[serde(default)]
    summon: Option<SummonStep>,
    #[serde(default)]
    playsound: Option<PlaysoundStep>,
    #[serde(default)]
    function: Option<String>,
    #[serde(default, rename = "if")]
    condition: Option<String>,
    #[serde(default)]
    then: Option<Value>,
    #[serde(default, rename = "else")]
    otherwise: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TellrawStep {
    Text(String),
    Full {
        text: String,
        #[serde(default)]
        target: Option<Value>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SummonStep {
    Entity(String),
    Full {
        entity: String,
        #[serde(default)]
        coords: Option<String>,
        #[serde(default)]
        nbt: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PlaysoundStep {
    Sound(String),
    Full {
        sound: String,
        #[serde(default)]
        channel: Option<String>,
        #[serde(default)]
        targets: Option<Value>,
        #[serde(default)]
        coords: Option<String>,
        #[serde(default)]
        volume: Option<f32>,
        #[serde(default)]
        pitch: Option<f32>,
    },
}

impl Manifest {
    pub fn meta(&self) -> PackMeta {
        let mut meta = PackMeta::new(self.name.clone());
        if let Some(ref description) = self.description {
            meta.description.clone_from(description);
        }
        if let Some(format) = self.pack_format {
            meta.pack_format = format;
        }
        meta
    }

    /// Compile every function and emit according to `opts`.
    pub fn compile(&self, opts: &CompileOptions) -> Result<EmitOutcome> {
        let compiled = pipeline::compile_pack(self)?;
        emitter::emit(&self.meta(), compiled, opts)
    }

    fn lower_body(&self, function: &str, body: &Value) -> Result<FunctionBody> {
        match body {
            Value::Sequence(steps) => steps
                .iter()
                .map(|step| self.lower_step(function, step))
                .collect::<Result<Vec<_>>>()
                .map(FunctionBody::Sequence),
            _ => Err(CompileError::BodyNotSequence(function.to_string())),
        }
    }

    fn lower_arm(&self, function: &str, arm: &str, value: &Value) -> Result<Vec<Command>> {
        match value {
            Value::Sequence(steps) => steps
                .iter()
                .map(|step| self.lower_step(function, step))
                .collect(),
            _ => Err(invalid(function, format!("'{}' must be a list of steps", arm))),
        }
    }

    fn lower_step(&self, function: &str, value: &Value) -> Result<Command> {
        let step: Step = match value {
            Value::String(line) => return Ok(Command::Literal(line.clone())),
            Value::Mapping(_) => serde_yaml_ng::from_value(value.clone())
                .map_err(|e| invalid(function, e.to_string()))?,
            other => return Err(invalid(function, format!("unexpected step {:?}", other))),
        };

        let actions = [
            step.run.is_some(),
            step.tellraw.is_some(),
            step.summon.is_some(),
            step.playsound.is_some(),
            step.function.is_some(),
            step.condition.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count();
        if actions != 1 {
            return Err(invalid(
                function,
                format!(
                    "expected exactly one of run, tellraw, summon, playsound, function, if (found {})",
                    actions
                ),
            ));
        }
        if step.condition.is_none() && (step.then.is_some() || step.otherwise.is_some()) {
            return Err(invalid(function, "'then'/'else' need an 'if'".to_string()));
        }

        let mut builder = CommandBuilder::new(self);
        for modifier in &step.execute {
            builder = apply_modifier(builder, function, modifier)?;
        }

        if let Some(condition) = step.condition {
            let mut node = builder.if_(condition);
            if let Some(ref then) = step.then {
                node = node.then(self.lower_arm(function, "then", then)?);
            }
            if let Some(ref otherwise) = step.otherwise {
                node = node.else_(self.lower_arm(function, "else", otherwise)?);
            }
            return Ok(Command::Branch(node));
        }

        let line = if let Some(command) = step.run {
            builder.run(&command)
        } else if let Some(tellraw) = step.tellraw {
            match tellraw {
                TellrawStep::Text(text) => builder.tellraw(&text),
                TellrawStep::Full { text, target: None } => builder.tellraw(&text),
                TellrawStep::Full {
                    text,
                    target: Some(target),
                } => builder.tellraw_to(&text, Selector::from_yaml(&target)?),
            }
        } else if let Some(summon) = step.summon {
            builder.summon(match summon {
                SummonStep::Entity(entity) => Summon::new(entity),
                SummonStep::Full { entity, coords, nbt } => {
                    let mut s = Summon::new(entity);
                    if let Some(coords) = coords {
                        s = s.coords(coords);
                    }
                    if let Some(nbt) = nbt {
                        s = s.nbt(nbt);
                    }
                    s
                }
            })
        } else if let Some(playsound) = step.playsound {
            builder.playsound(lower_sound(playsound)?)
        } else if let Some(path) = step.function {
            builder.function(&path)
        } else {
            unreachable!("exactly one action was checked above")
        };
        Ok(Command::Literal(line))
    }
}

impl PackSource for Manifest {
    fn name(&self) -> &str {
        &self.name
    }

    fn entry_points(&self) -> Vec<&str> {
        self.functions.keys().map(String::as_str).collect()
    }

    fn invoke(&self, entry: &str) -> Result<FunctionBody> {
        match self.functions.get(entry) {
            Some(body) => self.lower_body(entry, body),
            None => Err(CompileError::UnknownFunction(entry.to_string())),
        }
    }
}

fn invalid(function: &str, message: String) -> CompileError {
    CompileError::InvalidStep {
        function: function.to_string(),
        message,
    }
}

/// Apply one `{ <modifier>: <argument> }` entry of an `execute` list.
fn apply_modifier<'p>(
    builder: CommandBuilder<'p>,
    function: &str,
    modifier: &Value,
) -> Result<CommandBuilder<'p>> {
    let (key, arg) = match modifier {
        Value::Mapping(map) if map.len() == 1 => match map.iter().next() {
            Some((Value::String(key), arg)) => (key.as_str(), arg),
            _ => return Err(invalid(function, "modifier key must be a string".to_string())),
        },
        other => {
            return Err(invalid(
                function,
                format!("modifier must be a single-key mapping, got {:?}", other),
            ))
        }
    };

    let text = |arg: &Value| -> Result<String> {
        match arg {
            Value::String(s) => Ok(s.clone()),
            other => Err(invalid(
                function,
                format!("'{}' expects a string, got {:?}", key, other),
            )),
        }
    };

    Ok(match key {
        "as" => builder.as_entity(Selector::from_yaml(arg)?),
        "at" => builder.at(Selector::from_yaml(arg)?),
        "facing" => builder.facing(Selector::from_yaml(arg)?),
        "anchored" => builder.anchored(text(arg)?.parse::<Anchor>()?),
        "in" => builder.in_dimension(&text(arg)?),
        "on" => builder.on(&text(arg)?),
        "rotated" => builder.rotated(&text(arg)?),
        "clause" => builder.clause(text(arg)?),
        other => return Err(invalid(function, format!("unknown modifier '{}'", other))),
    })
}

fn lower_sound(step: PlaysoundStep) -> Result<Sound> {
    Ok(match step {
        PlaysoundStep::Sound(sound) => Sound::new(sound),
        PlaysoundStep::Full {
            sound,
            channel,
            targets,
            coords,
            volume,
            pitch,
        } => {
            let mut s = Sound::new(sound);
            if let Some(channel) = channel {
                s = s.channel(channel);
            }
            if let Some(targets) = targets {
                s = s.targets(Selector::from_yaml(&targets)?);
            }
            if let Some(coords) = coords {
                s = s.coords(coords);
            }
            if let Some(volume) = volume {
                s = s.volume(volume);
            }
            if let Some(pitch) = pitch {
                s = s.pitch(pitch);
            }
            s
        }
    })
}
