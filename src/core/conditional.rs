//! Conditional branches: `if`/`unless` lowering.
//!
//! A node compiles into one emission record per non-empty arm. The pipeline
//! gives each record a synthesized function and calls it from the parent
//! body with the record's caller prefix.

use super::context::execute_line;
use super::types::{Command, EmissionRecord};
use crate::error::{CompileError, Result};

/// Misuse recorded by the fluent API and reported at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Misuse {
    ThenTwice,
    ElseTwice,
}

/// An `if <condition>` branch with a required `then` and optional `else` arm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalNode {
    prefix: Vec<String>,
    condition: String,
    then_seq: Option<Vec<Command>>,
    else_seq: Option<Vec<Command>>,
    misuse: Option<Misuse>,
}

impl ConditionalNode {
    pub(crate) fn new(prefix: Vec<String>, condition: impl Into<String>) -> Self {
        Self {
            prefix,
            condition: condition.into(),
            then_seq: None,
            else_seq: None,
            misuse: None,
        }
    }

    /// Clauses captured from the builder when the branch was opened.
    pub fn prefix(&self) -> &[String] {
        &self.prefix
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// Commands run when the condition holds. May be given once; an empty
    /// list does not count as given.
    pub fn then<I, C>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Command>,
    {
        if self.then_seq.as_ref().is_some_and(|seq| !seq.is_empty()) {
            self.misuse.get_or_insert(Misuse::ThenTwice);
        } else {
            self.then_seq = Some(commands.into_iter().map(Into::into).collect());
        }
        self
    }

    /// Commands run when the condition does not hold. Same rule as [`then`](Self::then).
    pub fn else_<I, C>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Command>,
    {
        if self.else_seq.as_ref().is_some_and(|seq| !seq.is_empty()) {
            self.misuse.get_or_insert(Misuse::ElseTwice);
        } else {
            self.else_seq = Some(commands.into_iter().map(Into::into).collect());
        }
        self
    }

    /// Lower into emission records: the `if` arm first, then `unless`.
    pub fn compile(self) -> Result<Vec<EmissionRecord>> {
        match self.misuse {
            Some(Misuse::ThenTwice) => return Err(CompileError::ThenAlreadyDefined),
            Some(Misuse::ElseTwice) => return Err(CompileError::ElseAlreadyDefined),
            None => {}
        }

        let then_seq = self.then_seq.unwrap_or_default();
        if then_seq.is_empty() {
            return Err(CompileError::EmptyThen);
        }

        let mut records = vec![EmissionRecord {
            caller_prefix: caller_prefix(&self.prefix, &format!("if {}", self.condition)),
            body: then_seq,
        }];

        if let Some(else_seq) = self.else_seq.filter(|s| !s.is_empty()) {
            records.push(EmissionRecord {
                caller_prefix: caller_prefix(&self.prefix, &format!("unless {}", self.condition)),
                body: else_seq,
            });
        }

        Ok(records)
    }
}

// Always wraps, even with no captured clauses: the guard itself is a clause.
fn caller_prefix(prefix: &[String], guard: &str) -> String {
    execute_line(prefix, Some(guard), "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Command {
        Command::Literal(s.to_string())
    }

    #[test]
    fn test_then_only_yields_one_record() {
        let records = ConditionalNode::new(vec![], "entity @s[tag=a]")
            .then(["say a"])
            .compile()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].caller_prefix, "execute if entity @s[tag=a] run ");
        assert_eq!(records[0].body, vec![lit("say a")]);
    }

    #[test]
    fn test_then_and_else_yield_if_then_unless() {
        let records = ConditionalNode::new(vec![], "biome ~ ~ ~ minecraft:plains")
            .then(["say yes"])
            .else_(["say no"])
            .compile()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].caller_prefix,
            "execute if biome ~ ~ ~ minecraft:plains run "
        );
        assert_eq!(
            records[1].caller_prefix,
            "execute unless biome ~ ~ ~ minecraft:plains run "
        );
        assert_eq!(records[1].body, vec![lit("say no")]);
    }

    #[test]
    fn test_prefix_clauses_precede_guard() {
        let records = ConditionalNode::new(vec!["as @a".to_string(), "at @s".to_string()], "block ~ ~-1 ~ stone")
            .then(["say stone"])
            .compile()
            .unwrap();
        assert_eq!(
            records[0].caller_prefix,
            "execute as @a at @s if block ~ ~-1 ~ stone run "
        );
    }

    #[test]
    fn test_missing_then_fails() {
        let err = ConditionalNode::new(vec![], "x").compile().unwrap_err();
        assert!(matches!(err, CompileError::EmptyThen));
    }

    #[test]
    fn test_empty_then_fails() {
        let node = ConditionalNode::new(vec![], "x").then(Vec::<Command>::new());
        assert!(matches!(node.compile(), Err(CompileError::EmptyThen)));
    }

    #[test]
    fn test_else_without_then_fails() {
        let node = ConditionalNode::new(vec![], "x").else_(["say no"]);
        assert!(matches!(node.compile(), Err(CompileError::EmptyThen)));
    }

    #[test]
    fn test_then_twice_fails() {
        let node = ConditionalNode::new(vec![], "x").then(["a"]).then(["b"]);
        assert!(matches!(node.compile(), Err(CompileError::ThenAlreadyDefined)));
    }

    #[test]
    fn test_empty_then_can_be_replaced() {
        let records = ConditionalNode::new(vec![], "x")
            .then(Vec::<Command>::new())
            .then(["say a"])
            .compile()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].body, vec![lit("say a")]);
    }

    #[test]
    fn test_empty_else_can_be_replaced() {
        let records = ConditionalNode::new(vec![], "x")
            .then(["a"])
            .else_(Vec::<Command>::new())
            .else_(["say b"])
            .compile()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].caller_prefix, "execute unless x run ");
        assert_eq!(records[1].body, vec![lit("say b")]);
    }

    #[test]
    fn test_else_twice_fails() {
        let node = ConditionalNode::new(vec![], "x")
            .then(["a"])
            .else_(["b"])
            .else_(["c"]);
        assert!(matches!(node.compile(), Err(CompileError::ElseAlreadyDefined)));
    }

    #[test]
    fn test_empty_else_is_skipped() {
        let records = ConditionalNode::new(vec![], "x")
            .then(["a"])
            .else_(Vec::<Command>::new())
            .compile()
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_nested_branch_kept_in_body() {
        let inner = ConditionalNode::new(vec![], "y").then(["b"]);
        let records = ConditionalNode::new(vec![], "x")
            .then([lit("a"), Command::Branch(inner.clone())])
            .compile()
            .unwrap();
        assert_eq!(records[0].body[1], Command::Branch(inner));
    }
}
