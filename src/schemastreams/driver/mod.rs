//! The two example programs as library code.
//!
//! Each example walks the same linear sequence of stages exactly once:
//! `Init -> RegisterSchemas -> Produce -> Consume -> Done`. The drivers only
//! see the broker through [`MessageSink`](crate::schemastreams::kafka::MessageSink)
//! and [`MessageSource`](crate::schemastreams::kafka::MessageSource), so the
//! same code runs against Kafka in the binaries and an in-memory topic in tests.

pub mod mix_avro;
pub mod roundtrip;
pub mod simple_json;

use log::info;
use std::fmt;

use crate::schemastreams::error::{SchemaStreamsError, SchemaStreamsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Init,
    RegisterSchemas,
    Produce,
    Consume,
    Done,
}

impl Stage {
    /// The only stage allowed to follow this one
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Init => Some(Stage::RegisterSchemas),
            Stage::RegisterSchemas => Some(Stage::Produce),
            Stage::Produce => Some(Stage::Consume),
            Stage::Consume => Some(Stage::Done),
            Stage::Done => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "Init",
            Stage::RegisterSchemas => "RegisterSchemas",
            Stage::Produce => "Produce",
            Stage::Consume => "Consume",
            Stage::Done => "Done",
        };
        f.write_str(name)
    }
}

/// Forward-only stage bookkeeping for one example run
#[derive(Debug)]
pub struct StageTracker {
    current: Stage,
}

impl StageTracker {
    pub fn new() -> Self {
        Self {
            current: Stage::Init,
        }
    }

    pub fn current(&self) -> Stage {
        self.current
    }

    /// Move to `to`, which must be the direct successor of the current stage
    pub fn advance(&mut self, to: Stage) -> SchemaStreamsResult<()> {
        if self.current.next() != Some(to) {
            return Err(SchemaStreamsError::StageOrder {
                from: self.current,
                to,
            });
        }
        info!("Stage {} -> {}", self.current, to);
        self.current = to;
        Ok(())
    }
}

impl Default for StageTracker {
    fn default() -> Self {
        Self::new()
    }
}
