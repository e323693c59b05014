//! Named markup blocks filled in while templates render.
//!
//! A layout declares a block (`head`, `scripts`, ...) and any template
//! rendered later in the same pass can append to it, prepend to it or
//! replace it. Each mutation is traced.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;

use crate::diagnostic::TraceSink;

/// How a part is added to a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlockMethod {
    /// Add after the existing parts.
    Append,
    /// Add before the existing parts.
    Prepend,
    /// Drop existing parts and keep only this one.
    #[default]
    Replace,
}

impl FromStr for BlockMethod {
    type Err = std::convert::Infallible;

    /// Unknown names fall back to [`BlockMethod::Replace`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "append" => Self::Append,
            "prepend" => Self::Prepend,
            _ => Self::Replace,
        })
    }
}

/// Ordered parts of one named block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    name: String,
    parts: VecDeque<String>,
}

impl Block {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            parts: VecDeque::new(),
        }
    }

    /// Block name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parts in render order.
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(String::as_str)
    }

    /// Check if the block has no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    fn apply(&mut self, markup: String, method: BlockMethod, sink: &impl TraceSink) {
        let name = &self.name;
        match method {
            BlockMethod::Append => {
                sink.push(&format!("    ↓ append part to block \"{name}\""));
                self.parts.push_back(markup);
            }
            BlockMethod::Prepend => {
                sink.push(&format!("    ↑ prepend part to block \"{name}\""));
                self.parts.push_front(markup);
            }
            BlockMethod::Replace => {
                if self.parts.is_empty() {
                    sink.push(&format!("    → set content for block \"{name}\""));
                } else {
                    sink.push(&format!("    ↔ replace content in block \"{name}\""));
                }
                self.parts.clear();
                self.parts.push_back(markup);
            }
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(part)?;
        }
        Ok(())
    }
}

/// All blocks of one render pass.
pub struct Blocks<S> {
    slots: FxHashMap<String, Block>,
    sink: S,
}

impl<S: TraceSink> Blocks<S> {
    /// Create an empty block set tracing to `sink`.
    pub fn new(sink: S) -> Self {
        Self {
            slots: FxHashMap::default(),
            sink,
        }
    }

    /// Add `markup` to block `name`, creating the block on first use.
    pub fn block(&mut self, name: &str, markup: impl Into<String>, method: BlockMethod) -> &Block {
        let slot = self
            .slots
            .entry(name.to_owned())
            .or_insert_with(|| Block::new(name));
        slot.apply(markup.into(), method, &self.sink);
        slot
    }

    /// Joined content of block `name`; empty if it was never filled.
    ///
    /// Only blocks that exist are traced.
    pub fn render(&self, name: &str) -> String {
        let Some(block) = self.slots.get(name) else {
            return String::new();
        };
        self.sink.push(&format!("    ← get content from block \"{name}\""));
        block.to_string()
    }

    /// Block `name`, without tracing.
    pub fn get(&self, name: &str) -> Option<&Block> {
        self.slots.get(name)
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no block exists.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
