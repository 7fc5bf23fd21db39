//! Unique blob names

use std::collections::VecDeque;

use uuid::Uuid;

/// Produces the file name for each iteration
pub trait NameSource {
    fn next_name(&mut self) -> String;
}

/// Random v4 UUIDs in canonical hyphenated form
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidNames;

impl NameSource for UuidNames {
    fn next_name(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Hands out a fixed list of names first, then falls back to UUIDs
///
/// Lets a caller predict the next path, e.g. to force a collision.
#[derive(Debug, Default, Clone)]
pub struct ScriptedNames {
    queue: VecDeque<String>,
}

impl ScriptedNames {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Names not yet handed out
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl NameSource for ScriptedNames {
    fn next_name(&mut self) -> String {
        self.queue
            .pop_front()
            .unwrap_or_else(|| UuidNames.next_name())
    }
}
