//! Serves recorded interactions back in order.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Replays a cassette one operation stream at a time.
///
/// Each operation has its own queue, so calls to different operations may
/// be interleaved differently than during recording.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<String, VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Indexes the interactions of `cassette` by operation.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<String, VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues.entry(interaction.operation.clone()).or_default().push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Takes the next interaction recorded for `operation`.
    ///
    /// # Errors
    ///
    /// Returns an error naming what was requested and what remains when the
    /// cassette has no (more) interactions for `operation`.
    pub fn next_interaction(&mut self, operation: &str) -> Result<Interaction, String> {
        if let Some(interaction) = self.queues.get_mut(operation).and_then(VecDeque::pop_front) {
            return Ok(interaction);
        }
        let mut remaining: Vec<String> = self
            .queues
            .iter()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|(op, queue)| format!("{op} x{}", queue.len()))
            .collect();
        remaining.sort();
        Err(format!(
            "cassette exhausted: no interaction left for {operation:?}; remaining: [{}]",
            remaining.join(", ")
        ))
    }

    /// Total number of interactions not yet served.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }
}
