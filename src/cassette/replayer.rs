//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Serves a cassette's interactions back in recorded order, with an
/// independent queue for every `(port, method)` pair.
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
    consumed: HashMap<(String, String), u64>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues, consumed: HashMap::new() }
    }

    /// Number of interactions not yet served, across all ports.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    /// Take the next interaction for the given port and method.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the pair. The
    /// message lists what the cassette does contain.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());
        if !self.queues.contains_key(&key) {
            let mut available: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            panic!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            );
        }

        let queue = self.queues.entry(key.clone()).or_default();
        let consumed = self.consumed.entry(key).or_insert(0);
        let Some(interaction) = queue.pop_front() else {
            panic!(
                "Cassette exhausted: all {consumed} interactions for port={port:?} \
                 method={method:?} have been consumed."
            );
        };
        *consumed += 1;
        interaction
    }
}
