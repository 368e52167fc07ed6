use std::collections::VecDeque;

use crate::error::Result;

/// A discrete event from the keyboard or window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent<K> {
    KeyDown(K),
    KeyUp(K),
    Quit,
}

/// Anything that can report the events since the previous poll.
pub trait InputSource {
    type Key;

    /// Return every pending event without blocking.
    fn poll_events(&mut self) -> Result<Vec<InputEvent<Self::Key>>>;
}

/// Replays prepared batches, one batch per poll.
///
/// Once the script runs out every further poll reports `Quit`.
#[derive(Debug, Clone)]
pub struct ScriptedInput<K> {
    batches: VecDeque<Vec<InputEvent<K>>>,
}

impl<K> ScriptedInput<K> {
    pub fn new() -> Self {
        Self {
            batches: VecDeque::new(),
        }
    }

    /// Queue the events reported by the next poll.
    pub fn then(mut self, events: impl IntoIterator<Item = InputEvent<K>>) -> Self {
        self.batches.push_back(events.into_iter().collect());
        self
    }

    /// Queue `frames` polls that report nothing.
    pub fn idle(mut self, frames: usize) -> Self {
        self.batches.extend((0..frames).map(|_| Vec::new()));
        self
    }

    pub fn remaining(&self) -> usize {
        self.batches.len()
    }
}

impl<K> Default for ScriptedInput<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> InputSource for ScriptedInput<K> {
    type Key = K;

    fn poll_events(&mut self) -> Result<Vec<InputEvent<K>>> {
        Ok(self
            .batches
            .pop_front()
            .unwrap_or_else(|| vec![InputEvent::Quit]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_replay_in_order_then_quit() {
        let mut input = ScriptedInput::new()
            .then([InputEvent::KeyDown('a')])
            .idle(1)
            .then([InputEvent::KeyUp('a')]);

        assert_eq!(input.poll_events().unwrap(), vec![InputEvent::KeyDown('a')]);
        assert!(input.poll_events().unwrap().is_empty());
        assert_eq!(input.poll_events().unwrap(), vec![InputEvent::KeyUp('a')]);
        assert_eq!(input.poll_events().unwrap(), vec![InputEvent::Quit]);
        assert_eq!(input.remaining(), 0);
    }
}
