//! Hidden-token deck for one approved turn.
//!
//! A bag of good and evil tokens is built fresh each turn and `draw_count`
//! tokens are drawn without replacement. The leader removes one token while
//! the deck is full, the executor removes the rest until one remains, and the
//! last token is revealed without a player action.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::DeckConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Token {
    Good,
    Evil,
}

/// Who holds removal authority at the current deck size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStep {
    Leader,
    Executor,
}

/// What a removal left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// More removals are due; `next` holds authority.
    Continue { next: SelectionStep, remaining: usize },
    /// One token left; it is ready for the automatic reveal.
    ReadyToReveal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    tokens: Vec<Token>,
    draw_count: usize,
}

impl Deck {
    /// Build the bag and draw `draw_count` tokens by repeated uniform index removal.
    pub fn draw<R: Rng + ?Sized>(config: &DeckConfig, rng: &mut R) -> Self {
        let mut bag = Vec::with_capacity(config.good_tokens + config.evil_tokens);
        bag.extend(std::iter::repeat_n(Token::Good, config.good_tokens));
        bag.extend(std::iter::repeat_n(Token::Evil, config.evil_tokens));

        let draw_count = config.draw_count.min(bag.len());
        let mut tokens = Vec::with_capacity(draw_count);
        for _ in 0..draw_count {
            let idx = rng.random_range(0..bag.len());
            tokens.push(bag.swap_remove(idx));
        }

        Self { tokens, draw_count }
    }

    /// Deck with fixed contents; used by tests and replay tooling.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        let draw_count = tokens.len();
        Self { tokens, draw_count }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    /// Removal authority at the current size; `None` once a single token remains.
    pub fn step(&self) -> Option<SelectionStep> {
        match self.tokens.len() {
            n if n <= 1 => None,
            n if n == self.draw_count => Some(SelectionStep::Leader),
            _ => Some(SelectionStep::Executor),
        }
    }

    /// Remove the token at `position`; remaining tokens keep their order.
    ///
    /// `None` if no removal is due or the position is out of range.
    pub fn remove_at(&mut self, position: usize) -> Option<Removal> {
        self.step()?;
        if position >= self.tokens.len() {
            return None;
        }
        self.tokens.remove(position);

        Some(match self.step() {
            Some(next) => Removal::Continue {
                next,
                remaining: self.tokens.len(),
            },
            None => Removal::ReadyToReveal,
        })
    }

    /// Take the final token, leaving the deck empty.
    pub fn take_final(&mut self) -> Option<Token> {
        if self.tokens.len() != 1 {
            return None;
        }
        self.tokens.pop()
    }
}
