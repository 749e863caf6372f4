//! # Word Reveal
//!
//! A display-only replay of a finished reply, one word at a time. The reply is
//! final before the replay starts; nothing here feeds back into stored state.

use crate::constants::DEFAULT_REVEAL_WORD_DELAY_MS;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RevealConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_word_delay_ms")]
    pub word_delay_ms: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_word_delay_ms() -> u64 {
    DEFAULT_REVEAL_WORD_DELAY_MS
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            word_delay_ms: default_word_delay_ms(),
        }
    }
}

impl RevealConfig {
    pub fn word_delay(&self) -> Duration {
        Duration::from_millis(self.word_delay_ms)
    }
}

/// Iterates over growing prefixes of a text, adding one word (and a trailing
/// space) per step.
#[derive(Debug, Clone)]
pub struct WordReveal<'a> {
    words: std::str::SplitWhitespace<'a>,
    shown: String,
}

impl<'a> WordReveal<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            words: text.split_whitespace(),
            shown: String::new(),
        }
    }
}

impl Iterator for WordReveal<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let word = self.words.next()?;
        self.shown.push_str(word);
        self.shown.push(' ');
        Some(self.shown.clone())
    }
}
