//! tagsplit — split restricted-vocabulary HTML into message-sized chunks.
//!
//! Messaging protocols cap a single message at a fixed number of characters
//! and reject markup that is not well formed. [`split`] cuts a document into
//! chunks that each fit under the cap and each parse on their own:
//!
//! - Aliases are folded onto the allowed set first (`strong`→`b`, `em`→`i`,
//!   `ins`→`u`, `del`/`strike`→`s`), case-insensitively, keeping attributes.
//! - Tags open at a cut are closed at the end of the chunk and reopened, with
//!   their original attributes, at the start of the next one.
//! - Text is cut after the last newline, else after the last whitespace, and
//!   only hard-cut mid-word as a last resort. A long word that would leave a
//!   tiny fragment moves to the next chunk whole.
//! - Character entities (`&amp;`) and UTF-8 sequences are never cut.
//!
//! Lengths are counted in chars. Malformed markup is absorbed, never
//! rejected: stray closes are ignored and, once the input has to be split,
//! unclosed tags are closed in the last chunk.
//!
//! ```
//! let chunks = tagsplit::split("<b><i>alpha beta gamma</i></b>", 20, 10);
//! assert_eq!(
//!     chunks,
//!     vec!["<b><i>alpha </i></b>", "<b><i>beta </i></b>", "<b><i>gamma</i></b>"]
//! );
//! ```

mod config;
mod emitter;
mod error;
pub mod stack;
pub mod tags;
pub mod text;
pub mod token;

use tracing::debug;

pub use config::{SplitConfig, DEFAULT_MAX_CHARS, DEFAULT_MIN_CHUNK_SIZE};
pub use error::{Error, Result};
pub use stack::{TagEntry, TagStack};
pub use tags::{normalize_markup, normalize_tag, ALLOWED_TAGS, TAG_ALIASES, VOID_TAGS};
pub use token::{Token, Tokenizer};

use emitter::SplitState;

/// Split `markup` into chunks of at most `max_chars` chars.
///
/// Chunks come back in source order and none is empty. A chunk only goes
/// over `max_chars` when a single token cannot be cut (a tag, or one
/// entity/char when the reopened tags leave no room). Empty input gives an
/// empty vector.
///
/// Markup that already fits in `max_chars` after normalization comes back
/// as the only chunk, byte for byte. Unclosed tags are closed only when the
/// input actually has to be split; a fitting `"<b>unclosed"` is returned as
/// is.
pub fn split(markup: &str, max_chars: usize, min_chunk_size: usize) -> Vec<String> {
    let config = SplitConfig {
        max_chars,
        min_chunk_size,
    };
    split_with(markup, &config)
}

/// [`split`] driven by a [`SplitConfig`].
pub fn split_with(markup: &str, config: &SplitConfig) -> Vec<String> {
    let normalized = normalize_markup(markup);
    if normalized.is_empty() {
        return Vec::new();
    }

    let total = normalized.chars().count();
    if total <= config.max_chars {
        debug!(len = total, max_chars = config.max_chars, "markup fits in one chunk");
        return vec![normalized.into_owned()];
    }

    let mut state = SplitState::new(config);
    for token in Tokenizer::new(&normalized) {
        state.feed(token);
    }
    let chunks = state.finish();

    debug!(
        len = total,
        max_chars = config.max_chars,
        chunks = chunks.len(),
        "markup split"
    );
    chunks
}

/// Reusable splitter bound to one configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Splitter {
    config: SplitConfig,
}

impl Splitter {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    pub fn split(&self, markup: &str) -> Vec<String> {
        split_with(markup, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_gives_no_chunks() {
        assert!(split("", 10, 0).is_empty());
        assert!(split("", 1, 10).is_empty());
    }

    #[test]
    fn short_input_is_returned_as_is() {
        assert_eq!(split("<b>hi</b>", 100, 10), vec!["<b>hi</b>"]);
        assert_eq!(split("<b>unclosed", 100, 10), vec!["<b>unclosed"]);
    }

    #[test]
    fn unclosed_tags_are_closed_once_split() {
        assert_eq!(
            split("<b>unclosed text here", 16, 0),
            vec!["<b>unclosed </b>", "<b>text here</b>"]
        );
    }

    #[test]
    fn short_input_is_still_normalized() {
        assert_eq!(split("<strong>hi</strong>", 100, 10), vec!["<b>hi</b>"]);
    }

    #[test]
    fn word_boundaries_are_preferred() {
        assert_eq!(split("aaaa bbbb cccc", 6, 0), vec!["aaaa ", "bbbb ", "cccc"]);
    }

    #[test]
    fn newline_stays_with_the_first_chunk() {
        assert_eq!(split("first line\nsecond", 12, 0), vec!["first line\n", "second"]);
    }

    #[test]
    fn open_tags_are_closed_and_reopened() {
        let chunks = split(r#"<a href="https://e.x">one two three</a>"#, 32, 0);
        assert_eq!(
            chunks,
            vec![
                r#"<a href="https://e.x">one </a>"#,
                r#"<a href="https://e.x">two </a>"#,
                r#"<a href="https://e.x">three</a>"#,
            ]
        );
    }

    #[test]
    fn long_word_moves_to_next_chunk_whole() {
        // "<b>hello</b>" leaves 2 chars of room for a 12-char word
        let chunks = split("<b>hello</b>abcdefghijkl", 14, 5);
        assert_eq!(chunks, vec!["<b>hello</b>", "abcdefghijkl"]);
    }

    #[test]
    fn long_word_is_hard_cut_without_threshold() {
        let chunks = split("<b>hello</b>abcdefghijkl", 14, 0);
        assert_eq!(chunks, vec!["<b>hello</b>ab", "cdefghijkl"]);
    }

    #[test]
    fn splitter_uses_its_config() {
        let splitter = Splitter::new(SplitConfig::default().with_max_chars(6).with_min_chunk_size(0));
        assert_eq!(splitter.split("aaaa bbbb"), vec!["aaaa ", "bbbb"]);
        assert_eq!(splitter.config().max_chars, 6);
    }
}
