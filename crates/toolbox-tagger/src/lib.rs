//! Part-of-speech/lemma tagging boundary for dictionary senses.
//!
//! The dictionary never tags text itself. It hands batches of strings to a
//! caller-supplied [`Tagger`] and reduces each tagged result to the form used
//! for heading matching with [`pick_sense`]. Taggers are expected to be slow
//! per call, so [`tag_all`] submits inputs in large chunks and fails the whole
//! run if any chunk comes back with the wrong number of results.
//!
//! # How it works
//! 1. Expand dictionary shorthand (`s.o.`, `s/he`, ...) with [`expand_conventions`].
//! 2. Tag every distinct string once through [`tag_all`].
//! 3. Drop leading subject and trailing object pronouns and lemmatize verbs
//!    with [`pick_sense`].
//!
//! # Example
//! ```rust
//! use toolbox_tagger::{WhitespaceTagger, expand_conventions, pick_sense, tag_all};
//!
//! # fn main() -> Result<(), toolbox_tagger::TagError> {
//! let inputs = vec![expand_conventions("s/he sees s.o.")];
//! let tagged = tag_all(&WhitespaceTagger, &inputs, 3000)?;
//! assert_eq!(pick_sense(&tagged[0]), "sees");
//! # Ok(()) }
//! ```
//!
//! For the Stanford CoreNLP wire format, see [`corenlp`].

pub mod corenlp;

use std::error::Error as StdError;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Chunk size the CoreNLP server handles comfortably in one request.
pub const DEFAULT_CHUNK_SIZE: usize = 3000;

/// One token of tagger output.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct TaggedToken {
    pub surface: String,
    pub tag: String,
    pub lemma: String,
}

impl TaggedToken {
    pub fn new(surface: impl Into<String>, tag: impl Into<String>, lemma: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            tag: tag.into(),
            lemma: lemma.into(),
        }
    }

    fn is_verb(&self) -> bool {
        self.tag.starts_with('V')
    }
}

#[derive(Debug, Error)]
pub enum TagError {
    #[error("tagger transport failed: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),
    #[error("failed to decode tagger response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("tagger returned {got} results for a batch of {expected} strings")]
    LengthMismatch { expected: usize, got: usize },
}

/// A batched tagger: one token list per input string, in input order.
pub trait Tagger {
    fn tag(&self, batch: &[String]) -> Result<Vec<Vec<TaggedToken>>, TagError>;
}

impl<T: Tagger + ?Sized> Tagger for &T {
    fn tag(&self, batch: &[String]) -> Result<Vec<Vec<TaggedToken>>, TagError> {
        (**self).tag(batch)
    }
}

/// Tag `inputs` in chunks of `chunk_size`, checking every chunk maps 1:1.
pub fn tag_all<T: Tagger + ?Sized>(
    tagger: &T,
    inputs: &[String],
    chunk_size: usize,
) -> Result<Vec<Vec<TaggedToken>>, TagError> {
    let chunk_size = chunk_size.max(1);
    let mut out = Vec::with_capacity(inputs.len());
    for (n, chunk) in inputs.chunks(chunk_size).enumerate() {
        debug!("tagging batch {} ({} strings)", n + 1, chunk.len());
        let tagged = tagger.tag(chunk)?;
        if tagged.len() != chunk.len() {
            return Err(TagError::LengthMismatch {
                expected: chunk.len(),
                got: tagged.len(),
            });
        }
        out.extend(tagged);
    }
    Ok(out)
}

/// Tagger stand-in: whitespace tokens, untagged, each its own lemma.
#[derive(Clone, Copy, Debug, Default)]
pub struct WhitespaceTagger;

impl Tagger for WhitespaceTagger {
    fn tag(&self, batch: &[String]) -> Result<Vec<Vec<TaggedToken>>, TagError> {
        Ok(batch
            .iter()
            .map(|s| {
                s.split_whitespace()
                    .map(|w| TaggedToken::new(w, "", w))
                    .collect()
            })
            .collect())
    }
}

/// Rewrite definition shorthand into plain words.
pub fn expand_conventions(text: &str) -> String {
    text.replace("s.o.", "someone")
        .replace("s.t.", "something")
        .replace("S/he", "she")
        .replace("s/he", "she")
}

const LEADING_DROPS: [&str; 2] = ["she", "my"];
const TRAILING_DROPS: [&str; 2] = ["someone", "something"];

/// Reduce a tagged sense to its matchable core.
///
/// A leading `she`/`my` and a trailing `someone`/`something` are dropped as
/// long as another token remains; verbs are replaced by their lemma.
pub fn pick_sense(tokens: &[TaggedToken]) -> String {
    let mut tokens = tokens;
    if let [first, rest @ ..] = tokens
        && !rest.is_empty()
        && LEADING_DROPS.contains(&first.lemma.trim())
    {
        tokens = rest;
    }
    if let [rest @ .., last] = tokens
        && !rest.is_empty()
        && TRAILING_DROPS.contains(&last.lemma.trim())
    {
        tokens = rest;
    }
    tokens
        .iter()
        .map(|t| if t.is_verb() { t.lemma.as_str() } else { t.surface.as_str() })
        .collect::<Vec<_>>()
        .join(" ")
}
