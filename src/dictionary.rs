use std::collections::HashMap;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use toolbox_db::{BuiltEntries, ToolboxError, load_entries};
use toolbox_tagger::{TagError, Tagger, expand_conventions, pick_sense, tag_all};
use toolbox_types::{Entry, Warning};
use tracing::info;

use crate::headings::{Heading, MatchContext, assemble};
use crate::index::GlossIndex;

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error(transparent)]
    Toolbox(#[from] ToolboxError),
    #[error(transparent)]
    Tag(#[from] TagError),
}

/// Entries, their gloss index and the text used to match senses to headings.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: Vec<Entry>,
    index: GlossIndex,
    /// Match text per entry; canonical subsenses until a tagger runs.
    senses: Vec<Vec<String>>,
    /// Processed match text for top-level gloss keys.
    heading_text: HashMap<String, String>,
    warnings: Vec<Warning>,
}

/// The finished, ordered output plus every warning raised on the way.
#[derive(Debug, Clone, Serialize)]
pub struct HeadingTree<'a> {
    pub headings: Vec<Heading<'a>>,
    pub warnings: Vec<Warning>,
}

impl Dictionary {
    /// Parse toolbox text and build the dictionary.
    pub fn from_toolbox(text: &str) -> Result<Self, DictionaryError> {
        Ok(Self::from_entries(load_entries(text)?))
    }

    pub fn from_entries(built: BuiltEntries) -> Self {
        let BuiltEntries { entries, warnings } = built;
        let index = GlossIndex::build(&entries);
        let senses = entries
            .iter()
            .map(|e| e.subsenses().map(|s| s.canonical.clone()).collect())
            .collect();
        Self {
            entries,
            index,
            senses,
            heading_text: HashMap::new(),
            warnings,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn index(&self) -> &GlossIndex {
        &self.index
    }

    /// Strings currently used to match `entries()[idx]` against headings.
    pub fn match_senses(&self, idx: usize) -> &[String] {
        self.senses.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Replace match text with tagger-processed senses and heading keys.
    ///
    /// Every distinct string is tagged once. A failed batch fails the whole
    /// call and leaves nothing half-applied.
    pub fn tag_with<T: Tagger + ?Sized>(
        mut self,
        tagger: &T,
        chunk_size: usize,
    ) -> Result<Self, DictionaryError> {
        let start = Instant::now();
        let mut inputs: Vec<String> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut intern = |text: String| -> Option<usize> {
            if text.trim().is_empty() {
                return None;
            }
            if let Some(&pos) = positions.get(&text) {
                return Some(pos);
            }
            let pos = inputs.len();
            positions.insert(text.clone(), pos);
            inputs.push(text);
            Some(pos)
        };

        let sense_slots: Vec<Vec<Option<usize>>> = self
            .senses
            .iter()
            .map(|senses| senses.iter().map(|s| intern(expand_conventions(s))).collect())
            .collect();
        let key_slots: Vec<(String, Option<usize>)> = self
            .index
            .headings()
            .map(|(key, _)| (key.to_string(), intern(expand_conventions(key))))
            .collect();

        let tagged = tag_all(tagger, &inputs, chunk_size)?;
        let processed: Vec<String> = tagged.iter().map(|tokens| pick_sense(tokens)).collect();

        for (senses, slots) in self.senses.iter_mut().zip(sense_slots) {
            for (sense, slot) in senses.iter_mut().zip(slots) {
                if let Some(pos) = slot {
                    *sense = processed[pos].clone();
                }
            }
        }
        self.heading_text = key_slots
            .into_iter()
            .filter_map(|(key, slot)| slot.map(|pos| (key, processed[pos].clone())))
            .collect();

        info!(
            "tagged {} distinct strings in {} ms",
            inputs.len(),
            start.elapsed().as_millis()
        );
        Ok(self)
    }

    /// Assemble the sorted heading tree.
    pub fn headings(&self) -> HeadingTree<'_> {
        let start = Instant::now();
        let mut warnings = self.warnings.clone();
        let ctx = MatchContext {
            entries: &self.entries,
            senses: &self.senses,
            heading_text: &self.heading_text,
        };
        let headings = assemble(&self.index, &ctx, &mut warnings);
        info!(
            "assembled {} headings in {} ms",
            headings.len(),
            start.elapsed().as_millis()
        );
        HeadingTree { headings, warnings }
    }
}
