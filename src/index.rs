use std::collections::BTreeMap;

use toolbox_types::{Entry, GlossPath};
use tracing::info;

/// Position of an entry in the dictionary's entry list.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub usize);

/// Trie keyed by gloss segments.
///
/// An entry is registered at every prefix of each of its gloss paths, so an
/// entry indexed under `animal / bird` is listed under `animal` too.
#[derive(Debug, Clone, Default)]
pub struct GlossIndex {
    root: GlossNode,
}

#[derive(Debug, Clone, Default)]
pub struct GlossNode {
    children: BTreeMap<String, GlossNode>,
    entries: Vec<EntryId>,
}

impl GlossIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn build(entries: &[Entry]) -> Self {
        let mut index = Self::empty();
        let mut paths = 0usize;
        for (idx, entry) in entries.iter().enumerate() {
            for path in &entry.glosses {
                index.insert(path, EntryId(idx));
                paths += 1;
            }
        }
        info!(
            "indexed {} gloss paths under {} headings ({} nodes)",
            paths,
            index.root.children.len(),
            index.node_count()
        );
        index
    }

    /// Register `id` at every node along `path`. Walking stops at the first
    /// blank segment.
    pub fn insert(&mut self, path: &GlossPath, id: EntryId) {
        let mut node = &mut self.root;
        for segment in path.segments() {
            if segment.trim().is_empty() {
                break;
            }
            node = node.children.entry(segment.clone()).or_default();
            if node.entries.last() != Some(&id) {
                node.entries.push(id);
            }
        }
    }

    /// Node reached by following `path` from the root.
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&GlossNode> {
        path.iter()
            .try_fold(&self.root, |node, segment| node.child(segment.as_ref()))
    }

    /// Top-level heading keys with their nodes, in key order.
    pub fn headings(&self) -> impl Iterator<Item = (&str, &GlossNode)> + '_ {
        self.root.children()
    }

    pub fn node_count(&self) -> usize {
        fn count(node: &GlossNode) -> usize {
            node.children.values().map(|c| 1 + count(c)).sum()
        }
        count(&self.root)
    }
}

impl GlossNode {
    /// Entries registered at exactly this prefix.
    pub fn entries(&self) -> &[EntryId] {
        &self.entries
    }

    pub fn child(&self, segment: &str) -> Option<&GlossNode> {
        self.children.get(segment)
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &GlossNode)> + '_ {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(paths: &[&[&str]]) -> Entry {
        Entry {
            headwords: vec!["x".into()],
            glosses: paths
                .iter()
                .map(|p| GlossPath::new(p.iter().map(|s| s.to_string()).collect()))
                .collect(),
            ..Entry::default()
        }
    }

    #[test]
    fn registers_entry_at_every_prefix() {
        let entries = vec![entry(&[&["animal", "bird"]])];
        let index = GlossIndex::build(&entries);
        assert_eq!(index.get(&["animal"]).unwrap().entries(), &[EntryId(0)]);
        assert_eq!(index.get(&["animal", "bird"]).unwrap().entries(), &[EntryId(0)]);
        assert!(index.get(&["bird"]).is_none());
        assert_eq!(index.node_count(), 2);
    }

    #[test]
    fn shared_prefix_registers_once() {
        let entries = vec![entry(&[&["dog"], &["dog", "wild dog"]])];
        let index = GlossIndex::build(&entries);
        assert_eq!(index.get(&["dog"]).unwrap().entries(), &[EntryId(0)]);
        assert_eq!(index.get(&["dog"]).unwrap().children().count(), 1);
    }

    #[test]
    fn shape_does_not_depend_on_insertion_order() {
        let a = entry(&[&["dog", "feral"]]);
        let b = entry(&[&["dog"], &["cat"]]);
        let forward = GlossIndex::build(&[a.clone(), b.clone()]);
        let backward = GlossIndex::build(&[b, a]);
        let keys = |idx: &GlossIndex| -> Vec<String> {
            idx.headings().map(|(k, _)| k.to_string()).collect()
        };
        assert_eq!(keys(&forward), keys(&backward));
        assert_eq!(forward.node_count(), backward.node_count());
        assert!(backward.get(&["dog", "feral"]).is_some());
    }

    #[test]
    fn blank_segments_are_not_indexed() {
        let entries = vec![entry(&[&["dog", " "]])];
        let index = GlossIndex::build(&entries);
        assert_eq!(index.node_count(), 1);
    }
}
