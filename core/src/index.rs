use serde::Serialize;
use std::collections::HashMap;

pub type TermId = u32;
pub type DocId = u32;

/// Bijective mapping from term to a dense index in `[0, len)`.
///
/// Indices are handed out in first-seen order and never change afterwards.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    ids: HashMap<String, TermId>,
    terms: Vec<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn get(&self, term: &str) -> Option<TermId> {
        self.ids.get(term).copied()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.ids.contains_key(term)
    }

    pub fn term(&self, id: TermId) -> Option<&str> {
        self.terms.get(id as usize).map(String::as_str)
    }

    /// Terms in index order.
    pub fn iter(&self) -> impl Iterator<Item = (TermId, &str)> + '_ {
        self.terms.iter().enumerate().map(|(i, t)| (i as TermId, t.as_str()))
    }

    pub(crate) fn intern(&mut self, term: &str) -> TermId {
        if let Some(&id) = self.ids.get(term) {
            return id;
        }
        let id = self.terms.len() as TermId;
        self.terms.push(term.to_string());
        self.ids.insert(term.to_string(), id);
        id
    }
}

/// Term-frequency vector over a [`Vocabulary`].
///
/// Logically dense (one slot per vocabulary term), stored as `(term, count)`
/// pairs sorted by term id with zero counts omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermFrequencies {
    entries: Vec<(TermId, u32)>,
    total: u64,
}

impl TermFrequencies {
    pub fn from_counts(counts: HashMap<TermId, u32>) -> Self {
        let mut entries: Vec<(TermId, u32)> = counts.into_iter().filter(|(_, c)| *c > 0).collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        let total = entries.iter().map(|(_, c)| u64::from(*c)).sum();
        Self { entries, total }
    }

    /// Raw count for `term`, zero when absent.
    pub fn get(&self, term: TermId) -> u32 {
        match self.entries.binary_search_by_key(&term, |(id, _)| *id) {
            Ok(pos) => self.entries[pos].1,
            Err(_) => 0,
        }
    }

    /// Sum of all counts (the document length).
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct terms with a nonzero count.
    pub fn distinct_terms(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nonzero entries in term id order.
    pub fn iter(&self) -> impl Iterator<Item = (TermId, u32)> + '_ {
        self.entries.iter().copied()
    }

    /// Materialize the dense vector of length `vocabulary_size`.
    pub fn to_dense(&self, vocabulary_size: usize) -> Vec<u32> {
        let mut dense = vec![0; vocabulary_size];
        for &(id, count) in &self.entries {
            if let Some(slot) = dense.get_mut(id as usize) {
                *slot = count;
            }
        }
        dense
    }
}

/// A corpus document: its identifier and term-frequency vector.
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    pub doc_id: DocId,
    pub name: String,
    pub frequencies: TermFrequencies,
}

impl DocumentRecord {
    pub fn len(&self) -> u64 {
        self.frequencies.total()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.total() == 0
    }
}

/// A ranked result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDocument {
    pub name: String,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_stable() {
        let mut v = Vocabulary::new();
        assert_eq!(v.intern("rust"), 0);
        assert_eq!(v.intern("search"), 1);
        assert_eq!(v.intern("rust"), 0);
        assert_eq!(v.len(), 2);
        assert_eq!(v.term(1), Some("search"));
        assert_eq!(v.get("missing"), None);
    }

    #[test]
    fn sparse_vector_reads_like_dense() {
        let counts: HashMap<TermId, u32> = [(3, 2), (0, 5), (1, 0)].into_iter().collect();
        let tf = TermFrequencies::from_counts(counts);
        assert_eq!(tf.total(), 7);
        assert_eq!(tf.distinct_terms(), 2);
        assert_eq!(tf.get(0), 5);
        assert_eq!(tf.get(1), 0);
        assert_eq!(tf.get(3), 2);
        assert_eq!(tf.to_dense(5), vec![5, 0, 0, 2, 0]);
    }
}
