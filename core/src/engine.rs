use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::index::{DocId, DocumentRecord, ScoredDocument, TermFrequencies, TermId, Vocabulary};
use crate::normalizer::Normalizer;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Summary numbers of a built engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineStats {
    pub documents: usize,
    pub terms: usize,
    pub tokens: u64,
    pub average_document_length: f32,
    pub saturation: f32,
}

/// Vector-space ranking model over an immutable corpus.
///
/// An engine only exists once its build succeeded; every field is read-only
/// afterwards, so `search` can run from many threads at once.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    config: EngineConfig,
    vocabulary: Vocabulary,
    documents: Vec<DocumentRecord>,
    document_frequency: Vec<u32>,
    collection_frequency: Vec<u64>,
    idf: Vec<f32>,
    average_document_length: f32,
}

/// Build-local state collected while scanning the corpus.
#[derive(Default)]
struct CorpusAccumulator {
    vocabulary: Vocabulary,
    collection_frequency: Vec<u64>,
    documents: Vec<DocumentRecord>,
    names: HashSet<String>,
}

impl CorpusAccumulator {
    fn add(&mut self, name: String, text: &str) -> Result<()> {
        if !self.names.insert(name.clone()) {
            return Err(Error::DuplicateDocument(name));
        }
        let mut counts: HashMap<TermId, u32> = HashMap::new();
        for term in text.split_whitespace() {
            let tid = self.vocabulary.intern(term);
            if self.collection_frequency.len() <= tid as usize {
                self.collection_frequency.resize(tid as usize + 1, 0);
            }
            self.collection_frequency[tid as usize] += 1;
            *counts.entry(tid).or_insert(0) += 1;
        }
        let doc_id = self.documents.len() as DocId;
        self.documents.push(DocumentRecord { doc_id, name, frequencies: TermFrequencies::from_counts(counts) });
        Ok(())
    }

    fn finish(self, config: EngineConfig) -> SearchEngine {
        let n = self.documents.len();
        let mut document_frequency = vec![0u32; self.vocabulary.len()];
        for doc in &self.documents {
            for (tid, _) in doc.frequencies.iter() {
                document_frequency[tid as usize] += 1;
            }
        }
        let idf = document_frequency
            .iter()
            .map(|&df| (n as f32 / df as f32).ln())
            .collect();
        let tokens: u64 = self.documents.iter().map(DocumentRecord::len).sum();
        let average_document_length = tokens as f32 / n as f32;

        SearchEngine {
            config,
            vocabulary: self.vocabulary,
            documents: self.documents,
            document_frequency,
            collection_frequency: self.collection_frequency,
            idf,
            average_document_length,
        }
    }
}

impl SearchEngine {
    /// Scan `corpus` (one pre-normalized file per document) and build the model.
    ///
    /// Files are read in file-name order, which fixes the tie-break order of
    /// equal scores. Sub-directories are skipped.
    pub fn build<P: AsRef<Path>>(corpus: P, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let corpus = corpus.as_ref();
        match fs::metadata(corpus) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(Error::NotADirectory(corpus.to_path_buf())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::CorpusNotFound(corpus.to_path_buf()))
            }
            Err(e) => return Err(Error::io(corpus, e)),
        }

        let mut acc = CorpusAccumulator::default();
        let walker = WalkDir::new(corpus).min_depth(1).max_depth(1).sort_by_file_name();
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(corpus).to_path_buf();
                Error::io(path, e.into())
            })?;
            let path = entry.path();
            if !path.is_file() {
                tracing::warn!(path = %path.display(), "skipping non-file corpus entry");
                continue;
            }
            let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            acc.add(name, &text)?;
        }

        if acc.documents.is_empty() {
            return Err(Error::EmptyCorpus(corpus.to_path_buf()));
        }
        let engine = acc.finish(config);
        tracing::info!(
            corpus = %corpus.display(),
            num_docs = engine.document_count(),
            num_terms = engine.vocabulary.len(),
            avg_doc_len = engine.average_document_length,
            "search engine built"
        );
        Ok(engine)
    }

    /// Build from in-memory `(name, normalized text)` pairs, in the given order.
    pub fn from_documents<I, N, T>(documents: I, config: EngineConfig) -> Result<Self>
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: AsRef<str>,
    {
        config.validate()?;
        let mut acc = CorpusAccumulator::default();
        for (name, text) in documents {
            acc.add(name.into(), text.as_ref())?;
        }
        if acc.documents.is_empty() {
            return Err(Error::EmptyCorpus("<memory>".into()));
        }
        Ok(acc.finish(config))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn documents(&self) -> &[DocumentRecord] {
        &self.documents
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn average_document_length(&self) -> f32 {
        self.average_document_length
    }

    /// IDF weights indexed by term id.
    pub fn idf(&self) -> &[f32] {
        &self.idf
    }

    pub fn term_idf(&self, term: &str) -> Option<f32> {
        self.vocabulary.get(term).map(|tid| self.idf[tid as usize])
    }

    /// Number of documents containing `term` at least once.
    pub fn document_frequency(&self, term: &str) -> u32 {
        self.vocabulary.get(term).map_or(0, |tid| self.document_frequency[tid as usize])
    }

    /// Occurrences of `term` across the whole corpus.
    pub fn collection_frequency(&self, term: &str) -> u64 {
        self.vocabulary.get(term).map_or(0, |tid| self.collection_frequency[tid as usize])
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            documents: self.document_count(),
            terms: self.vocabulary.len(),
            tokens: self.documents.iter().map(DocumentRecord::len).sum(),
            average_document_length: self.average_document_length,
            saturation: self.config.saturation,
        }
    }

    /// Count query terms against the vocabulary. Unknown terms are dropped.
    pub fn vectorize<S: AsRef<str>>(&self, query_terms: &[S]) -> TermFrequencies {
        let mut counts: HashMap<TermId, u32> = HashMap::new();
        for term in query_terms {
            if let Some(tid) = self.vocabulary.get(term.as_ref()) {
                *counts.entry(tid).or_insert(0) += 1;
            }
        }
        TermFrequencies::from_counts(counts)
    }

    /// Score of one document against a query vector.
    ///
    /// `freq_norm = len(d) / (avgdl * k + tf)` and the term contributes
    /// `q_tf * (tf / freq_norm) * idf`. Terms missing from the document add nothing.
    pub fn score(&self, doc: &DocumentRecord, query: &TermFrequencies) -> f32 {
        let doc_len = doc.len() as f32;
        let saturation = self.average_document_length * self.config.saturation;
        query
            .iter()
            .map(|(tid, q_tf)| {
                let d_tf = doc.frequencies.get(tid);
                if d_tf == 0 {
                    return 0.0;
                }
                let d_tf = d_tf as f32;
                let freq_norm = doc_len / (saturation + d_tf);
                q_tf as f32 * (d_tf / freq_norm) * self.idf[tid as usize]
            })
            // f32's Sum starts at -0.0; unmatched documents must report +0.0
            .fold(0.0, |acc, contribution| acc + contribution)
    }

    /// Identifiers of the `top_k` best documents for already-normalized terms.
    pub fn search<S: AsRef<str>>(&self, query_terms: &[S], top_k: usize) -> Vec<String> {
        self.search_scored(query_terms, top_k).into_iter().map(|hit| hit.name).collect()
    }

    /// Like [`SearchEngine::search`] but keeps the scores.
    ///
    /// Every document is ranked, including those scoring zero; equal scores
    /// keep corpus order.
    pub fn search_scored<S: AsRef<str>>(&self, query_terms: &[S], top_k: usize) -> Vec<ScoredDocument> {
        if query_terms.is_empty() || top_k == 0 {
            return Vec::new();
        }
        let query = self.vectorize(query_terms);
        let mut scored: Vec<(usize, f32)> = self
            .documents
            .iter()
            .enumerate()
            .map(|(i, doc)| (i, self.score(doc, &query)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scored.truncate(top_k);
        tracing::debug!(
            terms = query_terms.len(),
            matched = query.distinct_terms(),
            returned = scored.len(),
            "search"
        );
        scored
            .into_iter()
            .map(|(i, score)| ScoredDocument { name: self.documents[i].name.clone(), score })
            .collect()
    }

    /// Normalize a raw query string and search with it.
    pub fn search_text(&self, normalizer: &Normalizer, raw_query: &str, top_k: usize) -> Vec<ScoredDocument> {
        let terms = normalizer.process(raw_query);
        self.search_scored(&terms, top_k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(docs: &[(&str, &str)]) -> SearchEngine {
        SearchEngine::from_documents(docs.iter().copied(), EngineConfig::default()).unwrap()
    }

    #[test]
    fn score_follows_length_normalized_formula() {
        let e = engine(&[("a", "rust rust rust rust rust"), ("b", "rust python"), ("c", "python java")]);
        assert!((e.average_document_length() - 3.0).abs() < 1e-6);
        let hits = e.search_scored(&["rust"], 3);
        let idf = 1.5f32.ln();
        // a: len 5, freq_norm = 5 / (3 + 5) -> tf / freq_norm = 8
        assert!((hits[0].score - 8.0 * idf).abs() < 1e-5);
        // b: len 2, freq_norm = 2 / (3 + 1) -> tf / freq_norm = 2
        assert!((hits[1].score - 2.0 * idf).abs() < 1e-5);
        assert_eq!(hits[2].score, 0.0);
    }

    #[test]
    fn repeated_query_terms_multiply_the_score() {
        let e = engine(&[("a", "rust search"), ("b", "python")]);
        let once = e.search_scored(&["rust"], 1)[0].score;
        let twice = e.search_scored(&["rust", "rust"], 1)[0].score;
        assert!((twice - 2.0 * once).abs() < 1e-5);
    }

    #[test]
    fn saturation_changes_scores_not_order() {
        let docs = [("a", "rust rust rust"), ("b", "rust go go go"), ("c", "go")];
        let low = SearchEngine::from_documents(docs, EngineConfig::with_saturation(0.5)).unwrap();
        let high = SearchEngine::from_documents(docs, EngineConfig::with_saturation(2.0)).unwrap();
        assert_eq!(low.search(&["rust"], 3), high.search(&["rust"], 3));
        assert!(low.search_scored(&["rust"], 1)[0].score < high.search_scored(&["rust"], 1)[0].score);
    }

    #[test]
    fn empty_documents_score_zero() {
        let e = engine(&[("blank", ""), ("full", "rust")]);
        let hits = e.search_scored(&["rust"], 2);
        assert_eq!(hits[0].name, "full");
        assert_eq!(hits[1].score, 0.0);
        assert!(hits[1].score.is_sign_positive());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = SearchEngine::from_documents([("a", "x"), ("a", "y")], EngineConfig::default()).unwrap_err();
        assert!(matches!(err, Error::DuplicateDocument(name) if name == "a"));
    }

    #[test]
    fn collection_frequency_counts_every_occurrence() {
        let e = engine(&[("a", "rust rust"), ("b", "rust")]);
        assert_eq!(e.collection_frequency("rust"), 3);
        assert_eq!(e.document_frequency("rust"), 2);
        assert_eq!(e.collection_frequency("go"), 0);
    }
}
