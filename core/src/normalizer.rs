use crate::config::NormalizerConfig;
use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::fs;
use std::ops::Range;
use std::str::FromStr;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    // Word runs (apostrophes and hyphens included, split further by `word_pieces`) or runs of punctuation.
    static ref WORD_RE: Regex = Regex::new(r"(?u)[\w'\-]+|[^\w\s]+").expect("valid regex");
    static ref DASHES_RE: Regex = Regex::new(r"-{2,}").expect("valid regex");
}

/// Contraction and possessive endings split off their word (`can't` -> `ca` + `n't`).
const CLITICS: &[&str] = &["n't", "'s", "'m", "'d", "'re", "'ve", "'ll"];

const ENGLISH_STOPWORDS: &[&str] = &[
    "i","me","my","myself","we","our","ours","ourselves","you","you're","you've","you'll","you'd",
    "your","yours","yourself","yourselves","he","him","his","himself","she","she's","her","hers","herself",
    "it","it's","its","itself","they","them","their","theirs","themselves",
    "what","which","who","whom","this","that","that'll","these","those",
    "am","is","are","was","were","be","been","being","have","has","had","having","do","does","did","doing",
    "a","an","the","and","but","if","or","because","as","until","while",
    "of","at","by","for","with","about","against","between","into","through","during","before","after",
    "above","below","to","from","up","down","in","out","on","off","over","under",
    "again","further","then","once","here","there","when","where","why","how",
    "all","any","both","each","few","more","most","other","some","such",
    "no","nor","not","only","own","same","so","than","too","very",
    "s","t","can","will","just","don","don't","should","should've","now",
    "d","ll","m","o","re","ve","y","ain","aren","aren't","couldn","couldn't","didn","didn't",
    "doesn","doesn't","hadn","hadn't","hasn","hasn't","haven","haven't","isn","isn't","ma",
    "mightn","mightn't","mustn","mustn't","needn","needn't","shan","shan't","shouldn","shouldn't",
    "wasn","wasn't","weren","weren't","won","won't","wouldn","wouldn't",
];

/// Languages with both a built-in stopword list and a stemmer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
}

impl Language {
    fn algorithm(self) -> Algorithm {
        match self {
            Language::English => Algorithm::English,
        }
    }

    fn stopwords(self) -> &'static [&'static str] {
        match self {
            Language::English => ENGLISH_STOPWORDS,
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            _ => Err(Error::UnsupportedLanguage(s.to_string())),
        }
    }
}

/// Turns raw text into the stems used as vocabulary terms.
///
/// The same normalizer must be used for the corpus and for queries, otherwise
/// query stems will not line up with the vocabulary.
pub struct Normalizer {
    language: Language,
    stopwords: HashSet<String>,
    stemmer: Stemmer,
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("language", &self.language)
            .field("stopwords", &self.stopwords.len())
            .finish()
    }
}

impl Normalizer {
    /// Build a normalizer from its configuration. Fails if the language is
    /// unknown or the supplementary stopword file cannot be read.
    pub fn new(config: &NormalizerConfig) -> Result<Self> {
        let language: Language = config.language.parse()?;
        let mut stopwords: HashSet<String> =
            language.stopwords().iter().map(|w| w.to_string()).collect();
        if let Some(path) = &config.stopwords_path {
            let extra = fs::read_to_string(path)
                .map_err(|source| Error::Stopwords { path: path.clone(), source })?;
            let before = stopwords.len();
            stopwords.extend(extra.lines().filter(|l| !l.is_empty()).map(str::to_string));
            tracing::debug!(path = %path.display(), added = stopwords.len() - before, "loaded extra stopwords");
        }
        Ok(Self { language, stopwords, stemmer: Stemmer::create(language.algorithm()) })
    }

    /// Normalizer for English with the built-in stopword list only.
    pub fn english() -> Self {
        let language = Language::English;
        Self {
            language,
            stopwords: language.stopwords().iter().map(|w| w.to_string()).collect(),
            stemmer: Stemmer::create(language.algorithm()),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Lowercase alphanumeric tokens of `text` with stopwords removed, in
    /// reading order. The returned iterator is lazy; clone it to restart.
    pub fn tokenize(&self, text: &str) -> Tokens<'_> {
        Tokens { text: text.nfkc().collect(), offset: 0, pending: VecDeque::new(), stopwords: &self.stopwords }
    }

    /// Stem every token. Output has the same length and order as the input.
    pub fn stem<'a, I>(&'a self, tokens: I) -> impl Iterator<Item = String> + 'a
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: 'a,
    {
        tokens.into_iter().map(move |t| self.stemmer.stem(t.as_ref()).into_owned())
    }

    /// Tokenize then stem, fully realized.
    pub fn process(&self, raw_text: &str) -> Vec<String> {
        self.stem(self.tokenize(raw_text)).collect()
    }

    /// [`Normalizer::process`] joined by single spaces: the processed corpus file format.
    pub fn process_joined(&self, raw_text: &str) -> String {
        self.process(raw_text).join(" ")
    }
}

/// Lazy token stream produced by [`Normalizer::tokenize`].
#[derive(Clone)]
pub struct Tokens<'a> {
    text: String,
    offset: usize,
    pending: VecDeque<Range<usize>>,
    stopwords: &'a HashSet<String>,
}

impl Iterator for Tokens<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(range) = self.pending.pop_front() {
                let token = &self.text[range];
                if !token.chars().all(char::is_alphanumeric) {
                    continue;
                }
                let lowered = token.to_lowercase();
                if self.stopwords.contains(&lowered) {
                    continue;
                }
                return Some(lowered);
            }
            let mat = WORD_RE.find_at(&self.text, self.offset)?;
            self.offset = mat.end();
            let base = mat.start();
            self.pending
                .extend(word_pieces(mat.as_str()).into_iter().map(|r| base + r.start..base + r.end));
        }
    }
}

/// Byte ranges of the tokens inside one regex match: `--` separates words,
/// quotes at either edge come off and a trailing clitic becomes its own token.
/// A single inner hyphen or apostrophe (`e-mail`, `rock'n'roll`) stays put.
fn word_pieces(word: &str) -> Vec<Range<usize>> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for dashes in DASHES_RE.find_iter(word) {
        split_clitic(word, start..dashes.start(), &mut pieces);
        start = dashes.end();
    }
    split_clitic(word, start..word.len(), &mut pieces);
    pieces
}

fn split_clitic(word: &str, range: Range<usize>, pieces: &mut Vec<Range<usize>>) {
    let segment = &word[range.clone()];
    let trimmed = segment.trim_matches('\'');
    if trimmed.is_empty() {
        return;
    }
    let start = range.start + (segment.len() - segment.trim_start_matches('\'').len());
    let end = start + trimmed.len();
    // ASCII lowercasing keeps byte offsets intact
    let lowered = trimmed.to_ascii_lowercase();
    match CLITICS.iter().find(|c| lowered.len() > c.len() && lowered.ends_with(*c)) {
        Some(clitic) => {
            let cut = end - clitic.len();
            pieces.push(start..cut);
            pieces.push(cut..end);
        }
        None => pieces.push(start..end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_punctuation_and_stopwords() {
        let n = Normalizer::english();
        let toks: Vec<String> = n.tokenize("First sentence. Second, and one!").collect();
        assert_eq!(toks, vec!["first", "sentence", "second", "one"]);
    }

    #[test]
    fn mixed_symbol_tokens_are_discarded() {
        let n = Normalizer::english();
        let toks: Vec<String> = n.tokenize("state-of-the-art e-mail rock'n'roll 42 ok").collect();
        assert_eq!(toks, vec!["42", "ok"]);
    }

    #[test]
    fn clitics_and_double_dashes_split_words() {
        let n = Normalizer::english();
        let toks: Vec<String> =
            n.tokenize("Obama's plan passed--finally. Wang's team can't 'quote'").collect();
        assert_eq!(toks, vec!["obama", "plan", "passed", "finally", "wang", "team", "ca", "quote"]);
    }

    #[test]
    fn word_pieces_keep_offsets() {
        let word = "'Wang's--won't'";
        let pieces: Vec<&str> = word_pieces(word).into_iter().map(|r| &word[r]).collect();
        assert_eq!(pieces, vec!["Wang", "'s", "wo", "n't"]);
    }

    #[test]
    fn tokens_restart_from_a_clone() {
        let n = Normalizer::english();
        let mut toks = n.tokenize("alpha beta gamma");
        let fresh = toks.clone();
        assert_eq!(toks.next().as_deref(), Some("alpha"));
        assert_eq!(fresh.collect::<Vec<_>>(), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn inflections_share_a_stem() {
        let n = Normalizer::english();
        let stems: Vec<String> = n.stem(["running", "run", "runs"]).collect();
        assert_eq!(stems, vec!["run", "run", "run"]);
        let again: Vec<String> = n.stem(&stems).collect();
        assert_eq!(again, stems);
    }

    #[test]
    fn unknown_language_is_rejected() {
        let cfg = NormalizerConfig { language: "klingon".into(), stopwords_path: None };
        assert!(matches!(Normalizer::new(&cfg), Err(Error::UnsupportedLanguage(_))));
    }
}
