use docrank_core::{Error, Normalizer, NormalizerConfig};
use std::fs;
use tempfile::tempdir;

#[test]
fn it_normalizes_and_stems() {
    let n = Normalizer::english();
    let words = n.process("Running Runners RUN! The café's menu.");
    // Stemming to "run" should appear
    assert!(words.contains(&"run".to_string()));
    assert!(words.contains(&"menu".to_string()));
    // The possessive comes off, leaving the noun
    let toks: Vec<String> = n.tokenize("The café's menu.").collect();
    assert_eq!(toks, vec!["café", "menu"]);
}

#[test]
fn possessive_names_stay_searchable() {
    let n = Normalizer::english();
    assert_eq!(n.process_joined("Obama's speech"), n.process_joined("Obama speech"));
    let toks: Vec<String> = n.tokenize("Wang's team can't stop").collect();
    assert_eq!(toks, vec!["wang", "team", "ca", "stop"]);
}

#[test]
fn double_dashes_separate_words() {
    let n = Normalizer::english();
    let toks: Vec<String> = n.tokenize("The bill passed--finally--after a vote").collect();
    assert_eq!(toks, vec!["bill", "passed", "finally", "vote"]);
    // a single inner hyphen keeps the word whole, and it is not alphanumeric
    let toks: Vec<String> = n.tokenize("send an e-mail").collect();
    assert_eq!(toks, vec!["send"]);
}

#[test]
fn it_filters_stopwords() {
    let n = Normalizer::english();
    let words: Vec<String> = n.tokenize("The quick brown fox and the lazy dog").collect();
    assert_eq!(words, vec!["quick", "brown", "fox", "lazy", "dog"]);
}

#[test]
fn composed_and_decomposed_accents_match() {
    let n = Normalizer::english();
    assert_eq!(n.process("caf\u{e9}"), n.process("cafe\u{301}"));
}

#[test]
fn extra_stopwords_are_unioned() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stopwords.txt");
    fs::write(&path, "said\nreuters\n").unwrap();
    let cfg = NormalizerConfig { stopwords_path: Some(path), ..Default::default() };
    let n = Normalizer::new(&cfg).unwrap();
    assert!(n.is_stopword("reuters"));
    assert!(n.is_stopword("the"));
    assert_eq!(n.process("Reuters said the market rallied"), vec!["market", "ralli"]);
}

#[test]
fn unreadable_stopword_file_fails_construction() {
    let dir = tempdir().unwrap();
    let cfg = NormalizerConfig { stopwords_path: Some(dir.path().join("missing.txt")), ..Default::default() };
    let err = Normalizer::new(&cfg).unwrap_err();
    assert!(matches!(err, Error::Stopwords { .. }));
}

#[test]
fn joined_output_is_the_corpus_format() {
    let n = Normalizer::english();
    assert_eq!(n.process_joined("Searching engines, and ranking documents!"), "search engin rank document");
    assert_eq!(n.process_joined("!!! ..."), "");
}
