use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring a normalizer or building an engine.
///
/// Queries never fail: out-of-vocabulary terms and empty queries produce
/// (possibly empty) rankings, so every variant here is a construction error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("corpus directory not found: {}", .0.display())]
    CorpusNotFound(PathBuf),

    #[error("corpus path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("corpus contains no documents: {}", .0.display())]
    EmptyCorpus(PathBuf),

    #[error("duplicate document identifier: {0}")]
    DuplicateDocument(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read stopword file {}: {source}", path.display())]
    Stopwords {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    /// True for errors caused by the corpus location or its contents rather than
    /// by engine or normalizer parameters.
    pub fn is_corpus_error(&self) -> bool {
        matches!(
            self,
            Error::CorpusNotFound(_)
                | Error::NotADirectory(_)
                | Error::EmptyCorpus(_)
                | Error::DuplicateDocument(_)
                | Error::Io { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_path() {
        let err = Error::EmptyCorpus(PathBuf::from("/data/processed"));
        assert_eq!(err.to_string(), "corpus contains no documents: /data/processed");
        assert!(err.is_corpus_error());
        assert!(!Error::UnsupportedLanguage("klingon".into()).is_corpus_error());
    }
}
