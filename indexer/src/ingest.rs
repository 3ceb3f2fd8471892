use anyhow::{Context, Result};
use docrank_core::Normalizer;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
pub struct InputArticle {
    pub title: String,
    #[serde(alias = "body")]
    pub content: String,
}

/// Where prepared articles go: raw bodies for display, processed bodies for the engine.
pub struct CorpusPaths {
    pub raw: PathBuf,
    pub processed: PathBuf,
}

impl CorpusPaths {
    pub fn new<R: AsRef<Path>, P: AsRef<Path>>(raw: R, processed: P) -> Self {
        Self { raw: raw.as_ref().to_path_buf(), processed: processed.as_ref().to_path_buf() }
    }

    fn create(&self) -> Result<()> {
        fs::create_dir_all(&self.raw).with_context(|| format!("creating {}", self.raw.display()))?;
        fs::create_dir_all(&self.processed)
            .with_context(|| format!("creating {}", self.processed.display()))?;
        Ok(())
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct PrepareReport {
    pub written: usize,
    pub skipped: usize,
}

/// JSON, JSONL and CSV files under `input` in path order, or `input` itself if it is a file.
pub fn collect_input_files(input: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl" | "csv") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    } else {
        anyhow::bail!("input not found: {}", input.display());
    }
    Ok(files)
}

/// Articles from a `.jsonl` file (one object per line), a `.csv` file with a
/// header row (`title` and `content` columns, others ignored) or a `.json`
/// file (one object or an array of objects).
pub fn read_articles(file: &Path) -> Result<Vec<InputArticle>> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    let ext = file.extension().and_then(|s| s.to_str());
    if ext == Some("csv") {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut articles = Vec::new();
        for (row, record) in rdr.deserialize::<InputArticle>().enumerate() {
            // row 1 is the header
            let article = record.with_context(|| format!("{}: row {}", file.display(), row + 2))?;
            articles.push(article);
        }
        return Ok(articles);
    }
    if ext == Some("jsonl") {
        let mut articles = Vec::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() { continue; }
            let article = serde_json::from_str(&line)
                .with_context(|| format!("{}:{}", file.display(), lineno + 1))?;
            articles.push(article);
        }
        return Ok(articles);
    }
    let json: serde_json::Value = serde_json::from_reader(reader)
        .with_context(|| format!("parsing {}", file.display()))?;
    let articles: Vec<InputArticle> = match json {
        serde_json::Value::Array(arr) => arr
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<_>, _>>()?,
        serde_json::Value::Object(_) => vec![serde_json::from_value(json)?],
        _ => Vec::new(),
    };
    Ok(articles)
}

/// File name for an article: its title with `/` removed. `None` when nothing
/// usable is left.
pub fn article_name(title: &str) -> Option<String> {
    let name: String = title.chars().filter(|c| *c != '/' && *c != '\\').collect();
    match name.trim() {
        "" | "." | ".." => None,
        _ => Some(name),
    }
}

/// Write up to `max_articles` articles from `files` as raw and processed documents.
pub fn prepare_corpus(
    files: &[PathBuf],
    paths: &CorpusPaths,
    normalizer: &Normalizer,
    max_articles: usize,
) -> Result<PrepareReport> {
    paths.create()?;
    let mut report = PrepareReport::default();
    'files: for file in files {
        for article in read_articles(file)? {
            if report.written >= max_articles {
                break 'files;
            }
            let Some(name) = article_name(&article.title) else {
                tracing::warn!(file = %file.display(), title = %article.title, "skipping article without a usable title");
                report.skipped += 1;
                continue;
            };
            fs::write(paths.raw.join(&name), &article.content)
                .with_context(|| format!("writing raw article {name}"))?;
            fs::write(paths.processed.join(&name), normalizer.process_joined(&article.content))
                .with_context(|| format!("writing processed article {name}"))?;
            report.written += 1;
        }
    }
    tracing::info!(written = report.written, skipped = report.skipped, "prepared corpus");
    Ok(report)
}
