//! Batch driver
//!
//! Runs the front end over a single `.jack` file or over every `.jack` file in
//! a directory, writing `<Name>.xml` (and optionally the token listing
//! `<Name>T.xml`) for each one. Each file is tokenized and parsed on its own;
//! nothing is shared between compilation units.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::error::{AnalyzeError, AnalyzeResult};
use crate::parser::lexer::{tokenize, TokenKind, TokenStream};
use crate::parser::parse::{Parser, DEFAULT_MAX_DEPTH};
use crate::parser::tree::ParseNode;
use crate::xml::{tokens_to_xml, tree_to_xml};

/// Source file extension.
pub const SOURCE_EXTENSION: &str = "jack";

/// Knobs for a batch run
#[derive(Debug, Clone)]
pub struct Options {
    /// Where outputs go. `None` writes next to each source file.
    pub out_dir: Option<PathBuf>,
    /// Also write the flat token listing.
    pub emit_tokens: bool,
    /// Record a failing file and continue instead of aborting the batch.
    pub keep_going: bool,
    /// Nesting limit handed to the parser.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            out_dir: None,
            emit_tokens: false,
            keep_going: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Tokens and tree of one compilation unit.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub tokens: TokenStream,
    pub tree: ParseNode,
}

/// Outcome of [`analyze_path`].
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Every file written, in order.
    pub written: Vec<PathBuf>,
    /// Sources that failed, only filled when `keep_going` is set.
    pub failures: Vec<(PathBuf, AnalyzeError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Tokenize and parse one compilation unit held in memory.
pub fn analyze_source(source: &str, max_depth: usize) -> AnalyzeResult<Analysis> {
    let tokens = tokenize(source)?;
    let tree = Parser::new(&tokens).with_max_depth(max_depth).parse()?;
    Ok(Analysis { tokens, tree })
}

/// Number of tokens of each kind.
pub fn token_counts(tokens: &TokenStream) -> FxHashMap<TokenKind, usize> {
    let mut counts = FxHashMap::default();
    for token in tokens {
        *counts.entry(token.kind()).or_insert(0) += 1;
    }
    counts
}

/// Read and analyze one source file without writing anything.
pub fn analyze_file_contents(path: &Path, options: &Options) -> AnalyzeResult<Analysis> {
    let source = fs::read_to_string(path).map_err(|source| AnalyzeError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let analysis = analyze_source(&source, options.max_depth)?;
    debug!(
        path = %path.display(),
        tokens = analysis.tokens.len(),
        kinds = ?token_counts(&analysis.tokens),
        "analyzed compilation unit"
    );
    Ok(analysis)
}

/// Analyze one file and write its outputs. Returns the paths written.
pub fn analyze_file(path: &Path, options: &Options) -> AnalyzeResult<Vec<PathBuf>> {
    let analysis = analyze_file_contents(path, options)?;
    let mut written = Vec::new();

    if options.emit_tokens {
        let target = output_path(path, options.out_dir.as_deref(), "T");
        write_output(&target, &tokens_to_xml(&analysis.tokens))?;
        written.push(target);
    }

    let target = output_path(path, options.out_dir.as_deref(), "");
    write_output(&target, &tree_to_xml(&analysis.tree))?;
    written.push(target);

    Ok(written)
}

/// Analyze a file, or every `.jack` file directly inside a directory.
///
/// Without `keep_going` the first failing file aborts the run and its error is
/// returned. With it, failures are collected in the report.
pub fn analyze_path(path: &Path, options: &Options) -> AnalyzeResult<BatchReport> {
    let sources = collect_sources(path)?;
    let mut report = BatchReport::default();

    if let Some(dir) = &options.out_dir {
        fs::create_dir_all(dir).map_err(|source| AnalyzeError::Write {
            path: dir.clone(),
            source,
        })?;
    }

    info!(files = sources.len(), "analyzing {}", path.display());

    for source in sources {
        match analyze_file(&source, options) {
            Ok(written) => {
                for target in &written {
                    debug!("wrote {}", target.display());
                }
                report.written.extend(written);
            }
            Err(err) if options.keep_going => {
                warn!("skipping {}: {}", source.display(), err);
                report.failures.push((source, err));
            }
            Err(err) => return Err(err.in_file(source)),
        }
    }

    Ok(report)
}

/// The sources `path` names: itself if it is a file, otherwise the `.jack`
/// files directly inside it, sorted by name.
pub fn collect_sources(path: &Path) -> AnalyzeResult<Vec<PathBuf>> {
    let read_error = |source| AnalyzeError::Read {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(read_error)?;
    if !metadata.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut sources = Vec::new();
    for entry in fs::read_dir(path).map_err(read_error)? {
        let entry_path = entry.map_err(read_error)?.path();
        let is_source = entry_path.is_file()
            && entry_path
                .extension()
                .is_some_and(|ext| ext == SOURCE_EXTENSION);
        if is_source {
            sources.push(entry_path);
        }
    }

    if sources.is_empty() {
        return Err(AnalyzeError::NoSources(path.to_path_buf()));
    }

    sources.sort();
    Ok(sources)
}

/// `<out_dir or source dir>/<stem><suffix>.xml`
fn output_path(source: &Path, out_dir: Option<&Path>, suffix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = out_dir
        .or_else(|| source.parent())
        .unwrap_or_else(|| Path::new(""));

    dir.join(format!("{stem}{suffix}.xml"))
}

fn write_output(path: &Path, contents: &str) -> AnalyzeResult<()> {
    fs::write(path, contents).map_err(|source| AnalyzeError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        let source = Path::new("/src/Square/Main.jack");

        assert_eq!(
            output_path(source, None, ""),
            PathBuf::from("/src/Square/Main.xml")
        );
        assert_eq!(
            output_path(source, Some(Path::new("/out")), "T"),
            PathBuf::from("/out/MainT.xml")
        );
    }

    #[test]
    fn test_token_counts() {
        let tokens = tokenize("class A { field int x, y; }").unwrap();
        let counts = token_counts(&tokens);

        assert_eq!(counts[&TokenKind::Keyword], 3);
        assert_eq!(counts[&TokenKind::Identifier], 3);
        assert_eq!(counts[&TokenKind::Symbol], 4);
        assert!(!counts.contains_key(&TokenKind::StringConstant));
    }

    #[test]
    fn test_analyze_source_errors() {
        assert!(matches!(
            analyze_source("class A { \"open }", DEFAULT_MAX_DEPTH),
            Err(AnalyzeError::Lex(_))
        ));
        assert!(matches!(
            analyze_source("class A {", DEFAULT_MAX_DEPTH),
            Err(AnalyzeError::Parse(_))
        ));
    }
}
