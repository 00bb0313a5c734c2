//! Tree-sitter implementation of [`SymbolExtractor`].
//!
//! Indexes Go and Rust sources. Each file is parsed independently, so a file
//! that cannot be read or parsed only loses its own entry.

use std::path::Path;

use async_trait::async_trait;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Parser, Query, QueryCursor};
use walkdir::{DirEntry, WalkDir};

use dce_core::collaborator::{SymbolExtractor, SymbolMap};
use dce_core::error::{DceError, Result};
use dce_core::path::normalize_path;

const SKIP_DIRS: &[&str] = &[".git", "target", "node_modules", "vendor", ".idea", ".vscode"];

const GO_QUERY: &str = r#"
(function_declaration name: (identifier) @name)
(method_declaration name: (field_identifier) @name)
"#;

const RUST_QUERY: &str = r#"
(function_item name: (identifier) @name)
(function_signature_item name: (identifier) @name)
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceLanguage {
    Go,
    Rust,
}

impl SourceLanguage {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "go" => Some(Self::Go),
            "rs" => Some(Self::Rust),
            _ => None,
        }
    }

    fn language(&self) -> Language {
        match self {
            Self::Go => tree_sitter_go::LANGUAGE.into(),
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
        }
    }

    fn query_source(&self) -> &'static str {
        match self {
            Self::Go => GO_QUERY,
            Self::Rust => RUST_QUERY,
        }
    }
}

/// A parser and compiled query for one language.
struct LanguageIndexer {
    parser: Parser,
    query: Query,
}

impl LanguageIndexer {
    fn new(lang: SourceLanguage) -> Result<Self> {
        let language = lang.language();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| DceError::SymbolExtraction(format!("{lang:?} grammar: {e}")))?;
        let query = Query::new(&language, lang.query_source())
            .map_err(|e| DceError::SymbolExtraction(format!("{lang:?} query: {e}")))?;
        Ok(Self { parser, query })
    }

    /// Function names declared in `source`, first occurrence order, no duplicates.
    fn functions(&mut self, source: &str) -> Option<Vec<String>> {
        let tree = self.parser.parse(source, None)?;
        let bytes = source.as_bytes();
        let mut cursor = QueryCursor::new();
        let mut names: Vec<String> = Vec::new();

        let mut matches = cursor.matches(&self.query, tree.root_node(), bytes);
        while let Some(m) = matches.next() {
            for capture in m.captures {
                if let Ok(name) = capture.node.utf8_text(bytes) {
                    if !names.iter().any(|n| n == name) {
                        names.push(name.to_string());
                    }
                }
            }
        }
        Some(names)
    }
}

/// Builds a [`SymbolMap`] by walking the project and parsing each source file.
#[derive(Debug, Clone, Default)]
pub struct TreeSitterSymbolExtractor;

impl TreeSitterSymbolExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SymbolExtractor for TreeSitterSymbolExtractor {
    async fn build_project_symbol_map(&self, root: &Path) -> Result<SymbolMap> {
        let root = root.to_path_buf();
        tokio::task::spawn_blocking(move || index_project(&root))
            .await
            .map_err(|e| DceError::internal(format!("Symbol indexing task failed: {e}")))?
    }
}

fn index_project(root: &Path) -> Result<SymbolMap> {
    if !root.is_dir() {
        return Err(DceError::SymbolExtraction(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let mut go = LanguageIndexer::new(SourceLanguage::Go)?;
    let mut rust = LanguageIndexer::new(SourceLanguage::Rust)?;
    let mut map = SymbolMap::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Skipping unreadable path during indexing: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(lang) = SourceLanguage::from_path(entry.path()) else {
            continue;
        };

        let source = match std::fs::read_to_string(entry.path()) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };

        let indexer = match lang {
            SourceLanguage::Go => &mut go,
            SourceLanguage::Rust => &mut rust,
        };
        let Some(functions) = indexer.functions(&source) else {
            tracing::warn!("Failed to parse {}", entry.path().display());
            continue;
        };

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        map.insert(normalize_path(&relative.to_string_lossy()), functions);
    }

    tracing::debug!("Indexed {} source files under {}", map.len(), root.display());
    Ok(map)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIP_DIRS.contains(&name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn test_indexes_go_and_rust_functions() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "cmd/server.go",
            "package cmd\n\nfunc Serve(addr string) error { return nil }\n\ntype S struct{}\n\nfunc (s *S) Close() {}\n",
        );
        write(
            temp.path(),
            "src/lib.rs",
            "pub fn parse() {}\n\nimpl Foo {\n    fn render(&self) {}\n}\n\ntrait T { fn hook(&self); }\n",
        );
        write(temp.path(), "README.md", "# docs\n");

        let map = TreeSitterSymbolExtractor::new()
            .build_project_symbol_map(temp.path())
            .await
            .unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map["cmd/server.go"], vec!["Serve", "Close"]);
        assert_eq!(map["src/lib.rs"], vec!["parse", "render", "hook"]);
    }

    #[tokio::test]
    async fn test_skips_build_and_vendor_dirs() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "target/debug/gen.rs", "fn generated() {}\n");
        write(temp.path(), "vendor/x/lib.go", "package x\nfunc V() {}\n");
        write(temp.path(), "main.go", "package main\nfunc main() {}\n");

        let map = TreeSitterSymbolExtractor::new()
            .build_project_symbol_map(temp.path())
            .await
            .unwrap();

        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["main.go"]);
    }

    #[tokio::test]
    async fn test_unreadable_file_is_skipped() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("bad.go"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
        write(temp.path(), "good.go", "package p\nfunc Good() {}\n");

        let map = TreeSitterSymbolExtractor::new()
            .build_project_symbol_map(temp.path())
            .await
            .unwrap();

        assert!(!map.contains_key("bad.go"));
        assert_eq!(map["good.go"], vec!["Good"]);
    }

    #[tokio::test]
    async fn test_missing_root_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result = TreeSitterSymbolExtractor::new()
            .build_project_symbol_map(&temp.path().join("nope"))
            .await;
        assert!(matches!(result, Err(DceError::SymbolExtraction(_))));
    }
}
