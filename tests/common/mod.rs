//! Shared fixtures: definition directories laid out in temp dirs.

#![allow(dead_code)]

use std::path::Path;

pub const AUTHOR: &str = r#"{"name": "Author", "fields": {"name": "string"}}"#;
pub const BOOK: &str = r#"{"name": "Book", "fields": {"title": "string", "author": "ref:Author"}}"#;

pub fn write_definitions(dir: &Path, files: &[(&str, &str)]) {
    std::fs::create_dir_all(dir).unwrap();
    for (name, json) in files {
        std::fs::write(dir.join(name), json).unwrap();
    }
}

/// Project dir plus a `schema/` dir holding the Author/Book pair.
pub fn library() -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    write_definitions(
        &root.path().join("schema"),
        &[("author.json", AUTHOR), ("book.json", BOOK)],
    );
    root
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e))
}
