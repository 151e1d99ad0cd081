mod common;

use artista::{load_definitions, normalize, ModelError, ModelGenerator};
use common::{library, write_definitions, AUTHOR};

#[tokio::test]
async fn generator_publishes_models_after_generate() {
    let root = library();
    let mut generator = ModelGenerator::new(root.path().join("schema"));
    assert!(generator.models().is_none());

    let names: Vec<String> = generator
        .generate()
        .await
        .unwrap()
        .iter()
        .map(|m| m.name.clone())
        .collect();
    assert_eq!(names, ["Author", "Book"]);
    assert_eq!(generator.models().unwrap().len(), 2);
    assert!(generator.skipped().is_empty());
    assert_eq!(generator.sources().len(), 2);

    let prepared = generator.into_prepared().unwrap();
    assert_eq!(prepared.models.names(), ["Author", "Book"]);
    assert!(prepared.sources[0].ends_with("author.json"));
}

#[tokio::test]
async fn generator_publishes_nothing_on_failure() {
    let root = tempfile::tempdir().unwrap();
    write_definitions(root.path(), &[("a.json", r#"{"name": "A", "fields": {"b": "B"}}"#)]);
    let mut generator = ModelGenerator::new(root.path());
    assert!(matches!(
        generator.generate().await,
        Err(ModelError::UnresolvedReference { .. })
    ));
    assert!(generator.models().is_none());
    assert!(generator.into_prepared().is_none());
}

#[tokio::test]
async fn misspelled_keys_make_a_file_malformed() {
    let root = tempfile::tempdir().unwrap();
    write_definitions(
        root.path(),
        &[
            ("author.json", AUTHOR),
            ("book.json", r#"{"name": "Book", "fields": {"title": {"type": "string", "requried": true}}}"#),
        ],
    );
    let mut generator = ModelGenerator::new(root.path());
    generator.generate().await.unwrap();
    assert_eq!(generator.models().unwrap().names(), ["Author"]);
    assert!(matches!(&generator.skipped()[0], ModelError::Parse { path, .. } if path.ends_with("book.json")));
    assert_eq!(generator.sources().len(), 2);
}

#[tokio::test]
async fn normalizing_the_same_directory_twice_is_identical() {
    let root = tempfile::tempdir().unwrap();
    write_definitions(
        root.path(),
        &[
            ("author.json", AUTHOR),
            (
                "book.json",
                r#"{"name": "book", "fields": {"title": {"type": "string", "required": true}, "authors": "ref:author[]", "tags": "string[]", "meta": "json"}}"#,
            ),
            ("shelf.json", r#"{"name": "shelf_slot", "fields": {"book": "Book", "position": "int"}}"#),
        ],
    );
    let once = normalize(&load_definitions(root.path()).await.unwrap().definitions).unwrap();
    let twice = normalize(&load_definitions(root.path()).await.unwrap().definitions).unwrap();
    assert_eq!(once, twice);
    assert_eq!(
        serde_json::to_vec(&once).unwrap(),
        serde_json::to_vec(&twice).unwrap()
    );
    assert_eq!(once.names(), ["Author", "Book", "ShelfSlot"]);
    let book_refs: Vec<_> = once
        .get("Book")
        .unwrap()
        .referenced_by
        .iter()
        .map(|r| (r.model.as_str(), r.field.as_str()))
        .collect();
    assert_eq!(book_refs, [("ShelfSlot", "book")]);
}

#[tokio::test]
async fn empty_or_unparseable_directory_has_no_models() {
    let root = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_definitions(root.path()).await,
        Err(ModelError::NoModels(_))
    ));

    write_definitions(root.path(), &[("bad.json", "[1, 2"), ("worse.json", r#"{"fields": {}}"#)]);
    assert!(matches!(
        load_definitions(root.path()).await,
        Err(ModelError::NoModels(_))
    ));
}

#[tokio::test]
async fn missing_directory_is_an_io_error() {
    let root = tempfile::tempdir().unwrap();
    let err = load_definitions(&root.path().join("absent")).await.unwrap_err();
    assert!(matches!(err, ModelError::Io { .. }), "{err:?}");
}
