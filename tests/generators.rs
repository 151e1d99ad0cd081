mod common;

use artista::{
    load_definitions, normalize, ApiGenerator, ClientServiceGenerator, Generator, ModelList,
    PersistenceGenerator, TemplateSource,
};
use common::{library, read};
use std::collections::BTreeSet;

async fn library_models() -> (tempfile::TempDir, ModelList) {
    let root = library();
    let loaded = load_definitions(&root.path().join("schema")).await.unwrap();
    let models = normalize(&loaded.definitions).unwrap();
    (root, models)
}

#[tokio::test]
async fn every_generator_covers_every_model_once() {
    let (root, models) = library_models().await;
    let generators: Vec<Box<dyn Generator>> = vec![
        Box::new(PersistenceGenerator::new("shop")),
        Box::new(ApiGenerator::new("shop")),
        Box::new(ClientServiceGenerator::new("shop")),
    ];

    let expected: BTreeSet<&str> = models.names().into_iter().collect();
    for generator in &generators {
        let out = root.path().join(generator.kind().as_str());
        let report = generator
            .init(&models, &TemplateSource::Builtin, &out)
            .await
            .unwrap();
        assert!(report.is_success());
        let written: BTreeSet<&str> = report.models_written().into_iter().collect();
        assert_eq!(written, expected);
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), models.len());
    }
}

#[tokio::test]
async fn generators_in_either_order_produce_the_same_files() {
    let (root, models) = library_models().await;
    let a = root.path().join("a");
    let b = root.path().join("b");

    let api = ApiGenerator::new("shop");
    let client = ClientServiceGenerator::new("shop");
    api.init(&models, &TemplateSource::Builtin, &a.join("api")).await.unwrap();
    client.init(&models, &TemplateSource::Builtin, &a.join("client")).await.unwrap();
    let b_client = b.join("client");
    let b_api = b.join("api");
    let (c, p) = tokio::join!(
        client.init(&models, &TemplateSource::Builtin, &b_client),
        api.init(&models, &TemplateSource::Builtin, &b_api),
    );
    c.unwrap();
    p.unwrap();

    for file in ["api/book.js", "api/author.js", "client/book.service.js", "client/author.service.js"] {
        assert_eq!(read(&a.join(file)), read(&b.join(file)), "{file}");
    }
}

#[tokio::test]
async fn existing_files_are_overwritten() {
    let (root, models) = library_models().await;
    let out = root.path().join("models");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("book.js"), "stale").unwrap();

    PersistenceGenerator::new("shop")
        .init(&models, &TemplateSource::Builtin, &out)
        .await
        .unwrap();
    assert!(read(&out.join("book.js")).starts_with("'use strict';"));
}
