//! Tests for CatalogService and OfferService

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use coursecat::application::services::{CatalogService, Metric, MetricReport, OfferService};
use coursecat::application::ApplicationError;
use coursecat::config::Settings;
use coursecat::domain::DomainError;
use coursecat::infrastructure::traits::{FileSystem, RealFileSystem};
use coursecat::infrastructure::ServiceContainer;
use coursecat::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

const RESOURCES: &str = "tests/resources/catalogs";

fn settings_for(dir: &Path) -> Settings {
    Settings {
        data_dir: dir.to_path_buf(),
        ..Settings::default()
    }
}

fn write_catalog(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write catalog");
    path
}

/// In-memory filesystem keyed by path.
struct MemoryFs(HashMap<PathBuf, String>);

impl FileSystem for MemoryFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.0
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn exists(&self, path: &Path) -> bool {
        self.0.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.0.contains_key(path)
    }
}

#[test]
fn given_bare_name_when_loading_then_resolves_in_data_dir_with_extension() {
    let service = CatalogService::new(
        Arc::new(RealFileSystem),
        &settings_for(Path::new(RESOURCES)),
    );

    let path = service.resolve("academy_a").unwrap();
    let catalog = service.load("academy_a").unwrap();

    assert_eq!(path, Path::new(RESOURCES).join("academy_a.txt"));
    assert_eq!(catalog.len(), 4);
    assert!(catalog.contains("Eng_B1_English"));
}

#[test]
fn given_existing_path_when_resolving_then_used_as_given() {
    let temp = TempDir::new().unwrap();
    let path = write_catalog(&temp, "north.csv", "header\nEng,10,5,B1,English,20\n");
    let service = CatalogService::new(Arc::new(RealFileSystem), &Settings::default());

    let resolved = service.resolve(path.to_str().unwrap()).unwrap();

    assert_eq!(resolved, path);
}

#[test]
fn given_unknown_name_when_loading_then_catalog_not_found() {
    let temp = TempDir::new().unwrap();
    let service = CatalogService::new(Arc::new(RealFileSystem), &settings_for(temp.path()));

    let err = service.load("nowhere").unwrap_err();

    match err {
        ApplicationError::CatalogNotFound(path) => {
            assert_eq!(path, temp.path().join("nowhere.txt"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn given_malformed_line_when_loading_then_invalid_catalog_with_line_number() {
    let temp = TempDir::new().unwrap();
    write_catalog(
        &temp,
        "broken.txt",
        "name,duration,students,level,language,price\nEng,10,5,B1,English,20\nEng,10,5,B1\n",
    );
    let service = CatalogService::new(Arc::new(RealFileSystem), &settings_for(temp.path()));

    let err = service.load("broken").unwrap_err();

    match err {
        ApplicationError::InvalidCatalog { path, source } => {
            assert!(path.ends_with("broken.txt"));
            assert!(matches!(source, DomainError::MalformedRecord { line: 3, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn given_empty_extension_when_resolving_then_bare_file_name() {
    let mut files = HashMap::new();
    files.insert(PathBuf::from("/data/north"), "header\n".to_string());
    let settings = Settings {
        data_dir: PathBuf::from("/data"),
        extension: String::new(),
        ..Settings::default()
    };
    let service = CatalogService::new(Arc::new(MemoryFs(files)), &settings);

    let catalog = service.load("north").unwrap();

    assert!(catalog.is_empty());
}

#[test]
fn given_container_when_merging_resource_catalogs_then_uses_configured_names() {
    let settings = Settings {
        academy_a: "Norte".into(),
        academy_b: "Sur".into(),
        ..settings_for(Path::new(RESOURCES))
    };
    let container = ServiceContainer::new(settings);

    let a = container.catalogs.load("academy_a").unwrap();
    let b = container.catalogs.load("academy_b").unwrap();
    let added = container.offers.added(&a, &b, None, None).unwrap();
    let common = container.offers.common(&a, &b).unwrap();

    assert!(added.contains("French Basics Norte_A1_French"));
    assert!(added.contains("French Basics Sur_A2_French"));
    assert_eq!(common.len(), 2);
    assert_eq!(common.get("Eng_B1_English").unwrap().students(), 8);
}

#[test]
fn given_catalog_when_level_statistics_then_averages_per_level() {
    let service = CatalogService::new(
        Arc::new(RealFileSystem),
        &settings_for(Path::new(RESOURCES)),
    );
    let catalog = service.load("academy_b").unwrap();

    let report = OfferService::new(&Settings::default()).statistics(&catalog, Metric::Level);

    match report {
        MetricReport::Averages { groups, .. } => {
            // Japanese Kana is the only A1 course
            assert_eq!(groups.get("A1"), Some(&7.0));
            assert_eq!(groups.len(), 4);
        }
        other => panic!("unexpected report: {other:?}"),
    }
}
