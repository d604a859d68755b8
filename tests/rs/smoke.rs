//! Integration smoke tests for `course_mean`

use course_mean::core::pipeline;
use course_mean::get_version;

#[test]
fn version_is_not_empty() {
    let v = get_version();
    assert!(!v.trim().is_empty());
}

#[test]
fn sample_pages_all_resolve() {
    let samples = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("samples/grades");
    let mut paths: Vec<_> = std::fs::read_dir(&samples)
        .expect("samples directory")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "html"))
        .collect();
    paths.sort();

    let entries = pipeline::compute_files(&paths, |_| {});
    assert_eq!(entries.len(), paths.len());
    assert!(entries.iter().any(|entry| entry.outcome.is_ok()));
}
