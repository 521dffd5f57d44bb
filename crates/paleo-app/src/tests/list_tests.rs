use paleo_io::output_file_name;
use paleo_types::Manifest;
use tokio_util::sync::CancellationToken;

use super::stub::{Scripted, StubTranscriber, image, legacy_manifest, state, write_fixture};
use crate::commands::list::run_list;
use crate::pipeline::{Options, RunError};

fn stub() -> StubTranscriber {
    StubTranscriber::default()
        .reply(&image(0), Scripted::Text("first", ""))
        .reply(&image(1), Scripted::Text("second", ""))
}

#[tokio::test]
async fn test_list_skips_existing_and_continues_past_failures() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("out");
    let a = write_fixture(dir.path(), "a.json", &legacy_manifest("https://example.org/a", 2));
    let b = write_fixture(dir.path(), "b.json", &legacy_manifest("https://example.org/b", 2));
    let missing = dir.path().join("missing.json").display().to_string();

    std::fs::create_dir_all(&out_dir).unwrap();
    std::fs::write(out_dir.join(output_file_name(&b)), "{}").unwrap();

    let list = dir.path().join("list.txt");
    std::fs::write(&list, format!("{a}\n\n{missing}\n{a}\n  {b}  \n")).unwrap();

    let (state, stub) = state(stub());
    let report = run_list(&state, list.to_str().unwrap(), &out_dir, &Options::default())
        .await
        .unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped_existing, 1);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, missing);
    assert_eq!(stub.calls(), vec![image(0), image(1)]);

    let written = std::fs::read_to_string(out_dir.join(output_file_name(&a))).unwrap();
    let manifest: Manifest = serde_json::from_str(&written).unwrap();
    assert_eq!(manifest.id, "https://example.org/a");
    assert_eq!(manifest.annotation_count(), 4);

    // Pre-existing output is left alone
    let skipped = std::fs::read_to_string(out_dir.join(output_file_name(&b))).unwrap();
    assert_eq!(skipped, "{}");
}

#[tokio::test]
async fn test_list_ignores_new_id() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("out");
    let a = write_fixture(dir.path(), "a.json", &legacy_manifest("https://example.org/a", 1));
    let list = dir.path().join("list.txt");
    std::fs::write(&list, format!("{a}\n")).unwrap();

    let (state, _) = state(stub());
    let options = Options {
        new_id: Some("https://example.org/override".into()),
        ..Default::default()
    };
    run_list(&state, list.to_str().unwrap(), &out_dir, &options)
        .await
        .unwrap();

    let written = std::fs::read_to_string(out_dir.join(output_file_name(&a))).unwrap();
    let manifest: Manifest = serde_json::from_str(&written).unwrap();
    assert_eq!(manifest.id, "https://example.org/a");
}

#[tokio::test]
async fn test_unreadable_list_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _) = state(stub());

    let err = run_list(
        &state,
        dir.path().join("nope.txt").to_str().unwrap(),
        dir.path(),
        &Options::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RunError::Fetch(_)));
}

#[tokio::test]
async fn test_cancelled_list_stops_before_next_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("out");
    let a = write_fixture(dir.path(), "a.json", &legacy_manifest("https://example.org/a", 1));
    let list = dir.path().join("list.txt");
    std::fs::write(&list, format!("{a}\n")).unwrap();

    let (state, stub) = state(stub());
    state.cancel.cancel();

    let report = run_list(&state, list.to_str().unwrap(), &out_dir, &Options::default())
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.processed, 0);
    assert!(stub.calls().is_empty());
    assert!(!out_dir.join(output_file_name(&a)).exists());
}

fn three_page_stub() -> StubTranscriber {
    StubTranscriber::default()
        .reply(&image(0), Scripted::Text("first", ""))
        .reply(&image(1), Scripted::Text("second", ""))
        .reply(&image(2), Scripted::Text("third", ""))
}

#[tokio::test]
async fn test_interrupted_manifest_is_retried_next_run() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("out");
    let a = write_fixture(dir.path(), "a.json", &legacy_manifest("https://example.org/a", 3));
    let list = dir.path().join("list.txt");
    std::fs::write(&list, format!("{a}\n")).unwrap();
    let output = out_dir.join(output_file_name(&a));

    let token = CancellationToken::new();
    let (mut state, stub) = state(three_page_stub().cancelling(token.clone()));
    state.cancel = token;

    let report = run_list(&state, list.to_str().unwrap(), &out_dir, &Options::default())
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.processed, 0);
    assert_eq!(stub.calls(), vec![image(0)]);
    assert!(!output.exists());

    let (state, stub) = super::stub::state(three_page_stub());
    let report = run_list(&state, list.to_str().unwrap(), &out_dir, &Options::default())
        .await
        .unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped_existing, 0);
    assert_eq!(stub.calls(), vec![image(0), image(1), image(2)]);

    let manifest: Manifest =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(manifest.annotation_count(), 6);
}

#[tokio::test]
async fn test_colliding_output_names_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("out");
    let spaced = write_fixture(
        dir.path(),
        "a b.json",
        &legacy_manifest("https://example.org/spaced", 1),
    );
    let underscored = write_fixture(
        dir.path(),
        "a_b.json",
        &legacy_manifest("https://example.org/underscored", 1),
    );
    assert_eq!(output_file_name(&spaced), output_file_name(&underscored));

    let list = dir.path().join("list.txt");
    std::fs::write(&list, format!("{spaced}\n{underscored}\n")).unwrap();

    let (state, stub) = state(stub());
    let report = run_list(&state, list.to_str().unwrap(), &out_dir, &Options::default())
        .await
        .unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped_existing, 0);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, underscored);
    assert!(report.failed[0].1.contains(&spaced));
    assert_eq!(stub.calls(), vec![image(0)]);

    let written = std::fs::read_to_string(out_dir.join(output_file_name(&spaced))).unwrap();
    let manifest: Manifest = serde_json::from_str(&written).unwrap();
    assert_eq!(manifest.id, "https://example.org/spaced");
}
