use std::fs;

use anamnesis_core::aggregate;
use anamnesis_core::generate::CallFailure;
use anamnesis_core::models::outcome::InputOutcome;
use anamnesis_storage::error::StorageError;
use anamnesis_storage::inputs::read_inputs;
use anamnesis_storage::prompts::PromptLibrary;
use anamnesis_storage::report::{RunRecord, write_report};

#[tokio::test]
async fn prompt_library_indexes_versioned_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("prompt_v1.txt"), "v1 says {INPUT}").expect("write");
    fs::write(dir.path().join("prompt_v2.txt"), "v2 says {INPUT}").expect("write");
    fs::write(dir.path().join("notes.md"), "not a prompt").expect("write");
    fs::write(dir.path().join("prompt_.txt"), "no version").expect("write");

    let library = PromptLibrary::load(dir.path()).await.expect("library loads");

    assert_eq!(library.versions(), ["v1", "v2"]);
    let prompt = library.resolve("v2").expect("v2 resolves");
    assert_eq!(prompt.version, "v2");
    assert_eq!(prompt.render("hi"), "v2 says hi");
}

#[test]
fn unknown_prompt_version_lists_what_exists() {
    let library = PromptLibrary::from_templates([("v1", "{INPUT}")]);

    let err = library.resolve("v9").expect_err("v9 is unknown");
    match &err {
        StorageError::UnknownPromptVersion { version, available } => {
            assert_eq!(version, "v9");
            assert_eq!(available, &["v1".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.to_string(), "unknown prompt version \"v9\" (available: v1)");
}

#[tokio::test]
async fn missing_prompt_dir_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = PromptLibrary::load(&dir.path().join("absent"))
        .await
        .expect_err("dir is missing");
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[tokio::test]
async fn inputs_are_sorted_and_empty_files_kept() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("b_session.txt"), "Second session.").expect("write");
    fs::write(dir.path().join("a_session.txt"), "First session.").expect("write");
    fs::write(dir.path().join("c_empty.txt"), "").expect("write");
    fs::write(dir.path().join("ignored.json"), "{}").expect("write");
    fs::create_dir(dir.path().join("nested.txt")).expect("mkdir");

    let inputs = read_inputs(dir.path()).await.expect("inputs read");

    let inputs: Vec<_> = inputs
        .into_iter()
        .map(|i| i.expect("readable input"))
        .collect();
    let ids: Vec<_> = inputs.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["a_session.txt", "b_session.txt", "c_empty.txt"]);
    assert_eq!(inputs[0].text, "First session.");
    assert_eq!(inputs[2].text, "");
}

#[tokio::test]
async fn undecodable_input_is_kept_in_place_without_losing_the_rest() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("a.txt"), "First session.").expect("write");
    fs::write(dir.path().join("b.txt"), [0xff, 0xfe, 0x00]).expect("write");
    fs::write(dir.path().join("c.txt"), "Third session.").expect("write");

    let inputs = read_inputs(dir.path()).await.expect("directory listed");

    assert_eq!(inputs.len(), 3);
    assert_eq!(inputs[0].as_ref().expect("a readable").text, "First session.");
    let unreadable = inputs[1].as_ref().expect_err("b is not UTF-8");
    assert_eq!(unreadable.id, "b.txt");
    assert!(unreadable.reason.contains("b.txt"), "reason: {}", unreadable.reason);
    assert_eq!(inputs[2].as_ref().expect("c readable").id, "c.txt");
}

#[tokio::test]
async fn missing_input_dir_aborts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = read_inputs(&dir.path().join("absent"))
        .await
        .expect_err("dir is missing");
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[tokio::test]
async fn report_is_written_atomically_as_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out").join("results.json");
    let report = aggregate(
        "v2",
        vec![InputOutcome::errored(
            "a.txt",
            "v2",
            CallFailure::Timeout { millis: 5_000 },
        )],
    );
    let record = RunRecord::new(report, "test-model", jiff::Timestamp::now());

    write_report(&path, &record).await.expect("report written");

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("read back")).expect("json");
    assert_eq!(written["prompt_version"], "v2");
    assert_eq!(written["model_id"], "test-model");
    assert_eq!(written["total"], 1);
    assert_eq!(written["failed"], 1);
    assert_eq!(written["results"][0]["id"], "a.txt");
    assert_eq!(written["run_id"], record.run_id.to_string());
    assert!(!dir.path().join("out").join("results.json.tmp").exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
