//! Integration tests for the pipeline public API.

use goci::runner::{Pipeline, PUSH_TIMEOUT};
use goci::shell::{MockResponse, MockRunner};
use goci::{run_with, GociError, StepError};
use std::path::Path;

const ALL_SUCCESS: &str = "Go Build:SUCCESS\nGo Test:SUCCESS\nGofmt:SUCCESS\nGit Push:SUCCESS\n";

fn run_to_string(runner: &MockRunner) -> (goci::Result<()>, String) {
    let mut out = Vec::<u8>::new();
    let result = run_with("./testdata/tool", &mut out, runner);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn empty_project_is_validation_error() {
    let runner = MockRunner::new();
    let mut out = Vec::<u8>::new();

    let err = run_with("", &mut out, &runner).unwrap_err();

    assert!(err.is_validation());
    assert!(err.step_error().is_none());
    assert!(out.is_empty());
}

#[test]
fn successful_pipeline_prints_every_step() {
    let (result, out) = run_to_string(&MockRunner::new());

    assert!(result.is_ok());
    assert_eq!(out, ALL_SUCCESS);
}

#[test]
fn build_failure_prints_nothing() {
    let runner = MockRunner::new().with_response("go build . errors", MockResponse::exit(1));

    let (result, out) = run_to_string(&runner);

    let err = result.unwrap_err();
    assert_eq!(err.step_error(), Some(&StepError::named("go build")));
    assert_eq!(out, "");
    assert_eq!(runner.invocations().len(), 1);
}

#[test]
fn missing_go_tool_fails_build_step() {
    let runner = MockRunner::new().with_response("go build . errors", MockResponse::LaunchFailure);

    let (result, out) = run_to_string(&runner);

    let err = result.unwrap_err();
    assert_eq!(err.step_error(), Some(&StepError::named("go build")));
    assert!(err.to_string().contains("failed to execute"));
    assert_eq!(out, "");
}

#[test]
fn format_findings_fail_after_build_and_test() {
    let runner = MockRunner::new().with_response("gofmt -l .", MockResponse::output("add.go\n"));

    let (result, out) = run_to_string(&runner);

    let err = result.unwrap_err();
    assert_eq!(err.step_error(), Some(&StepError::named("go fmt")));
    assert!(err.to_string().contains("add.go"));
    assert_eq!(out, "Go Build:SUCCESS\nGo Test:SUCCESS\n");
}

#[test]
fn push_timeout_emits_no_push_line() {
    let runner = MockRunner::new().with_response("git push origin master", MockResponse::Hang);

    let (result, out) = run_to_string(&runner);

    let err = result.unwrap_err();
    let step_err = err.step_error().expect("push should fail as a step");
    assert_eq!(step_err, &StepError::named("git push"));
    assert!(step_err.is_timeout());
    assert!(!out.contains("Git Push:SUCCESS"));
    assert_eq!(runner.contexts()[3].timeout(), Some(PUSH_TIMEOUT));
}

#[test]
fn repeated_runs_produce_identical_output() {
    let (first, first_out) = run_to_string(&MockRunner::new());
    let (second, second_out) = run_to_string(&MockRunner::new());

    assert!(first.is_ok() && second.is_ok());
    assert_eq!(first_out, second_out);
}

#[test]
fn step_error_is_returned_unchanged() {
    let runner = MockRunner::new().with_response("go test -v", MockResponse::exit(2));

    let (result, _) = run_to_string(&runner);

    match result {
        Err(GociError::Step(err)) => {
            assert_eq!(err.step(), "go test");
            assert_eq!(err.message(), "go test failed");
        }
        other => panic!("expected step error, got {:?}", other),
    }
}

#[test]
fn pipeline_can_be_run_directly() {
    let runner = MockRunner::new();
    let pipeline = Pipeline::standard(Path::new("proj"));
    let mut out = Vec::<u8>::new();

    pipeline.run(&runner, &mut out).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), ALL_SUCCESS);
}
