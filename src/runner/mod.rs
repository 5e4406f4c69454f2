//! Pipeline orchestration.

pub mod pipeline;

pub use pipeline::{
    build_step, fmt_step, push_step, run, run_with, test_step, validate_project, Pipeline,
    BUILD_SUCCESS, FMT_SUCCESS, PUSH_SUCCESS, PUSH_TIMEOUT, TEST_SUCCESS,
};
