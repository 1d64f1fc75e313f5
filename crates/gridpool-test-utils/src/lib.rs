//! Test utilities for gridpool development.
//!
//! Provides deterministic [`Scene`] fixtures, scene rotation helpers,
//! tolerance assertions and a tracing initialiser for tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    assert_close, init_test_tracing, rotate_about, ring, Scene, SceneBuilder,
};
