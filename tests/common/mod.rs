//! Common test infrastructure for l0smooth integration tests.
//!
//! Each test file compiles its own copy of this module, so items may appear
//! unused from the perspective of a single test file even though they're
//! used elsewhere.

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;

pub use assertions::*;

use l0smooth::Job;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch directory holding inputs, a config file and an output
/// directory for one run.
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Output directory; not created until a run creates it.
    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    pub fn write_gray(&self, name: &str, width: u32, height: u32, samples: Vec<u8>) -> PathBuf {
        let path = self.dir.path().join(name);
        image::GrayImage::from_raw(width, height, samples)
            .expect("sample count must match dimensions")
            .save(&path)
            .expect("Failed to write grayscale fixture");
        path
    }

    pub fn write_rgb(&self, name: &str, width: u32, height: u32, samples: Vec<u8>) -> PathBuf {
        let path = self.dir.path().join(name);
        image::RgbImage::from_raw(width, height, samples)
            .expect("sample count must match dimensions")
            .save(&path)
            .expect("Failed to write RGB fixture");
        path
    }

    pub fn write_file(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("Failed to write fixture");
        path
    }

    pub fn write_config(&self, line: &str) -> PathBuf {
        self.write_file("config.txt", format!("{line}\n").as_bytes())
    }

    /// Job over `input` and `config` writing into [`output_dir`](Self::output_dir).
    pub fn job(&self, input: &Path, config: &Path) -> Job {
        Job::new(input, self.output_dir(), config)
    }
}
