#![allow(dead_code)]

pub mod image_server;

use std::path::{Path, PathBuf};

/// Writes `lines` joined by `\n` to `dir/urls.txt`.
pub fn write_manifest(dir: &Path, lines: &[String]) -> PathBuf {
    let path = dir.join("urls.txt");
    std::fs::write(&path, lines.join("\n")).unwrap();
    path
}

/// Sorted file names in `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[cfg(unix)]
pub fn running_as_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}
