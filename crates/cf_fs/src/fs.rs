//! Filesystem facade used by the receipt pipeline.
//!
//! The pipeline only needs four operations, so both the real filesystem and
//! an in-memory bucket (for tests and dry runs) sit behind [ProvideFileSystem].

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use common::{BytesToStringExt, MyResult};
use enum_dispatch::enum_dispatch;
use simple_error::simple_error;

#[enum_dispatch]
pub trait ProvideFileSystem {
    /// Where `path` actually points, for reporting.
    fn resolve(&self, path: &Path) -> PathBuf;
    fn exists(&self, path: &Path) -> bool;
    fn read(&self, path: &Path) -> MyResult<Vec<u8>>;
    fn write(&mut self, path: &Path, content: &[u8]) -> MyResult<()>;

    fn read_to_string(&self, path: &Path) -> MyResult<String> {
        self.read(path).and_then(|bytes| bytes.to_str())
    }
}

#[enum_dispatch(ProvideFileSystem)]
#[derive(Debug)]
pub enum FileSystem {
    /// Backed by the OS. Relative paths are taken from the root if one is
    /// set, from the process working directory otherwise.
    Os(OsFileSystem),
    /// A quasi-virtual filesystem that keeps everything in a HashMap.
    ///
    /// Used for testing without touching the disk.
    Mem(MemFileSystem),
}

impl FileSystem {
    pub fn os() -> Self {
        OsFileSystem::default().into()
    }
    pub fn rooted<P: AsRef<Path>>(root: P) -> Self {
        OsFileSystem::rooted(root).into()
    }
    pub fn mem() -> Self {
        MemFileSystem::default().into()
    }
}

#[derive(Debug, Default)]
pub struct OsFileSystem {
    root: Option<PathBuf>,
}

impl OsFileSystem {
    pub fn rooted<P: AsRef<Path>>(root: P) -> Self {
        Self { root: Some(root.as_ref().to_path_buf()) }
    }

    fn rooted_path_of(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if !path.is_absolute() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ProvideFileSystem for OsFileSystem {
    fn resolve(&self, path: &Path) -> PathBuf {
        let p = self.rooted_path_of(path);
        if p.is_absolute() {
            return p;
        }
        std::env::current_dir()
            .map(|cwd| cwd.join(&p))
            .unwrap_or(p)
    }

    fn exists(&self, path: &Path) -> bool {
        self.rooted_path_of(path).exists()
    }

    fn read(&self, path: &Path) -> MyResult<Vec<u8>> {
        let p = self.rooted_path_of(path);
        log::debug!("Reading {p:?}");
        std::fs::read(&p).map_err(|e| simple_error!("Cannot read {:?}: {}", p, e).into())
    }

    fn write(&mut self, path: &Path, content: &[u8]) -> MyResult<()> {
        let p = self.rooted_path_of(path);
        if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty() && !d.exists()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| simple_error!("Cannot create directory {:?}: {}", parent, e))?;
        }
        log::debug!("Writing {} bytes to {p:?}", content.len());
        std::fs::write(&p, content).map_err(|e| simple_error!("Cannot write {:?}: {}", p, e).into())
    }
}

#[derive(Debug, Default)]
pub struct MemFileSystem {
    bucket: HashMap<PathBuf, Vec<u8>>,
}

impl MemFileSystem {
    pub fn insert<P: AsRef<Path>, C: Into<Vec<u8>>>(&mut self, path: P, content: C) -> &mut Self {
        self.bucket.insert(path.as_ref().to_path_buf(), content.into());
        self
    }
    pub fn get<P: AsRef<Path>>(&self, path: P) -> Option<&[u8]> {
        self.bucket.get(path.as_ref()).map(|v| v.as_slice())
    }
    pub fn path_iter(&self) -> std::collections::hash_map::Keys<'_, PathBuf, Vec<u8>> {
        self.bucket.keys()
    }
}

impl ProvideFileSystem for MemFileSystem {
    fn resolve(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }

    fn exists(&self, path: &Path) -> bool {
        self.bucket.contains_key(path)
    }

    fn read(&self, path: &Path) -> MyResult<Vec<u8>> {
        self.bucket
            .get(path)
            .cloned()
            .ok_or_else(|| simple_error!("File {:?} doesn't exist", path).into())
    }

    fn write(&mut self, path: &Path, content: &[u8]) -> MyResult<()> {
        if let Some(last) = self.bucket.insert(path.to_path_buf(), content.to_vec()) {
            log::debug!("Overwrote {path:?} ({} bytes)", last.len());
        }
        Ok(())
    }
}
