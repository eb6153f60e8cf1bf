//! Collaborator interfaces the core consumes: byte sources and clocks.
//!
//! Real deployments plug in their own storage backends; the implementations here cover local
//! disk, in-memory fixtures and deterministic time for tests.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};

/// Read access to stored source bytes.
pub trait ByteSource: Send + Sync {
    /// Read every byte stored under `id`.
    fn read_all(&self, id: &str) -> io::Result<Vec<u8>>;

    /// Whether anything is stored under `id`.
    fn exists(&self, id: &str) -> bool;

    /// Open the bytes stored under `id` for streaming reads.
    ///
    /// Defaults to buffering [`ByteSource::read_all`]; backends that can stream should override.
    fn open(&self, id: &str) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(io::Cursor::new(self.read_all(id)?)))
    }
}

/// In-memory byte source keyed by identifier.
#[derive(Debug, Default)]
pub struct MemoryByteSource {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryByteSource {
    /// Store `bytes` under `id`, replacing any previous entry.
    pub fn insert(&self, id: impl Into<String>, bytes: Vec<u8>) {
        if let Ok(mut g) = self.entries.write() {
            g.insert(id.into(), bytes);
        }
    }
}

impl ByteSource for MemoryByteSource {
    fn read_all(&self, id: &str) -> io::Result<Vec<u8>> {
        let g = self
            .entries
            .read()
            .map_err(|_| io::Error::other("byte source lock poisoned"))?;
        g.get(id).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no bytes stored under '{id}'"))
        })
    }

    fn exists(&self, id: &str) -> bool {
        self.entries
            .read()
            .map(|g| g.contains_key(id))
            .unwrap_or(false)
    }
}

/// Byte source backed by files below a root directory.
///
/// Identifiers are relative paths; absolute paths and `..` components are rejected.
#[derive(Debug, Clone)]
pub struct FsByteSource {
    root: PathBuf,
}

impl FsByteSource {
    /// Create a byte source rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn resolve(&self, id: &str) -> io::Result<PathBuf> {
        let rel = Path::new(id);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("identifier '{id}' escapes the source root"),
            ));
        }
        Ok(self.root.join(rel))
    }
}

impl ByteSource for FsByteSource {
    fn read_all(&self, id: &str) -> io::Result<Vec<u8>> {
        std::fs::read(self.resolve(id)?)
    }

    fn exists(&self, id: &str) -> bool {
        self.resolve(id).map(|p| p.is_file()).unwrap_or(false)
    }

    fn open(&self, id: &str) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(std::fs::File::open(self.resolve(id)?)?))
    }
}

/// Source of timestamps.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl fmt::Debug for FixedClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FixedClock").field(&self.0.to_rfc3339()).finish()
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{ByteSource, FsByteSource, MemoryByteSource};

    #[test]
    fn memory_source_round_trip() {
        let src = MemoryByteSource::default();
        assert!(!src.exists("a.csv"));
        src.insert("a.csv", b"x\n1\n".to_vec());
        assert!(src.exists("a.csv"));
        assert_eq!(src.read_all("a.csv").unwrap(), b"x\n1\n");
        assert_eq!(
            src.read_all("b.csv").unwrap_err().kind(),
            std::io::ErrorKind::NotFound
        );
    }

    #[test]
    fn fs_source_reads_below_root_only() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let root = std::env::temp_dir().join(format!("tabular-insight-src-{nanos}"));
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("data.txt"), b"hello").unwrap();

        let src = FsByteSource::new(&root);
        assert!(src.exists("data.txt"));
        assert_eq!(src.read_all("data.txt").unwrap(), b"hello");
        assert!(!src.exists("../data.txt"));
        assert_eq!(
            src.read_all("../data.txt").unwrap_err().kind(),
            std::io::ErrorKind::InvalidInput
        );

        let _ = fs::remove_dir_all(&root);
    }
}
