//! Recursive snapshot encoding.
//!
//! [`Encoder::encode`] walks a path and turns every node into an [`Entry`],
//! storing children through the [`ObjectCodec`] as it goes. Encoding never
//! fails: any filesystem anomaly degrades into a `File` leaf carrying the
//! error text, so a snapshot always completes and the anomaly stays
//! inspectable.

use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use hashfs_store::ObjectCodec;
use hashfs_types::{ContentHash, DirectoryEntry, Entry, FileEntry, Object, SymlinkEntry, Wrapper};
use serde::Serialize;
use tokio::fs;
use tokio::task::JoinSet;

use crate::error::{SnapshotError, SnapshotResult};
use crate::mime::content_type_for;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Snapshots filesystem paths into the store behind an [`ObjectCodec`].
#[derive(Clone, Debug)]
pub struct Encoder {
    codec: ObjectCodec,
}

impl Encoder {
    pub fn new(codec: ObjectCodec) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &ObjectCodec {
        &self.codec
    }

    /// Encode `path` into an entry. Children are stored; the returned entry
    /// itself is not.
    pub async fn encode(&self, path: impl AsRef<Path>) -> Entry {
        let root = absolute(path.as_ref());
        let walk = Walk {
            codec: self.codec.clone(),
            root: Arc::new(canonical_root(&root).await),
        };
        let entry = walk.encode_node(root.clone(), Arc::new(Vec::new())).await;
        tracing::info!(path = %root.display(), kind = entry.kind(), "encoded snapshot");
        entry
    }

    /// Encode `path` and wrap it so that directories and single files are
    /// addressed the same way.
    ///
    /// A directory is stored and wrapped directly. Anything else becomes the
    /// only child, keyed by its base name, of a synthetic directory.
    pub async fn encode_wrapped(&self, path: impl AsRef<Path>) -> SnapshotResult<Wrapper> {
        let path = path.as_ref();
        let entry = self.encode(path).await;
        let directory = match entry {
            Entry::Directory(_) => self.codec.put_object(&entry).await?,
            other => {
                let child = self.codec.put_object(&other).await?;
                let single = Entry::Directory(DirectoryEntry::single(base_name(path), child));
                self.codec.put_object(&single).await?
            }
        };
        Ok(Wrapper::new(directory))
    }

    /// Encode and wrap `path`, then store the wrapper and return its hash.
    pub async fn encode_wrapped_hash(&self, path: impl AsRef<Path>) -> SnapshotResult<ContentHash> {
        let wrapper = self.encode_wrapped(path).await?;
        Ok(self.codec.put_object(&Object::from(wrapper)).await?)
    }
}

/// State shared by every task of one `encode` call.
#[derive(Clone)]
struct Walk {
    codec: ObjectCodec,
    /// Canonical form of the path handed to `encode`. Symlinks resolving
    /// inside it may be inlined.
    root: Arc<PathBuf>,
}

impl Walk {
    /// Encode one node, turning any failure into an error leaf.
    fn encode_node(&self, path: PathBuf, chain: Arc<Vec<PathBuf>>) -> BoxFuture<Entry> {
        let walk = self.clone();
        Box::pin(async move {
            match walk.try_encode(path.clone(), chain).await {
                Ok(entry) => entry,
                Err(err) => walk.error_leaf(&path, err).await,
            }
        })
    }

    /// `chain` holds the canonical path of every directory currently being
    /// encoded above `path`.
    fn try_encode(&self, path: PathBuf, chain: Arc<Vec<PathBuf>>) -> BoxFuture<SnapshotResult<Entry>> {
        let walk = self.clone();
        Box::pin(async move {
            let meta = fs::symlink_metadata(&path)
                .await
                .map_err(|e| SnapshotError::io(&path, e))?;
            let file_type = meta.file_type();
            tracing::debug!(path = %path.display(), "encoding");

            if file_type.is_file() {
                let body = walk.codec.store().store_file(&path).await?;
                Ok(Entry::File(FileEntry::new(content_type_for(&path), body)))
            } else if file_type.is_dir() {
                walk.encode_directory(path, chain).await
            } else if file_type.is_symlink() {
                walk.encode_symlink(path, chain).await
            } else {
                let description = NodeDescription::from_metadata(&meta);
                let body = walk.codec.put_object(&description).await?;
                Ok(Entry::File(FileEntry::new("application/json", body)))
            }
        })
    }

    async fn encode_directory(&self, path: PathBuf, chain: Arc<Vec<PathBuf>>) -> SnapshotResult<Entry> {
        let mut reader = fs::read_dir(&path)
            .await
            .map_err(|e| SnapshotError::io(&path, e))?;

        let mut child_chain = (*chain).clone();
        child_chain.push(fs::canonicalize(&path).await.unwrap_or_else(|_| path.clone()));
        let child_chain = Arc::new(child_chain);

        let mut tasks = JoinSet::new();
        while let Some(dirent) = reader
            .next_entry()
            .await
            .map_err(|e| SnapshotError::io(&path, e))?
        {
            let name = dirent.file_name().to_string_lossy().into_owned();
            let walk = self.clone();
            let child_path = dirent.path();
            let chain = Arc::clone(&child_chain);
            tasks.spawn(async move {
                let entry = walk.encode_node(child_path, chain).await;
                let hash = walk.codec.put_object(&entry).await?;
                Ok::<_, SnapshotError>((name, hash))
            });
        }

        let mut children = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            let (name, hash) = joined.map_err(|e| SnapshotError::Task(e.to_string()))??;
            if children.insert(name.clone(), hash).is_some() {
                tracing::warn!(dir = %path.display(), child = %name, "non-UTF-8 names collide, keeping one");
            }
        }
        Ok(Entry::Directory(DirectoryEntry::new(children)))
    }

    /// Links whose canonical target lies inside the snapshot root, and is
    /// not a directory already being encoded above the link, are inlined.
    /// Everything else is kept as a literal link.
    async fn encode_symlink(&self, path: PathBuf, chain: Arc<Vec<PathBuf>>) -> SnapshotResult<Entry> {
        let target = fs::read_link(&path)
            .await
            .map_err(|e| SnapshotError::io(&path, e))?;

        // Fails for dangling and looping links, which stay literal.
        if let Ok(resolved) = fs::canonicalize(&path).await {
            if resolved.starts_with(self.root.as_path()) && !chain.contains(&resolved) {
                match self.try_encode(resolved.clone(), chain).await {
                    Ok(entry) => return Ok(entry),
                    Err(err) => {
                        tracing::debug!(
                            link = %path.display(),
                            target = %resolved.display(),
                            error = %err,
                            "cannot inline symlink target, keeping link"
                        );
                    }
                }
            }
        }

        Ok(Entry::Symlink(SymlinkEntry::new(
            target.to_string_lossy().into_owned(),
        )))
    }

    async fn error_leaf(&self, path: &Path, err: SnapshotError) -> Entry {
        tracing::warn!(path = %path.display(), error = %err, "encoding anomaly");
        let text = err.to_string().into_bytes();
        let body = match self.codec.store().store(text.clone()).await {
            Ok(hash) => hash,
            Err(store_err) => {
                tracing::warn!(error = %store_err, "cannot store error text");
                ContentHash::from_bytes(&text)
            }
        };
        Entry::File(FileEntry::new("text/plain", body))
    }
}

/// JSON body describing a node that is neither file, directory, nor link.
#[derive(Debug, Serialize)]
struct NodeDescription {
    kind: &'static str,
    len: u64,
    readonly: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    modified: Option<u64>,
}

impl NodeDescription {
    fn from_metadata(meta: &std::fs::Metadata) -> Self {
        Self {
            kind: special_kind(&meta.file_type()),
            len: meta.len(),
            readonly: meta.permissions().readonly(),
            mode: unix_mode(meta),
            modified: meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs()),
        }
    }
}

#[cfg(unix)]
fn special_kind(file_type: &std::fs::FileType) -> &'static str {
    use std::os::unix::fs::FileTypeExt;
    if file_type.is_fifo() {
        "fifo"
    } else if file_type.is_socket() {
        "socket"
    } else if file_type.is_block_device() {
        "block-device"
    } else if file_type.is_char_device() {
        "char-device"
    } else {
        "unknown"
    }
}

#[cfg(not(unix))]
fn special_kind(_file_type: &std::fs::FileType) -> &'static str {
    "unknown"
}

#[cfg(unix)]
fn unix_mode(meta: &std::fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::MetadataExt;
    Some(meta.mode())
}

#[cfg(not(unix))]
fn unix_mode(_meta: &std::fs::Metadata) -> Option<u32> {
    None
}

/// Fold `.` and `..` without touching the filesystem.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

fn absolute(path: &Path) -> PathBuf {
    let abs = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    normalize(&abs)
}

/// `root` with every symlink above it resolved. A root that is itself a link
/// keeps its own name, so its target only counts as inside the root when it
/// really lies below it.
async fn canonical_root(root: &Path) -> PathBuf {
    let (Some(parent), Some(name)) = (root.parent(), root.file_name()) else {
        return fs::canonicalize(root).await.unwrap_or_else(|_| root.to_path_buf());
    };
    match fs::canonicalize(parent).await {
        Ok(parent) => parent.join(name),
        Err(_) => root.to_path_buf(),
    }
}

/// Name under which a non-directory snapshot is placed in its synthetic
/// directory.
fn base_name(path: &Path) -> String {
    absolute(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string())
}
