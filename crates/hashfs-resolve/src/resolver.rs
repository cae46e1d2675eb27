//! Walking a wrapper's directory tree down a list of path segments.

use hashfs_store::{ObjectCodec, StoreError};
use hashfs_types::{ContentHash, Entry, Wrapper};
use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, ResolveResult};
use crate::listing::JSON_SUFFIX;

/// What to do with a segment that names no usable child.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DescentPolicy {
    /// Skip the segment and keep walking. A request for a missing sub-path
    /// lands on the nearest ancestor that does exist.
    #[default]
    BestEffort,
    /// Fail with [`ResolveError::NotFound`].
    Strict,
}

impl std::fmt::Display for DescentPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BestEffort => write!(f, "best-effort"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// The outcome of resolving a path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Hash of the root directory the walk started from.
    pub root: ContentHash,
    /// Child names actually descended through, including the wrapper's
    /// selection. Links built from these lead back to `entry`.
    pub segments: Vec<String>,
    /// Segments that named no usable child (best-effort only).
    pub skipped: Vec<String>,
    /// The entry the walk ended on.
    pub entry: Entry,
}

#[derive(Clone, Debug)]
pub struct Resolver {
    codec: ObjectCodec,
    policy: DescentPolicy,
}

impl Resolver {
    pub fn new(codec: ObjectCodec, policy: DescentPolicy) -> Self {
        Self { codec, policy }
    }

    pub fn policy(&self) -> DescentPolicy {
        self.policy
    }

    /// Resolve `path` below `wrapper`.
    ///
    /// A final segment `name.json` that names no child falls back to the
    /// child `name`, so `sub.json` addresses `sub` for a JSON listing.
    pub async fn resolve(&self, wrapper: &Wrapper, path: &[String]) -> ResolveResult<Resolution> {
        let root = self.root_directory(&wrapper.directory).await?;

        let segments: Vec<String> = wrapper
            .selected
            .iter()
            .chain(path)
            .filter(|segment| !segment.is_empty())
            .cloned()
            .collect();

        let mut entry = root;
        let mut walked = Vec::with_capacity(segments.len());
        let mut skipped = Vec::new();
        let last = segments.len().saturating_sub(1);
        for (i, segment) in segments.iter().enumerate() {
            match self.step(&entry, segment, i == last).await {
                Some((name, next)) => {
                    if !name.is_empty() {
                        walked.push(name);
                    }
                    entry = next;
                }
                None => match self.policy {
                    DescentPolicy::BestEffort => {
                        tracing::debug!(segment = %segment, "skipping unresolvable segment");
                        skipped.push(segment.clone());
                    }
                    DescentPolicy::Strict => {
                        return Err(ResolveError::NotFound {
                            segment: segment.clone(),
                        })
                    }
                },
            }
        }

        Ok(Resolution {
            root: wrapper.directory,
            segments: walked,
            skipped,
            entry,
        })
    }

    async fn root_directory(&self, hash: &ContentHash) -> ResolveResult<Entry> {
        match self.codec.get_entry(hash).await {
            Ok(Some(entry @ Entry::Directory(_))) => Ok(entry),
            Ok(_) | Err(StoreError::Decode { .. }) => Err(ResolveError::InvalidRoot(*hash)),
            Err(err) => Err(err.into()),
        }
    }

    /// The child name `segment` matched in `current` and the entry it leads
    /// to, or `None` when it leads nowhere usable. A trailing `.json` that
    /// addresses the current directory matches nothing and is not recorded.
    async fn step(&self, current: &Entry, segment: &str, is_last: bool) -> Option<(String, Entry)> {
        let Entry::Directory(dir) = current else {
            return None;
        };
        if is_last && segment == JSON_SUFFIX {
            return Some((String::new(), current.clone()));
        }

        let (name, hash) = match dir.get(segment) {
            Some(hash) => (segment, hash),
            None => {
                let stem = segment.strip_suffix(JSON_SUFFIX).filter(|_| is_last)?;
                (stem, dir.get(stem)?)
            }
        };

        match self.codec.get_entry(hash).await {
            Ok(found) => found.map(|entry| (name.to_string(), entry)),
            Err(err) => {
                tracing::debug!(segment, error = %err, "child is not a usable entry");
                None
            }
        }
    }
}
