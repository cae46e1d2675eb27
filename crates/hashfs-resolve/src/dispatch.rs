//! Turning transport requests into responses.

use std::path::Path;

use hashfs_snapshot::content_type_for;
use hashfs_store::{ObjectCodec, StoreError};
use hashfs_types::{ContentHash, DirectoryEntry, Entry, FileEntry, Object, Wrapper};

use crate::error::{ResolveError, ResolveResult};
use crate::listing::{render_html, render_json};
use crate::message::{Request, Response};
use crate::resolver::{DescentPolicy, Resolver};
use crate::target::RequestTarget;

/// Child name used when a bare object is wrapped at request time.
pub const SELECTED_FILE: &str = "file";

/// Fixed at startup and shared by every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Root used when neither the URI nor the referer carries a hash.
    pub default_root: ContentHash,
    pub descent: DescentPolicy,
}

impl DispatcherConfig {
    pub fn new(default_root: ContentHash) -> Self {
        Self {
            default_root,
            descent: DescentPolicy::default(),
        }
    }

    pub fn with_descent(mut self, descent: DescentPolicy) -> Self {
        self.descent = descent;
        self
    }
}

/// Stateless request handler: every request is resolved from the store
/// alone.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    codec: ObjectCodec,
    resolver: Resolver,
    config: DispatcherConfig,
}

/// A wrapper to resolve against, and whether the request path below it
/// is only a naming hint.
struct RootWrapper {
    wrapper: Wrapper,
    path_is_hint: bool,
}

impl Dispatcher {
    pub fn new(codec: ObjectCodec, config: DispatcherConfig) -> Self {
        let resolver = Resolver::new(codec.clone(), config.descent);
        Self {
            codec,
            resolver,
            config,
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn codec(&self) -> &ObjectCodec {
        &self.codec
    }

    /// Handle one request. Never fails: errors become 400 responses.
    pub async fn dispatch(&self, request: &Request) -> Response {
        match self.try_dispatch(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(uri = %request.uri, error = %err, "request failed");
                Response::failure(err)
            }
        }
    }

    pub async fn try_dispatch(&self, request: &Request) -> ResolveResult<Response> {
        let target = RequestTarget::parse(request, self.config.default_root);
        tracing::debug!(
            root = %target.root.short_hex(),
            source = ?target.source,
            path = %target.path,
            "dispatching"
        );

        let RootWrapper {
            wrapper,
            path_is_hint,
        } = self.root_wrapper(&target).await?;
        let segments: &[String] = if path_is_hint { &[] } else { &target.segments };
        let resolution = self.resolver.resolve(&wrapper, segments).await?;

        match resolution.entry {
            Entry::Symlink(link) => Ok(Response::redirect(link.target)),
            Entry::File(file) => Ok(Response::blob(file.content_type, file.body)),
            Entry::Directory(dir) if target.wants_json() => {
                Ok(Response::json(render_json(&self.codec, &dir).await?))
            }
            Entry::Directory(dir) => {
                let root = Object::from(Wrapper::new(resolution.root));
                let root_hash = self.codec.put_object(&root).await?;
                let html = render_html(&self.codec, &root_hash, &dir, &resolution.segments).await;
                Ok(Response::html(html))
            }
        }
    }

    /// Build the wrapper a request's root hash stands for, whatever shape
    /// the object behind it has.
    async fn root_wrapper(&self, target: &RequestTarget) -> ResolveResult<RootWrapper> {
        let root = target.root;
        let wrapper = match self.codec.get_any(&root).await {
            Ok(Some(Object::Wrapper(wrapper))) => {
                return Ok(RootWrapper {
                    wrapper,
                    path_is_hint: false,
                })
            }
            Ok(Some(Object::Directory(_))) => {
                return Ok(RootWrapper {
                    wrapper: Wrapper::new(root),
                    path_is_hint: false,
                })
            }
            Ok(Some(Object::File(_) | Object::Symlink(_))) => self.select_single(root).await?,
            // Raw bytes: serve them as a file typed after the request path.
            Err(StoreError::Decode { .. }) => {
                let content_type = content_type_for(Path::new(&target.path));
                let file = Entry::File(FileEntry::new(content_type, root));
                let file_hash = self.codec.put_object(&file).await?;
                self.select_single(file_hash).await?
            }
            Ok(None) => return Err(ResolveError::MissingObject(root)),
            Err(err) => return Err(err.into()),
        };
        Ok(RootWrapper {
            wrapper,
            path_is_hint: true,
        })
    }

    async fn select_single(&self, child: ContentHash) -> ResolveResult<Wrapper> {
        let dir = Entry::Directory(DirectoryEntry::single(SELECTED_FILE, child));
        let dir_hash = self.codec.put_object(&dir).await?;
        Ok(Wrapper::selecting(dir_hash, SELECTED_FILE))
    }
}
