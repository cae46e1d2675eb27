//! Directory listings, as JSON or as an HTML index page.

use std::collections::BTreeMap;

use hashfs_store::ObjectCodec;
use hashfs_types::{ContentHash, DirectoryEntry, Entry};
use maud::{html, DOCTYPE};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tokio::task::JoinSet;

use crate::error::{ResolveError, ResolveResult};

/// A request path ending in this suffix asks for a JSON listing.
pub const JSON_SUFFIX: &str = ".json";

/// Characters escaped when a name is placed in an href path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Fetch every child of `dir` concurrently. Children that cannot be fetched
/// or decoded map to `None`.
pub async fn fetch_children(
    codec: &ObjectCodec,
    dir: &DirectoryEntry,
) -> BTreeMap<String, Option<Entry>> {
    let mut tasks = JoinSet::new();
    for (name, hash) in &dir.children {
        let codec = codec.clone();
        let name = name.clone();
        let hash = *hash;
        tasks.spawn(async move {
            let entry = match codec.get_entry(&hash).await {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(child = %name, error = %err, "unusable child in listing");
                    None
                }
            };
            (name, entry)
        });
    }

    let mut children: BTreeMap<String, Option<Entry>> =
        dir.children.keys().map(|name| (name.clone(), None)).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((name, entry)) => {
                children.insert(name, entry);
            }
            Err(err) => tracing::warn!(error = %err, "listing task failed"),
        }
    }
    children
}

/// A JSON object mapping each child name to its decoded entry.
pub async fn render_json(codec: &ObjectCodec, dir: &DirectoryEntry) -> ResolveResult<String> {
    let children = fetch_children(codec, dir).await;
    serde_json::to_string(&children).map_err(|e| ResolveError::Serialization(e.to_string()))
}

/// An HTML index page for `dir`.
///
/// Every link is absolute and starts with `wrapper`, the hash of a stored
/// wrapper over the resolved root, followed by `segments`, so a rendered
/// page never depends on server state to navigate.
pub async fn render_html(
    codec: &ObjectCodec,
    wrapper: &ContentHash,
    dir: &DirectoryEntry,
    segments: &[String],
) -> String {
    let children = fetch_children(codec, dir).await;

    let title = format!("Index of /{}", segments.join("/"));
    let mut prefix = format!("/{wrapper}");
    for segment in segments {
        prefix.push('/');
        prefix.extend(utf8_percent_encode(segment, SEGMENT));
    }

    let markup = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) }
            }
            body {
                h1 { (title) }
                ul {
                    @if !segments.is_empty() {
                        li { a href=".." { "<< Parent Directory >>" } }
                    }
                    @for (name, entry) in &children {
                        @let slash = if entry.as_ref().is_some_and(Entry::is_directory) { "/" } else { "" };
                        li {
                            a href=(format!("{prefix}/{}{slash}", utf8_percent_encode(name, SEGMENT))) {
                                (name) (slash)
                            }
                        }
                    }
                }
            }
        }
    };
    markup.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashfs_store::{BlobStore, InMemoryBlobStore};
    use hashfs_types::FileEntry;
    use std::sync::Arc;

    async fn fixture() -> (ObjectCodec, DirectoryEntry) {
        let codec = ObjectCodec::new(Arc::new(InMemoryBlobStore::new()));
        let body = codec.store().store(b"bye".to_vec()).await.unwrap();
        let file = codec
            .put_object(&Entry::File(FileEntry::new("text/plain", body)))
            .await
            .unwrap();
        let nested = codec
            .put_object(&Entry::Directory(DirectoryEntry::default()))
            .await
            .unwrap();
        let junk = codec.store().store(b"junk".to_vec()).await.unwrap();

        let mut children = BTreeMap::new();
        children.insert("b.txt".to_string(), file);
        children.insert("nested".to_string(), nested);
        children.insert("weird <name>".to_string(), junk);
        (codec, DirectoryEntry::new(children))
    }

    #[tokio::test]
    async fn json_listing_decodes_one_level() {
        let (codec, dir) = fixture().await;
        let json = render_json(&codec, &dir).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["b.txt"]["type"], "file");
        assert_eq!(value["b.txt"]["contentType"], "text/plain");
        assert_eq!(value["nested"]["type"], "directory");
        assert!(value["weird <name>"].is_null());
    }

    #[tokio::test]
    async fn html_listing_links_through_wrapper() {
        let (codec, dir) = fixture().await;
        let wrapper = ContentHash::from_bytes(b"wrapper");
        let html = render_html(&codec, &wrapper, &dir, &["sub".to_string()]).await;

        assert!(html.contains("<title>Index of /sub</title>"));
        assert!(html.contains(&format!("<a href=\"/{wrapper}/sub/b.txt\">b.txt</a>")));
        assert!(html.contains(&format!("<a href=\"/{wrapper}/sub/nested/\">nested/</a>")));
        assert!(html.contains("Parent Directory"));
    }

    #[tokio::test]
    async fn html_listing_escapes_names() {
        let (codec, dir) = fixture().await;
        let wrapper = ContentHash::from_bytes(b"wrapper");
        let html = render_html(&codec, &wrapper, &dir, &[]).await;

        assert!(html.contains("weird%20%3Cname%3E"));
        assert!(html.contains(">weird &lt;name&gt;</a>"));
        assert!(!html.contains("Parent Directory"));
    }

    #[tokio::test]
    async fn html_title_escapes_segments() {
        let (codec, dir) = fixture().await;
        let wrapper = ContentHash::from_bytes(b"wrapper");
        let html = render_html(&codec, &wrapper, &dir, &["<b>&".to_string()]).await;

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Index of /&lt;b&gt;&amp;</title>"));
        assert!(html.contains(&format!("href=\"/{wrapper}/%3Cb%3E&amp;/b.txt\"")));
        assert!(html.contains("&lt;&lt; Parent Directory &gt;&gt;"));
    }

    #[tokio::test]
    async fn empty_directory_lists_nothing() {
        let codec = ObjectCodec::new(Arc::new(InMemoryBlobStore::new()));
        let dir = DirectoryEntry::default();
        assert_eq!(render_json(&codec, &dir).await.unwrap(), "{}");
        let html = render_html(&codec, &ContentHash::from_bytes(b"w"), &dir, &[]).await;
        assert!(!html.contains("<li>"));
    }
}
