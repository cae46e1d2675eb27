use std::path::Path;

use hashfs_types::DEFAULT_CONTENT_TYPE;

/// Content type for a file, guessed from its extension.
///
/// Textual types get an explicit UTF-8 charset so browsers do not have to
/// sniff. Unknown extensions fall back to `text/plain`.
pub fn content_type_for(path: &Path) -> String {
    let Some(mime) = mime_guess::from_path(path).first() else {
        return DEFAULT_CONTENT_TYPE.to_string();
    };
    let textual = mime.type_() == mime_guess::mime::TEXT
        || matches!(
            mime.essence_str(),
            "application/json" | "application/javascript" | "application/xml"
        );
    if textual && mime.get_param(mime_guess::mime::CHARSET).is_none() {
        format!("{}; charset=utf-8", mime.essence_str())
    } else {
        mime.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_gets_charset() {
        assert_eq!(
            content_type_for(Path::new("index.html")),
            "text/html; charset=utf-8"
        );
    }

    #[test]
    fn binary_types_have_no_charset() {
        assert_eq!(content_type_for(Path::new("logo.png")), "image/png");
    }

    #[test]
    fn unknown_extension_defaults_to_text_plain() {
        assert_eq!(content_type_for(Path::new("README")), "text/plain");
        assert_eq!(content_type_for(Path::new("x.zzzunknown")), "text/plain");
    }

    #[test]
    fn only_the_file_name_matters() {
        assert_eq!(
            content_type_for(Path::new("/srv/site.v2/data.json")),
            "application/json; charset=utf-8"
        );
    }
}
