use std::path::Path;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

const CONTENT_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
];

/// Content type for `path`, chosen by its extension alone.
pub fn content_type(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return DEFAULT_CONTENT_TYPE;
    };
    let ext = ext.to_ascii_lowercase();
    CONTENT_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map_or(DEFAULT_CONTENT_TYPE, |(_, content_type)| content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions_map_to_their_type() {
        assert_eq!(content_type(Path::new("index.html")), "text/html");
        assert_eq!(content_type(Path::new("styles.css")), "text/css");
        assert_eq!(content_type(Path::new("js/app.js")), "application/javascript");
        assert_eq!(content_type(Path::new("logo.svg")), "image/svg+xml");
    }

    #[test]
    fn test_extension_match_ignores_case() {
        assert_eq!(content_type(Path::new("PHOTO.JPG")), "image/jpeg");
        assert_eq!(content_type(Path::new("Favicon.Ico")), "image/x-icon");
    }

    #[test]
    fn test_unknown_or_missing_extension_is_octet_stream() {
        assert_eq!(content_type(Path::new("notes.md")), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type(Path::new("photo.jpeg")), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type(Path::new("Makefile")), DEFAULT_CONTENT_TYPE);
    }
}
