/// Mime type of an image file, judged by its extension.
///
/// The extension is everything after the last `.` and is matched
/// case-insensitively. Unknown extensions yield `None`.
pub fn image_mime_type(image_path: &str) -> Option<&'static str> {
    let extension = image_path.rsplit('.').next()?.to_ascii_lowercase();
    match extension.as_str() {
        "bmp" => Some("image/bmp"),
        "gif" => Some("image/gif"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "tiff" => Some("image/tiff"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(image_mime_type("photo.png"), Some("image/png"));
        assert_eq!(image_mime_type("photo.PNG"), Some("image/png"));
        assert_eq!(image_mime_type("a/b/c.jpeg"), Some("image/jpeg"));
        assert_eq!(image_mime_type("c.jpg"), Some("image/jpeg"));
        assert_eq!(image_mime_type("logo.svg"), Some("image/svg+xml"));
        assert_eq!(image_mime_type("scan.tiff"), Some("image/tiff"));
    }

    #[test]
    fn unknown_extensions() {
        assert_eq!(image_mime_type("archive.tar.gz"), None);
        assert_eq!(image_mime_type("README"), None);
        assert_eq!(image_mime_type(""), None);
    }

    #[test]
    fn bare_extension_is_still_an_extension() {
        assert_eq!(image_mime_type("gif"), Some("image/gif"));
    }
}
