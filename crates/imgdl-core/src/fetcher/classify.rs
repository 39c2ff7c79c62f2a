//! Classify a response head into image / not an image / HTTP failure.

/// Outcome of looking at status and `Content-Type` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// 200 with an `image/*` content type.
    Image,
    /// 200 with any other content type, or none at all.
    NotImage,
    /// Anything but 200.
    HttpFailure(u32),
}

/// True if the MIME type starts with `image/` (ASCII case-insensitive).
pub fn is_image_content_type(content_type: &str) -> bool {
    let ct = content_type.trim_start();
    ct.len() >= 6 && ct.as_bytes()[..6].eq_ignore_ascii_case(b"image/")
}

pub fn classify(status: u32, content_type: Option<&str>) -> Classification {
    if status != 200 {
        return Classification::HttpFailure(status);
    }
    match content_type {
        Some(ct) if is_image_content_type(ct) => Classification::Image,
        _ => Classification::NotImage,
    }
}

/// Redirect statuses; their bodies are skipped while libcurl follows them.
pub(crate) fn is_redirect(status: u32) -> bool {
    (300..400).contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_types() {
        assert_eq!(classify(200, Some("image/jpeg")), Classification::Image);
        assert_eq!(classify(200, Some("image/svg+xml")), Classification::Image);
        assert_eq!(classify(200, Some("Image/PNG")), Classification::Image);
    }

    #[test]
    fn non_image_types() {
        assert_eq!(classify(200, Some("text/html")), Classification::NotImage);
        assert_eq!(
            classify(200, Some("application/json; charset=utf-8")),
            Classification::NotImage
        );
        assert_eq!(classify(200, Some("image")), Classification::NotImage);
        assert_eq!(classify(200, None), Classification::NotImage);
    }

    #[test]
    fn any_other_status_fails() {
        assert_eq!(
            classify(404, Some("image/png")),
            Classification::HttpFailure(404)
        );
        assert_eq!(classify(204, None), Classification::HttpFailure(204));
        assert_eq!(
            classify(206, Some("image/png")),
            Classification::HttpFailure(206)
        );
        assert_eq!(classify(500, None), Classification::HttpFailure(500));
    }

    #[test]
    fn redirects() {
        assert!(is_redirect(301));
        assert!(is_redirect(308));
        assert!(!is_redirect(200));
        assert!(!is_redirect(404));
    }
}
