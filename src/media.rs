//! Image URL helpers for CMS media fields.
//!
//! Media fields come in two shapes: an `image` asset reference that the CDN
//! can resize (`"image": {"asset": {"url": …}}` or a bare URL string), or a
//! pre-sized `imageUrl` that is used as-is.

use serde_json::Value;

/// Width and quality of the first-paint image.
const MEDIUM_WIDTH: u32 = 1024;
const MEDIUM_QUALITY: u32 = 75;

/// URLs for the first paint and the full-quality swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageVariants {
    pub medium: String,
    pub high: String,
}

/// URL of a resizable asset reference: a string, `{url}` or `{asset: {url}}`.
pub fn asset_url(image: &Value) -> Option<&str> {
    image
        .as_str()
        .or_else(|| image.get("url").and_then(Value::as_str))
        .or_else(|| image.pointer("/asset/url").and_then(Value::as_str))
        .filter(|url| !url.is_empty())
}

/// Medium and high-quality URLs for a media block's image.
///
/// An `image` asset is resized by the CDN; a plain `imageUrl` is used for
/// both variants.
pub fn image_variants(
    media: &Value,
    width: u32,
    height: u32,
    quality: u32,
) -> Option<ImageVariants> {
    if let Some(url) = media.get("image").and_then(asset_url) {
        return Some(ImageVariants {
            medium: medium_url(url),
            high: high_quality_url(url, width, height, quality),
        });
    }
    let url = media.get("imageUrl").and_then(Value::as_str)?;
    (!url.is_empty()).then(|| ImageVariants {
        medium: url.to_string(),
        high: url.to_string(),
    })
}

pub fn medium_url(url: &str) -> String {
    with_params(url, &format!("w={MEDIUM_WIDTH}&q={MEDIUM_QUALITY}&auto=format"))
}

pub fn high_quality_url(url: &str, width: u32, height: u32, quality: u32) -> String {
    with_params(
        url,
        &format!("w={width}&h={height}&q={quality}&fit=max&auto=format"),
    )
}

fn with_params(url: &str, params: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}{params}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn asset_url_accepts_all_reference_shapes() {
        assert_eq!(asset_url(&json!("https://cdn/x.jpg")), Some("https://cdn/x.jpg"));
        assert_eq!(asset_url(&json!({"url": "https://cdn/y.jpg"})), Some("https://cdn/y.jpg"));
        assert_eq!(
            asset_url(&json!({"asset": {"url": "https://cdn/z.jpg"}})),
            Some("https://cdn/z.jpg")
        );
        assert_eq!(asset_url(&json!({"asset": {}})), None);
        assert_eq!(asset_url(&json!("")), None);
    }

    #[test]
    fn asset_images_are_resized() {
        let media = json!({"image": {"asset": {"url": "https://cdn/a.jpg"}}});
        let v = image_variants(&media, 1920, 1080, 90).unwrap();
        assert_eq!(v.medium, "https://cdn/a.jpg?w=1024&q=75&auto=format");
        assert_eq!(v.high, "https://cdn/a.jpg?w=1920&h=1080&q=90&fit=max&auto=format");
    }

    #[test]
    fn plain_image_url_is_used_as_is() {
        let media = json!({"imageUrl": "https://static/b.png"});
        let v = image_variants(&media, 1920, 1080, 90).unwrap();
        assert_eq!(v.medium, "https://static/b.png");
        assert_eq!(v.high, "https://static/b.png");
    }

    #[test]
    fn missing_media_has_no_variants() {
        assert_eq!(image_variants(&json!({}), 1920, 1080, 90), None);
        assert_eq!(image_variants(&Value::Null, 1920, 1080, 90), None);
    }

    #[test]
    fn existing_query_is_extended() {
        assert_eq!(
            medium_url("https://cdn/a.jpg?v=2"),
            "https://cdn/a.jpg?v=2&w=1024&q=75&auto=format"
        );
    }
}
