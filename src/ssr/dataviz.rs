//! Data Visualization: recorded walkthrough first, static chart second.

use super::{BLOCK_TYPE_1_CSS, MediaSlot, SsrDescriptor, media_image, media_video, split_section};
use maud::Markup;
use serde_json::Value;

pub(super) fn descriptor() -> SsrDescriptor {
    SsrDescriptor {
        slug: "data-visualization",
        render: Some(render),
        critical_css_files: &[BLOCK_TYPE_1_CSS],
    }
}

fn render(data: &Value) -> Markup {
    let video = media_video(
        &MediaSlot {
            container_id: "dataviz-media-1-container",
            container_class: "media-content-1",
            media_id: "dataviz-media-1",
            media_class: "media-item-1 tooltip-data-visualization",
        },
        &data["mediaOne"],
    );
    let chart = media_image(
        &MediaSlot {
            container_id: "dataviz-media-2-container",
            container_class: "media-content-2",
            media_id: "dataviz-media-2",
            media_class: "media-item-2 tooltip-data-visualization",
        },
        &data["mediaTwo"],
        "Data Visualization media",
    );
    split_section("dataviz-ssr", "dataviz-enhancer-mount", video, chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn video_precedes_chart() {
        let doc = json!({
            "mediaOne": {"video": {"poster": "https://cdn/p.jpg", "mp4Url": "https://cdn/v.mp4"}},
            "mediaTwo": {"imageUrl": "https://static/chart.png"}
        });
        let html = render(&doc).into_string();
        let video = html.find("<video").unwrap();
        let chart = html.find("chart.png").unwrap();
        assert!(video < chart);
        assert!(!html.contains("video/webm"));
    }
}
