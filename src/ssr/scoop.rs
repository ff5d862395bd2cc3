//! Ice Cream Scoop: image left/top, looping video right/bottom, splitter
//! mounted between them by the enhancer.

use super::{BLOCK_TYPE_1_CSS, MediaSlot, SsrDescriptor, media_image, media_video, split_section};
use maud::Markup;
use serde_json::Value;

pub(super) fn descriptor() -> SsrDescriptor {
    SsrDescriptor {
        slug: "ice-scoop",
        render: Some(render),
        critical_css_files: &[BLOCK_TYPE_1_CSS],
    }
}

fn render(data: &Value) -> Markup {
    let image = media_image(
        &MediaSlot {
            container_id: "scoop-media-1-container",
            container_class: "media-content-1",
            media_id: "icecream-media-1",
            media_class: "media-item-1 tooltip-ice-scoop",
        },
        &data["mediaOne"],
        "Ice Cream Scoop media",
    );
    let video = media_video(
        &MediaSlot {
            container_id: "scoop-media-2-container",
            container_class: "media-content-2",
            media_id: "icecream-media-2",
            media_class: "media-item-2 tooltip-ice-scoop",
        },
        &data["mediaTwo"],
    );
    split_section("scoop-ssr", "scoop-enhancer-mount", image, video)
}
