//! Rotary Lamp: two stills side by side. The enhancer adds the rotary dial
//! and swaps in the full-quality images.

use super::{BLOCK_TYPE_1_CSS, MediaSlot, SsrDescriptor, media_image, split_section};
use maud::Markup;
use serde_json::Value;

pub(super) fn descriptor() -> SsrDescriptor {
    SsrDescriptor {
        slug: "rotary-lamp",
        render: Some(render),
        critical_css_files: &[BLOCK_TYPE_1_CSS],
    }
}

fn render(data: &Value) -> Markup {
    let first = media_image(
        &MediaSlot {
            container_id: "rotary-media-1-container",
            container_class: "media-content-1",
            media_id: "rotary-media-1",
            media_class: "media-item-1 tooltip-rotary-lamp",
        },
        &data["mediaOne"],
        "Rotary Lamp media",
    );
    let second = media_image(
        &MediaSlot {
            container_id: "rotary-media-2-container",
            container_class: "media-content-2",
            media_id: "rotary-media-2",
            media_class: "media-item-2 tooltip-rotary-lamp",
        },
        &data["mediaTwo"],
        "Rotary Lamp media",
    );
    split_section("rotary-ssr", "rotary-enhancer-mount", first, second)
}
