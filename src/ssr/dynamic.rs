//! Dynamic App frame: a screenshot of the app with an overlay and spinner.
//! The dynamic enhancer sizes the overlay and later mounts the shadow app
//! on top of it.

use super::{DYNAMIC_FRAME_CSS, SsrDescriptor};
use crate::media::image_variants;
use maud::{Markup, html};
use serde_json::Value;

pub(super) fn descriptor() -> SsrDescriptor {
    SsrDescriptor {
        slug: "dynamic-frame",
        render: Some(render),
        critical_css_files: &[DYNAMIC_FRAME_CSS],
    }
}

fn render(data: &Value) -> Markup {
    let frame = &data["frame"];
    let variants = image_variants(frame, 2560, 1440, 85);
    let alt = frame
        .get("alt")
        .and_then(Value::as_str)
        .unwrap_or("Dynamic App preview");
    html! {
        section #dynamic-ssr .dynamic-frame-ssr {
            @if let Some(v) = &variants {
                picture {
                    source media="(min-width: 1025px)" srcset=(v.high);
                    img #dynamic-frame-img
                        src=(v.medium)
                        alt=(alt)
                        decoding="async"
                        fetchpriority="high";
                }
            }
            div #dynamic-overlay .dynamic-overlay {}
            div.dynamic-frame-spinner aria-hidden="true" {}
        }
    }
}
