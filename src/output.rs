//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every entity (project, gallery card) leads with its positional index and
//! title. Details such as the chosen strategy or a card's link follow on
//! indented context lines.
//!
//! # Output Format
//!
//! ## Projects (`check`, `render`)
//!
//! ```text
//! Projects
//! 001 Ice Cream Scoop [scoop]
//!     Strategy: ssr + enhancer:scoop
//! 002 Evade the Rock [game]
//!     Strategy: client client:game
//! ```
//!
//! ## Gallery
//!
//! ```text
//! Gallery (A to Z)
//! 001 Ana
//!     Link: https://ana.example.com
//!
//! Accent
//!     Border: rgba(255, 128, 0, 0.8)
//!     Shadow: #0a0b0c
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::colors::DropdownAccent;
use crate::generate::GenerateReport;
use crate::registry::ProjectMeta;
use crate::resolver::Strategy;
use crate::sort::SortMode;
use crate::types::GalleryItem;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with an optional tag.
///
/// ```text
/// 001 Ice Cream Scoop [scoop]
/// 001 Ana
/// ```
fn entity_header(index: usize, title: &str, tag: Option<&str>) -> String {
    match tag {
        Some(t) => format!("{} {} [{}]", format_index(index), title, t),
        None => format!("{} {}", format_index(index), title),
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Projects
// ============================================================================

/// Format the strategy chosen for each project, in landing order.
pub fn format_projects(projects: &[(ProjectMeta, Strategy)]) -> Vec<String> {
    let mut lines = vec!["Projects".to_string()];
    for (i, (meta, strategy)) in projects.iter().enumerate() {
        lines.push(entity_header(i + 1, meta.title, Some(meta.key.as_str())));
        lines.push(format!("{}Strategy: {}", indent(1), strategy));
        if meta.is_link {
            lines.push(format!("{}Link: /{}/", indent(1), meta.key));
        }
    }
    lines
}

pub fn print_projects(projects: &[(ProjectMeta, Strategy)]) {
    print_lines(format_projects(projects));
}

/// Format the `resolve` command: one project's strategy followed by the
/// markup its loader produced.
pub fn format_resolve_output(meta: &ProjectMeta, strategy: Strategy, markup: &str) -> Vec<String> {
    let mut lines = vec![
        entity_header(1, meta.title, Some(meta.key.as_str())),
        format!("{}Strategy: {}", indent(1), strategy),
        String::new(),
    ];
    lines.extend(markup.lines().map(str::to_string));
    lines
}

pub fn print_resolve_output(meta: &ProjectMeta, strategy: Strategy, markup: &str) {
    print_lines(format_resolve_output(meta, strategy, markup));
}

// ============================================================================
// Render
// ============================================================================

/// Format render output: the pages written and how each project got there.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = vec!["Landing \u{2192} index.html".to_string()];
    lines.extend(
        format_projects(&report.projects)
            .into_iter()
            .skip(1)
            .map(|line| format!("{}{}", indent(1), line)),
    );
    lines.push(format!(
        "Gallery \u{2192} dynamic/index.html ({} items, {} icons)",
        report.gallery_items, report.icons
    ));

    let ssr = report
        .projects
        .iter()
        .filter(|(_, s)| !matches!(s, Strategy::Client { .. }))
        .count();
    lines.push(format!(
        "Generated {} projects ({} SSR, {} client), {} gallery items",
        report.projects.len(),
        ssr,
        report.projects.len() - ssr,
        report.gallery_items
    ));
    lines
}

pub fn print_generate_output(report: &GenerateReport) {
    print_lines(format_generate_output(report));
}

// ============================================================================
// Gallery
// ============================================================================

/// Format the ordered gallery and the dropdown accent it produced.
pub fn format_gallery_output(
    items: &[GalleryItem],
    mode: SortMode,
    accent: &DropdownAccent,
) -> Vec<String> {
    let mut lines = vec![format!("Gallery ({})", mode.label())];
    if items.is_empty() {
        lines.push(format!("{}(no items)", indent(1)));
    }
    for (i, item) in items.iter().enumerate() {
        let title = if item.title.is_empty() {
            "(untitled)"
        } else {
            item.title.as_str()
        };
        lines.push(entity_header(i + 1, title, None));
        if !item.url1.is_empty() {
            lines.push(format!("{}Link: {}", indent(1), item.url1));
        }
    }
    lines.push(String::new());
    lines.push("Accent".to_string());
    lines.push(format!("{}Border: {}", indent(1), accent.border));
    lines.push(format!("{}Shadow: {}", indent(1), accent.box_shadow));
    lines
}

pub fn print_gallery_output(items: &[GalleryItem], mode: SortMode, accent: &DropdownAccent) {
    print_lines(format_gallery_output(items, mode, accent));
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ModuleId;
    use crate::registry::{ProjectKey, Registry};
    use crate::test_helpers::item;

    fn meta(key: ProjectKey) -> ProjectMeta {
        Registry::standard().get(key).unwrap().meta.clone()
    }

    #[test]
    fn format_index_pads_to_three() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn entity_header_with_and_without_tag() {
        assert_eq!(entity_header(3, "Rotary Lamp", Some("rotary")), "003 Rotary Lamp [rotary]");
        assert_eq!(entity_header(1, "Ana", None), "001 Ana");
    }

    #[test]
    fn projects_list_strategy_and_links() {
        let projects = vec![
            (
                meta(ProjectKey::Scoop),
                Strategy::SsrEnhanced {
                    enhancer: ModuleId::Enhancer(ProjectKey::Scoop),
                },
            ),
            (
                meta(ProjectKey::Dynamic),
                Strategy::Client {
                    module: ModuleId::DynamicFrame,
                },
            ),
        ];
        let lines = format_projects(&projects);
        assert_eq!(
            lines,
            [
                "Projects",
                "001 Ice Cream Scoop [scoop]",
                "    Strategy: ssr + enhancer:scoop",
                "002 Dynamic App [dynamic]",
                "    Strategy: client dynamic-frame",
                "    Link: /dynamic/",
            ]
        );
    }

    #[test]
    fn generate_output_summarizes() {
        let report = GenerateReport {
            projects: vec![
                (meta(ProjectKey::Rotary), Strategy::Ssr),
                (
                    meta(ProjectKey::Game),
                    Strategy::Client {
                        module: ModuleId::Client(ProjectKey::Game),
                    },
                ),
            ],
            gallery_items: 7,
            icons: 2,
        };
        let lines = format_generate_output(&report);
        assert_eq!(lines[0], "Landing \u{2192} index.html");
        assert_eq!(lines[1], "    001 Rotary Lamp [rotary]");
        assert!(
            lines.contains(&"Gallery \u{2192} dynamic/index.html (7 items, 2 icons)".to_string())
        );
        assert_eq!(
            lines.last().unwrap(),
            "Generated 2 projects (1 SSR, 1 client), 7 gallery items"
        );
    }

    #[test]
    fn gallery_output_lists_items_and_accent() {
        let mut ana = item("Ana");
        ana.url1 = "https://ana.example.com".into();
        let items = vec![ana, item("")];
        let accent = DropdownAccent {
            border: "rgba(1, 2, 3, 0.8)".into(),
            box_shadow: "#040506".into(),
        };
        let lines = format_gallery_output(&items, SortMode::TitleAsc, &accent);
        assert_eq!(
            lines,
            [
                "Gallery (A to Z)",
                "001 Ana",
                "    Link: https://ana.example.com",
                "002 (untitled)",
                "",
                "Accent",
                "    Border: rgba(1, 2, 3, 0.8)",
                "    Shadow: #040506",
            ]
        );
    }

    #[test]
    fn gallery_output_empty() {
        let accent = DropdownAccent {
            border: "rgba(255, 255, 255, 0.8)".into(),
            box_shadow: "#ffffff".into(),
        };
        let lines = format_gallery_output(&[], SortMode::Random, &accent);
        assert_eq!(lines[0], "Gallery (Randomized)");
        assert_eq!(lines[1], "    (no items)");
    }

    #[test]
    fn resolve_output_shows_markup_lines() {
        let lines =
            format_resolve_output(&meta(ProjectKey::Game), Strategy::Ssr, "<p>a</p>\n<p>b</p>");
        assert_eq!(lines[0], "001 Evade the Rock [game]");
        assert_eq!(lines[1], "    Strategy: ssr");
        assert_eq!(&lines[3..], ["<p>a</p>", "<p>b</p>"]);
    }
}
