//! crates/skripsi_core/src/export/markdown.rs
//!
//! Renders a project snapshot to Markdown text: title heading, last-modified
//! note, linked table of contents, then one section per outline item with
//! its description in italics and the resolved chapter content.

use crate::domain::Project;
use crate::export::{resolve_content, CONTENT_PLACEHOLDER};

/// Anchor token for a table-of-contents link: lowercased, every
/// non-alphanumeric character replaced by a hyphen. Kept character-per-
/// character (no run collapsing) to match the anchors the headings produce.
fn heading_anchor(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

/// Renders the full Markdown document.
pub fn to_markdown(project: &Project) -> String {
    let mut markdown = format!("# {}\n\n", project.title);

    markdown.push_str(&format!(
        "*Terakhir diupdate: {}*\n\n",
        project.last_modified.format("%-d/%-m/%Y")
    ));

    markdown.push_str("## Daftar Isi\n\n");
    for (index, item) in project.outline.iter().enumerate() {
        markdown.push_str(&format!(
            "{}. [{}](#{})\n",
            index + 1,
            item.title,
            heading_anchor(&item.title)
        ));
    }
    markdown.push('\n');

    for item in &project.outline {
        markdown.push_str(&format!("## {}\n\n", item.title));
        markdown.push_str(&format!("*{}*\n\n", item.content));

        match resolve_content(project, &item.id, &item.title) {
            Some(bab) if !bab.content.is_empty() => {
                markdown.push_str(&format!("{}\n\n", bab.content));
            }
            _ => {
                markdown.push_str(&format!("*{CONTENT_PLACEHOLDER}*\n\n"));
            }
        }

        markdown.push_str("---\n\n");
    }

    markdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::{bab, sample_project};

    #[test]
    fn renders_title_toc_and_sections_in_order() {
        let markdown = to_markdown(&sample_project());

        assert!(markdown.starts_with("# Implementasi Machine Learning"));
        assert!(markdown.contains("## Daftar Isi"));
        assert!(markdown.contains("1. [BAB 1: PENDAHULUAN](#bab-1--pendahuluan)"));
        assert!(markdown.contains("2. [BAB 2: TINJAUAN PUSTAKA](#bab-2--tinjauan-pustaka)"));

        let bab1 = markdown.find("## BAB 1: PENDAHULUAN").unwrap();
        let bab2 = markdown.find("## BAB 2: TINJAUAN PUSTAKA").unwrap();
        assert!(bab1 < bab2);
    }

    #[test]
    fn missing_content_renders_the_placeholder() {
        let markdown = to_markdown(&sample_project());
        assert!(markdown.contains("*Konten bab belum tersedia*"));
    }

    #[test]
    fn resolved_content_replaces_the_placeholder() {
        let mut project = sample_project();
        project.upsert_bab_content(bab("bab-1", "BAB 1: PENDAHULUAN", "Isi bab satu."));
        let markdown = to_markdown(&project);

        assert!(markdown.contains("Isi bab satu.\n\n---"));
        // The second chapter still has no content.
        assert!(markdown.contains("*Konten bab belum tersedia*"));
    }

    #[test]
    fn descriptions_are_italicized() {
        let markdown = to_markdown(&sample_project());
        assert!(markdown.contains("*Latar belakang dan tujuan*"));
    }

    #[test]
    fn sections_end_with_a_horizontal_rule() {
        let project = sample_project();
        let markdown = to_markdown(&project);
        assert_eq!(markdown.matches("---\n\n").count(), project.outline.len());
    }
}
