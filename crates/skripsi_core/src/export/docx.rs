//! crates/skripsi_core/src/export/docx.rs
//!
//! Renders a project snapshot to a word-processor document using `docx-rs`:
//! centered title, a table-of-contents section, then one chapter per outline
//! item (heading, italic description, content paragraphs split on blank
//! lines) with a page break before each following chapter.

use docx_rs::{AlignmentType, Docx, Paragraph, Run};

use crate::domain::Project;
use crate::export::{resolve_content, ExportError, CONTENT_PLACEHOLDER};

// Run sizes are in half-points.
const TITLE_SIZE: usize = 28;
const HEADING_SIZE: usize = 24;
const BODY_SIZE: usize = 20;

/// Builds the document and returns the serialized `.docx` bytes.
pub fn to_docx(project: &Project) -> Result<Vec<u8>, ExportError> {
    let mut docx = Docx::new()
        // Main title, centered.
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(project.title.as_str()).bold().size(TITLE_SIZE))
                .align(AlignmentType::Center),
        )
        .add_paragraph(Paragraph::new())
        // Table of contents heading.
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text("DAFTAR ISI").bold().size(HEADING_SIZE))
                .align(AlignmentType::Center),
        );

    for item in &project.outline {
        docx = docx.add_paragraph(
            Paragraph::new().add_run(Run::new().add_text(item.title.as_str()).size(BODY_SIZE)),
        );
    }
    docx = docx.add_paragraph(Paragraph::new());

    for paragraph in chapter_paragraphs(project) {
        docx = docx.add_paragraph(paragraph);
    }

    let mut buffer = std::io::Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| ExportError::Docx(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// One heading, one italic description and the content paragraphs per
/// outline item, followed by a page break before the next chapter.
fn chapter_paragraphs(project: &Project) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();

    for item in &project.outline {
        paragraphs.push(
            Paragraph::new()
                .add_run(Run::new().add_text(item.title.as_str()).bold().size(HEADING_SIZE)),
        );
        paragraphs.push(
            Paragraph::new()
                .add_run(Run::new().add_text(item.content.as_str()).italic().size(BODY_SIZE)),
        );

        match resolve_content(project, &item.id, &item.title) {
            Some(bab) if !bab.content.is_empty() => {
                for segment in split_paragraphs(&bab.content) {
                    paragraphs.push(
                        Paragraph::new().add_run(Run::new().add_text(segment).size(BODY_SIZE)),
                    );
                }
            }
            _ => {
                paragraphs.push(
                    Paragraph::new().add_run(
                        Run::new()
                            .add_text(format!("[{CONTENT_PLACEHOLDER}]"))
                            .italic()
                            .size(BODY_SIZE),
                    ),
                );
            }
        }

        paragraphs.push(Paragraph::new().page_break_before(true));
    }

    paragraphs
}

/// Splits rich text on blank-line boundaries, one segment per non-empty
/// block, trimmed.
pub(crate) fn split_paragraphs(content: &str) -> Vec<&str> {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::{bab, sample_project};

    #[test]
    fn split_paragraphs_breaks_on_blank_lines() {
        assert_eq!(split_paragraphs("Para A\n\nPara B"), vec!["Para A", "Para B"]);
        assert_eq!(split_paragraphs("Satu baris"), vec!["Satu baris"]);
        assert_eq!(split_paragraphs("A\n\n\n\nB"), vec!["A", "B"]);
        assert!(split_paragraphs("  \n\n  ").is_empty());
    }

    #[test]
    fn blank_line_content_becomes_two_document_paragraphs() {
        let mut project = sample_project();
        project.upsert_bab_content(bab("bab-1", "BAB 1: PENDAHULUAN", "Para A\n\nPara B"));

        // heading + description + 2 content paragraphs + page break,
        // then heading + description + placeholder + page break for bab-2.
        let paragraphs = chapter_paragraphs(&project);
        assert_eq!(paragraphs.len(), 9);
    }

    #[test]
    fn placeholder_paragraph_added_for_missing_content() {
        let paragraphs = chapter_paragraphs(&sample_project());
        // Two chapters, each: heading + description + placeholder + break.
        assert_eq!(paragraphs.len(), 8);
    }

    #[test]
    fn produces_a_non_empty_docx_archive() {
        let mut project = sample_project();
        project.upsert_bab_content(bab("bab-1", "BAB 1: PENDAHULUAN", "Isi bab satu."));

        let bytes = to_docx(&project).unwrap();
        // A .docx file is a ZIP archive; check the magic header.
        assert!(bytes.len() > 4);
        assert_eq!(&bytes[..2], b"PK");
    }
}
