//! crates/skripsi_core/src/export/mod.rs
//!
//! The export pipeline: three independent renderers (DOCX, Markdown, JSON
//! backup) plus the preview, validation and filename helpers. Every renderer
//! consumes a read-only project snapshot; none mutates it, so a failed
//! export can never corrupt the document store.

mod docx;
mod markdown;

pub use docx::to_docx;
pub use markdown::to_markdown;

use serde::Serialize;

use crate::domain::{BabContent, Project, COMPLETED_CONTENT_LEN, MIN_TITLE_LEN};

/// Placeholder shown for chapters without resolved content.
pub(crate) const CONTENT_PLACEHOLDER: &str = "Konten bab belum tersedia";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Gagal mengexport ke format DOCX. Silakan coba lagi.")]
    Docx(String),
    #[error("Gagal mengexport ke format JSON. Silakan coba lagi.")]
    Json(String),
}

/// Converts arbitrary text to a filename-safe token: lowercase, every run
/// of non-alphanumeric characters collapsed to a single underscore, leading
/// and trailing underscores stripped.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    slug
}

/// Filename for the word-processor artifact.
pub fn docx_file_name(project: &Project) -> String {
    format!("{}_skripsi.docx", slugify(&project.title))
}

/// Filename for the Markdown artifact.
pub fn markdown_file_name(project: &Project) -> String {
    format!("{}_skripsi.md", slugify(&project.title))
}

/// Filename for the JSON backup artifact.
pub fn json_file_name(project: &Project) -> String {
    format!("{}_backup.json", slugify(&project.title))
}

/// Resolves the chapter content for one outline item: matched by chapter id
/// first, exact title equality as the fallback. Id takes priority when both
/// could apply.
pub(crate) fn resolve_content<'a>(
    project: &'a Project,
    item_id: &str,
    item_title: &str,
) -> Option<&'a BabContent> {
    project
        .bab_contents
        .iter()
        .find(|c| c.id == item_id)
        .or_else(|| project.bab_contents.iter().find(|c| c.title == item_title))
}

/// Full project snapshot, pretty-printed, timestamps in canonical ISO-8601
/// text. Semantics are unchanged from the in-memory form.
pub fn to_json(project: &Project) -> Result<String, ExportError> {
    serde_json::to_string_pretty(project).map_err(|e| ExportError::Json(e.to_string()))
}

//=========================================================================================
// Preview and Validation
//=========================================================================================

/// Overall status label derived from the completed/total chapter ratio.
pub fn status_label(project: &Project) -> &'static str {
    let total_babs = project.outline.len();
    if total_babs == 0 {
        return "Belum Dimulai";
    }
    let completed_babs = project
        .outline
        .iter()
        .filter(|item| {
            resolve_content(project, &item.id, &item.title)
                .is_some_and(|c| c.content.chars().count() > COMPLETED_CONTENT_LEN)
        })
        .count();
    let percentage = ((completed_babs as f64 / total_babs as f64) * 100.0).round() as u32;

    if percentage == 100 {
        "Selesai"
    } else if percentage >= 75 {
        "Hampir Selesai"
    } else if percentage >= 50 {
        "Dalam Proses"
    } else if percentage >= 25 {
        "Baru Dimulai"
    } else {
        "Belum Dimulai"
    }
}

/// A condensed Markdown-like summary of the project: overall status plus a
/// per-chapter checklist. Not a file export.
pub fn preview(project: &Project) -> String {
    let mut out = format!("# {}\n\n", project.title);
    out.push_str(&format!("**Status:** {}\n", status_label(project)));
    out.push_str(&format!(
        "**Terakhir diupdate:** {}\n\n",
        project.last_modified.format("%-d/%-m/%Y")
    ));
    out.push_str("## Ringkasan Outline\n\n");
    for (index, item) in project.outline.iter().enumerate() {
        let complete = resolve_content(project, &item.id, &item.title)
            .is_some_and(|c| c.content.chars().count() > COMPLETED_CONTENT_LEN);
        let status = if complete { "✅" } else { "⏳" };
        out.push_str(&format!("{}. {} {}\n", index + 1, status, item.title));
    }
    out
}

/// Result of the completeness validation, with violated checks as
/// user-facing strings. Non-fatal: export stays available regardless.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Checks aggregate completeness only: title length, outline presence and
/// at least one chapter content. Per-chapter completeness is deliberately
/// not checked here.
pub fn validate(project: &Project) -> ValidationReport {
    let mut errors = Vec::new();

    if project.title.trim().chars().count() < MIN_TITLE_LEN {
        errors.push("Judul skripsi terlalu pendek (minimal 5 karakter)".to_string());
    }
    if project.outline.is_empty() {
        errors.push("Outline belum dibuat".to_string());
    }
    if project.bab_contents.is_empty() {
        errors.push("Belum ada konten bab yang dibuat".to_string());
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}
