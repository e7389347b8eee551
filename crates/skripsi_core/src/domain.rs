//! crates/skripsi_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application: the thesis
//! project aggregate and its nested entities. These structs are independent
//! of any storage backend; serde derives exist only because the persisted
//! slot and the JSON backup share the exact in-memory shape (camelCase
//! fields, ISO-8601 timestamps).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum number of characters required for a thesis title.
pub const MIN_TITLE_LEN: usize = 5;

/// Character threshold above which a chapter counts as "completed" for the
/// progress heuristic.
pub const COMPLETED_CONTENT_LEN: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// The title was shorter than [`MIN_TITLE_LEN`] after trimming.
    #[error("Judul skripsi minimal 5 karakter")]
    TitleTooShort,
    /// An outline position was outside 0..len.
    #[error("Posisi outline di luar jangkauan: {0}")]
    PositionOutOfRange(usize),
}

/// One planned chapter (BAB) of the thesis: title, short description and
/// 1-based position. `order` is recomputed after every outline mutation so
/// it is always a contiguous 1..N permutation matching insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineItem {
    pub id: String,
    pub title: String,
    pub content: String,
    pub order: u32,
}

/// The long-form text authored or AI-generated for one outline item.
///
/// `id` should correspond to an `OutlineItem.id` for export to resolve it,
/// but that is intentionally not enforced at write time: export also matches
/// by exact title so orphaned content is still reachable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BabContent {
    pub id: String,
    pub title: String,
    pub content: String,
    pub ai_generated: bool,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// A single entry of the assistant chat transcript. Append-only during a
/// session; ordering is chronological insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub message: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

/// The root aggregate: one thesis project per session. Sole owner of all
/// nested entities; every mutation refreshes `last_modified`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    pub outline: Vec<OutlineItem>,
    pub bab_contents: Vec<BabContent>,
    pub chat_history: Vec<ChatMessage>,
    pub last_modified: DateTime<Utc>,
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl Project {
    /// Creates an empty project.
    pub fn new() -> Self {
        Self {
            title: String::new(),
            outline: Vec::new(),
            bab_contents: Vec::new(),
            chat_history: Vec::new(),
            last_modified: Utc::now(),
        }
    }

    fn touch(&mut self) {
        self.last_modified = Utc::now();
    }

    /// Renumbers `order` so it mirrors the 1-based positional index.
    fn renumber_outline(&mut self) {
        for (index, item) in self.outline.iter_mut().enumerate() {
            item.order = index as u32 + 1;
        }
    }

    /// Sets the project title. The minimum-length rule is enforced here,
    /// before any network call depends on the title.
    pub fn set_title(&mut self, title: &str) -> Result<(), DomainError> {
        let trimmed = title.trim();
        if trimmed.chars().count() < MIN_TITLE_LEN {
            return Err(DomainError::TitleTooShort);
        }
        self.title = trimmed.to_string();
        self.touch();
        Ok(())
    }

    /// Replaces the whole outline. Insertion order defines chapter order;
    /// `order` fields are recomputed regardless of what the caller sent.
    pub fn set_outline(&mut self, outline: Vec<OutlineItem>) {
        self.outline = outline;
        self.renumber_outline();
        self.touch();
    }

    /// Moves the item at `from` to position `to` and renumbers every item,
    /// not just the moved one.
    pub fn move_outline_item(&mut self, from: usize, to: usize) -> Result<(), DomainError> {
        if from >= self.outline.len() {
            return Err(DomainError::PositionOutOfRange(from));
        }
        if to >= self.outline.len() {
            return Err(DomainError::PositionOutOfRange(to));
        }
        let item = self.outline.remove(from);
        self.outline.insert(to, item);
        self.renumber_outline();
        self.touch();
        Ok(())
    }

    /// Removes the outline item with the given id, if present, and
    /// renumbers the remainder.
    pub fn remove_outline_item(&mut self, id: &str) {
        self.outline.retain(|item| item.id != id);
        self.renumber_outline();
        self.touch();
    }

    /// Inserts or replaces chapter content keyed by id: an update to an
    /// existing id replaces in place, it never appends a duplicate.
    pub fn upsert_bab_content(&mut self, content: BabContent) {
        match self.bab_contents.iter_mut().find(|c| c.id == content.id) {
            Some(existing) => *existing = content,
            None => self.bab_contents.push(content),
        }
        self.touch();
    }

    /// Replaces the chat transcript wholesale.
    pub fn set_chat_history(&mut self, history: Vec<ChatMessage>) {
        self.chat_history = history;
        self.touch();
    }

    /// Appends one message to the transcript.
    pub fn push_chat_message(&mut self, message: ChatMessage) {
        self.chat_history.push(message);
        self.touch();
    }

    /// Clears the chat transcript.
    pub fn clear_chat(&mut self) {
        self.chat_history.clear();
        self.touch();
    }

    /// Returns the project to its empty state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Heuristic completion percentage: the title counts as one step, each
    /// outline item as one more; a chapter is complete once its content
    /// exceeds [`COMPLETED_CONTENT_LEN`] characters. This is a progress
    /// indicator, not a strict correctness measure.
    pub fn progress(&self) -> u32 {
        let total_steps = self.outline.len() + 1;
        let completed_steps = usize::from(!self.title.is_empty())
            + self
                .bab_contents
                .iter()
                .filter(|c| c.content.chars().count() > COMPLETED_CONTENT_LEN)
                .count();
        ((completed_steps as f64 / total_steps as f64) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, title: &str) -> OutlineItem {
        OutlineItem {
            id: id.to_string(),
            title: title.to_string(),
            content: String::new(),
            order: 0,
        }
    }

    fn bab(id: &str, content: &str) -> BabContent {
        BabContent {
            id: id.to_string(),
            title: format!("BAB {id}"),
            content: content.to_string(),
            ai_generated: false,
            last_modified: Utc::now(),
        }
    }

    #[test]
    fn set_title_rejects_short_titles() {
        let mut project = Project::new();
        let err = project.set_title("T").unwrap_err();
        assert_eq!(err.to_string(), "Judul skripsi minimal 5 karakter");
        assert!(project.title.is_empty());

        project.set_title("  Analisis Sistem  ").unwrap();
        assert_eq!(project.title, "Analisis Sistem");
    }

    #[test]
    fn set_outline_renumbers_to_contiguous_sequence() {
        let mut project = Project::new();
        let mut items = vec![item("a", "A"), item("b", "B"), item("c", "C")];
        items[0].order = 7;
        items[2].order = 7;
        project.set_outline(items);

        let orders: Vec<u32> = project.outline.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn move_outline_item_renumbers_every_item() {
        let mut project = Project::new();
        project.set_outline(vec![item("a", "A"), item("b", "B"), item("c", "C")]);

        project.move_outline_item(2, 0).unwrap();

        let ids: Vec<&str> = project.outline.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        let orders: Vec<u32> = project.outline.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn move_outline_item_rejects_out_of_range() {
        let mut project = Project::new();
        project.set_outline(vec![item("a", "A")]);
        assert!(project.move_outline_item(1, 0).is_err());
        assert!(project.move_outline_item(0, 3).is_err());
    }

    #[test]
    fn remove_outline_item_closes_the_gap() {
        let mut project = Project::new();
        project.set_outline(vec![item("a", "A"), item("b", "B"), item("c", "C")]);
        project.remove_outline_item("b");

        let orders: Vec<u32> = project.outline.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![1, 2]);
        assert!(project.outline.iter().all(|i| i.id != "b"));
    }

    #[test]
    fn upsert_replaces_instead_of_appending() {
        let mut project = Project::new();
        project.upsert_bab_content(bab("bab-1", "first draft"));
        project.upsert_bab_content(bab("bab-1", "second draft"));
        project.upsert_bab_content(bab("bab-2", "other chapter"));

        assert_eq!(project.bab_contents.len(), 2);
        assert_eq!(project.bab_contents[0].content, "second draft");
    }

    #[test]
    fn progress_counts_title_and_long_chapters() {
        let mut project = Project::new();
        project.set_outline(vec![item("bab-1", "A"), item("bab-2", "B")]);
        // 3 steps total (title + 2 chapters), none complete yet.
        assert_eq!(project.progress(), 0);

        project.set_title("Judul Skripsi").unwrap();
        assert_eq!(project.progress(), 33);

        project.upsert_bab_content(bab("bab-1", &"x".repeat(101)));
        assert_eq!(project.progress(), 67);

        project.upsert_bab_content(bab("bab-2", &"x".repeat(101)));
        assert_eq!(project.progress(), 100);
    }

    #[test]
    fn progress_is_monotonic_as_chapters_cross_threshold() {
        let mut project = Project::new();
        project.set_title("Judul Skripsi").unwrap();
        project.set_outline((1..=4).map(|i| item(&format!("bab-{i}"), "t")).collect());

        let mut last = project.progress();
        for i in 1..=4 {
            project.upsert_bab_content(bab(&format!("bab-{i}"), &"x".repeat(101)));
            let now = project.progress();
            assert!(now >= last, "progress went backwards: {last} -> {now}");
            last = now;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn short_content_does_not_count_towards_progress() {
        let mut project = Project::new();
        project.set_outline(vec![item("bab-1", "A")]);
        project.upsert_bab_content(bab("bab-1", &"x".repeat(100)));
        assert_eq!(project.progress(), 0);
    }

    #[test]
    fn mutations_refresh_last_modified() {
        let mut project = Project::new();
        let before = project.last_modified;
        std::thread::sleep(std::time::Duration::from_millis(2));
        project.set_outline(vec![item("a", "A")]);
        assert!(project.last_modified > before);
    }

    #[test]
    fn reset_returns_to_empty_state() {
        let mut project = Project::new();
        project.set_title("Judul Skripsi").unwrap();
        project.set_outline(vec![item("a", "A")]);
        project.reset();
        assert!(project.title.is_empty());
        assert!(project.outline.is_empty());
        assert!(project.bab_contents.is_empty());
        assert!(project.chat_history.is_empty());
    }

    #[test]
    fn serialized_shape_uses_camel_case_and_iso_timestamps() {
        let project = Project::new();
        let json = serde_json::to_value(&project).unwrap();
        assert!(json.get("babContents").is_some());
        assert!(json.get("chatHistory").is_some());
        assert!(json.get("lastModified").unwrap().as_str().is_some());
    }
}
