// src/ports/listing.rs
use crate::domain::{Note, Subgroup};
use time::format_description::well_known::Rfc3339;

/// Plain-text presenter for note listings on the CLI.
#[derive(Debug, Default)]
pub struct ListingPresenter;

impl ListingPresenter {
    pub fn new() -> Self {
        Self
    }

    /// One line per note: id, subgroup tag (if any), copy count, title and a
    /// shortened first content line.
    pub fn render(&self, notes: &[Note], subgroups: &[Subgroup]) -> String {
        if notes.is_empty() {
            return "No notes.".to_string();
        }

        let mut out = String::new();
        for note in notes {
            let group = note
                .subgroup_id
                .as_deref()
                .and_then(|id| subgroups.iter().find(|s| s.id == id))
                .map(|s| format!(" [{}]", s.name))
                .unwrap_or_default();
            let updated = note
                .updated_at
                .format(&Rfc3339)
                .unwrap_or_else(|_| "-".to_string());

            out.push_str(&format!(
                "{}  {}{}  (copied {}, updated {})\n    {}\n",
                note.id,
                note.title,
                group,
                note.copy_count,
                updated,
                first_line(&note.content, 60),
            ));
        }
        out
    }
}

fn first_line(content: &str, max_chars: usize) -> &str {
    let line = content.lines().next().unwrap_or("");
    match line.char_indices().nth(max_chars) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}
