use crate::models::interview::TranscriptEntry;

/// Renders transcript turns as `- {role}: {content}` lines, in order.
pub fn format_transcript(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("- {}: {}\n", entry.role, entry.content))
        .collect()
}
