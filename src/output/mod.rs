//! Output formatting for CLI display
//!
//! Results go to stdout. In quiet mode every line is a bare value, one per
//! line, so output can be piped.

use crate::db::{BulkOpSummary, EntityId};
use crate::provider::PlaylistMetadata;
use colored::Colorize;

/// Format a playlist id with its tags for display
#[must_use]
pub fn playlist_with_tags(id: &EntityId, tags: &[String], quiet: bool) -> String {
    if quiet {
        id.to_string()
    } else if tags.is_empty() {
        format!("  {id} (no tags)")
    } else {
        format!("  {} [{}]", id.to_string().cyan(), tags.join(", "))
    }
}

/// Format playlist metadata as a title line
#[must_use]
pub fn playlist_title(metadata: &PlaylistMetadata, quiet: bool) -> String {
    let id = EntityId::from_uri(&metadata.uri);
    if quiet {
        id.to_string()
    } else if metadata.description.is_empty() {
        format!("  {} {}", metadata.name.bold(), format!("({id})").dimmed())
    } else {
        format!(
            "  {} {} - {}",
            metadata.name.bold(),
            format!("({id})").dimmed(),
            metadata.description
        )
    }
}

/// Format a tag with usage count
#[must_use]
pub fn tag_with_count(tag: &str, count: usize, quiet: bool) -> String {
    if quiet {
        format!("{tag}\t{count}")
    } else {
        format!("  {tag} (used by {count} playlist(s))")
    }
}

/// Print a bulk operation summary
pub fn print_summary(summary: &BulkOpSummary, operation: &str) {
    println!("\n{}", format!("=== {operation} Summary ===").bold());
    println!("  {} {}", "✓ Success:".green(), summary.success);
    if summary.skipped > 0 {
        println!("  {} {}", "⊘ Skipped:".yellow(), summary.skipped);
    }
    if summary.skipped_condition > 0 {
        println!(
            "  {} {}",
            "⊘ Skipped (no match):".yellow(),
            summary.skipped_condition
        );
    }
    if summary.errors > 0 {
        println!("  {} {}", "✗ Errors:".red(), summary.errors);
        for msg in &summary.error_messages {
            println!("    - {msg}");
        }
    }
}
