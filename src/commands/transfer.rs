//! Export and import commands

use super::Result;
use crate::PlaylistTagsError;
use crate::codec::{self, ImportReport};
use crate::db::TagStore;
use colored::Colorize;
use std::io::Read;
use std::path::Path;

/// Execute the export command
///
/// Writes to the clipboard, to `output`, or to stdout.
///
/// # Errors
/// Returns an error if the store cannot be read or the destination cannot be written
pub fn export(
    store: &TagStore,
    exclude_tag: Option<&str>,
    clipboard: bool,
    output: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let text = codec::export(store, exclude_tag)?;
    let lines = text.lines().count();

    if clipboard {
        let mut board = arboard::Clipboard::new().map_err(|e| PlaylistTagsError::Clipboard(e.to_string()))?;
        board
            .set_text(text)
            .map_err(|e| PlaylistTagsError::Clipboard(e.to_string()))?;
        if !quiet {
            println!("{} Copied {lines} line(s) to the clipboard", "✓".green());
        }
    } else if let Some(path) = output {
        std::fs::write(path, format!("{text}\n"))?;
        if !quiet {
            println!("{} Wrote {lines} line(s) to {}", "✓".green(), path.display());
        }
    } else {
        println!("{text}");
    }
    Ok(())
}

/// Execute the import command
///
/// Reads from the clipboard, from `path`, or from stdin.
///
/// # Errors
/// Returns an error if the source cannot be read or storage fails outside quota
pub fn import(store: &TagStore, path: Option<&Path>, clipboard: bool, quiet: bool) -> Result<()> {
    let text = if clipboard {
        arboard::Clipboard::new()
            .and_then(|mut board| board.get_text())
            .map_err(|e| PlaylistTagsError::Clipboard(e.to_string()))?
    } else if let Some(path) = path {
        std::fs::read_to_string(path)?
    } else {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        text
    };

    let report = codec::import(store, &text)?;
    if !quiet {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &ImportReport) {
    println!("{} Imported {} of {} line(s)", "✓".green(), report.applied, report.attempted);
    if report.skipped > 0 {
        println!("  {} {} malformed line(s) skipped", "→".yellow(), report.skipped);
    }
    if report.halted {
        println!("  {} Storage full; import stopped early", "✗".red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::EntityId;
    use crate::testing::TestStore;
    use tempfile::TempDir;

    #[test]
    fn test_export_then_import_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tags.txt");

        let source = TestStore::new();
        source.store().add_tags(&EntityId::from("a"), "rock chill").unwrap();
        export(source.store(), None, false, Some(&path), true).unwrap();

        let target = TestStore::new();
        import(target.store(), Some(&path), false, true).unwrap();
        assert_eq!(
            target.store().tags_of(&EntityId::from("a")).unwrap(),
            vec!["rock".to_string(), "chill".to_string()]
        );
        assert_eq!(target.store().tagged_ids().unwrap(), vec![EntityId::from("a")]);
    }

    #[test]
    fn test_import_missing_file() {
        let test = TestStore::new();
        let err = import(test.store(), Some(Path::new("/nonexistent/tags.txt")), false, true).unwrap_err();
        assert!(matches!(err, PlaylistTagsError::IoError(_)));
    }
}
