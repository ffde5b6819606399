//! Mass-tag command - derive tags for the whole library

use super::Result;
use crate::cli::RuleKind;
use crate::config::MassTagSettings;
use crate::masstag::{MassTagError, MassTagOperator, MassTagRule};
use crate::output::print_summary;
use colored::Colorize;
use tokio_util::sync::CancellationToken;

/// Resolve the rule to run from the command line and configured defaults
#[must_use]
pub fn build_rule(
    kind: RuleKind,
    settings: &MassTagSettings,
    threshold: Option<usize>,
    include_non_latin: bool,
    tag: Option<String>,
) -> MassTagRule {
    match kind {
        RuleKind::Artist => MassTagRule::Artist {
            threshold: threshold.unwrap_or(settings.artist_threshold),
            exclude_non_latin: settings.exclude_non_latin && !include_non_latin,
        },
        RuleKind::Creator => MassTagRule::Creator,
        RuleKind::LocalFiles => tag.map_or_else(|| settings.local_files_rule(), |tag| MassTagRule::LocalFiles { tag }),
        RuleKind::Unplayable => tag.map_or_else(|| settings.unplayable_rule(), |tag| MassTagRule::Unplayable { tag }),
        RuleKind::Year => MassTagRule::Year,
    }
}

/// Execute the mass-tag command
///
/// Ctrl-C stops the walk; tags applied before it are kept.
///
/// # Errors
/// Returns an error if the library cannot be listed
pub async fn execute(operator: &MassTagOperator, rule: &MassTagRule, quiet: bool) -> Result<()> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let result = operator.run_library(rule, &cancel).await;
    watcher.abort();

    match result {
        Ok(summary) => {
            if !quiet {
                print_summary(&summary, &format!("Mass tagging ({})", rule.name()));
            }
            Ok(())
        }
        Err(MassTagError::Cancelled) => {
            eprintln!("{} Mass tagging cancelled; tags applied so far were kept.", "!".yellow());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rule_uses_settings() {
        let settings = MassTagSettings {
            artist_threshold: 3,
            exclude_non_latin: true,
            local_files_tag: "[local]".to_string(),
            unplayable_tag: "[dead]".to_string(),
        };

        assert_eq!(
            build_rule(RuleKind::Artist, &settings, None, false, None),
            MassTagRule::Artist {
                threshold: 3,
                exclude_non_latin: true
            }
        );
        assert_eq!(
            build_rule(RuleKind::LocalFiles, &settings, None, false, None),
            MassTagRule::LocalFiles {
                tag: "[local]".to_string()
            }
        );
    }

    #[test]
    fn test_build_rule_flags_override_settings() {
        let settings = MassTagSettings::default();

        assert_eq!(
            build_rule(RuleKind::Artist, &settings, Some(10), true, None),
            MassTagRule::Artist {
                threshold: 10,
                exclude_non_latin: false
            }
        );
        assert_eq!(
            build_rule(RuleKind::Unplayable, &settings, None, false, Some("[x]".to_string())),
            MassTagRule::Unplayable { tag: "[x]".to_string() }
        );
    }
}
