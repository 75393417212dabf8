use tracing::{debug, warn};

use dirtscan_domain::{classify_plugin, GameRules, LoadOrderSnapshot, SnapshotError};
use dirtscan_types::{
    BatchReceipt, GameKind, LoadOrderDoc, PluginCounts, PluginFailure, PluginReport, ToolMeta,
    UnknownGame, REPORT_SCHEMA_V1,
};

/// What to analyze out of a load-order document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisPlan {
    /// Plugins to analyze. Empty means every plugin in the load order.
    pub plugins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalyzeError {
    #[error(transparent)]
    UnsupportedGame(#[from] UnknownGame),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("no plugin named '{0}' in the load order")]
    UnknownPlugin(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchRun {
    pub receipt: BatchReceipt,
    /// Plugins whose counters are nonzero.
    pub dirty_plugins: usize,
}

/// Run one analysis batch over the load order.
///
/// The snapshot is built once and treated as an immutable view for the
/// whole batch. Each plugin's pass is independent: a failure is captured
/// in the receipt and never aborts the remaining plugins. An unsupported
/// game or an inconsistent snapshot is fatal for the entire batch and is
/// reported to the caller rather than surfacing as a zeroed result.
pub fn run_analysis(doc: &LoadOrderDoc, plan: &AnalysisPlan) -> Result<BatchRun, AnalyzeError> {
    let game: GameKind = doc.game.parse()?;
    let rules = GameRules::for_game(game);
    let snapshot = LoadOrderSnapshot::build(&doc.plugins)?;

    for requested in &plan.plugins {
        if !doc.plugins.iter().any(|p| p.name == *requested) {
            return Err(AnalyzeError::UnknownPlugin(requested.clone()));
        }
    }

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    let mut totals = PluginCounts::default();

    for plugin in &doc.plugins {
        if !plan.plugins.is_empty() && !plan.plugins.contains(&plugin.name) {
            continue;
        }

        match classify_plugin(plugin, &snapshot, &rules) {
            Ok(counts) => {
                debug!(
                    plugin = plugin.name.as_str(),
                    itm = counts.identical_to_master,
                    deleted_refs = counts.deleted_references,
                    deleted_navmeshes = counts.deleted_navmeshes,
                    hitme = counts.higher_index,
                    "plugin classified"
                );
                totals.absorb(&counts);
                reports.push(PluginReport {
                    plugin: plugin.name.clone(),
                    counts,
                });
            }
            Err(err) => {
                warn!(
                    plugin = plugin.name.as_str(),
                    error = %err,
                    "plugin analysis failed"
                );
                failures.push(PluginFailure {
                    plugin: plugin.name.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    let dirty_plugins = reports.iter().filter(|r| !r.counts.is_clean()).count();

    Ok(BatchRun {
        receipt: BatchReceipt {
            schema: REPORT_SCHEMA_V1.to_string(),
            tool: ToolMeta {
                name: "dirtscan".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            game,
            plugins: reports,
            failures,
            totals,
        },
        dirty_plugins,
    })
}
