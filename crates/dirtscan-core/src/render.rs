use dirtscan_types::BatchReceipt;

/// Render the markdown summary consumed by the presentation layer.
pub fn render_markdown_for_receipt(receipt: &BatchReceipt) -> String {
    let mut out = String::new();
    out.push_str(&format!("## dirtscan — {}\n\n", receipt.game.as_str()));

    let dirty = receipt
        .plugins
        .iter()
        .filter(|r| !r.counts.is_clean())
        .count();
    out.push_str(&format!(
        "Analyzed **{}** plugin(s); **{}** with findings, **{}** failed.\n\n",
        receipt.plugins.len(),
        dirty,
        receipt.failures.len()
    ));

    if !receipt.plugins.is_empty() {
        out.push_str("| Plugin | ITM | Deleted refs | Deleted navmeshes | HITMEs |\n");
        out.push_str("|---|---:|---:|---:|---:|\n");
        for report in &receipt.plugins {
            out.push_str(&format!(
                "| `{}` | {} | {} | {} | {} |\n",
                escape_md(&report.plugin),
                report.counts.identical_to_master,
                report.counts.deleted_references,
                report.counts.deleted_navmeshes,
                report.counts.higher_index
            ));
        }
        out.push_str(&format!(
            "| **Total** | {} | {} | {} | {} |\n\n",
            receipt.totals.identical_to_master,
            receipt.totals.deleted_references,
            receipt.totals.deleted_navmeshes,
            receipt.totals.higher_index
        ));
    }

    if !receipt.failures.is_empty() {
        out.push_str("**Failed plugins:**\n");
        for failure in &receipt.failures {
            out.push_str(&format!(
                "- `{}`: {}\n",
                escape_md(&failure.plugin),
                escape_md(&failure.message)
            ));
        }
        out.push('\n');
    }

    if receipt.plugins.is_empty() && receipt.failures.is_empty() {
        out.push_str("No plugins analyzed.\n");
    }

    out
}

/// Pretty-printed JSON receipt.
pub fn render_json_for_receipt(receipt: &BatchReceipt) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(receipt)
}

fn escape_md(s: &str) -> String {
    s.replace('|', "\\|").replace('`', "\\`")
}
