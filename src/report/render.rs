use serde_json::json;

use super::ReportTree;

/// The whole report when nothing matched.
pub const NO_RESULTS: &str = "### No assets matched the given conditions.";

const RULE_WIDTH: usize = 30;

/// Renders `tree` as a Markdown-flavoured text report.
///
/// Layout: title, total count, then one section per squad and one subsection
/// per character, all in lexicographic order. An empty tree renders as
/// [`NO_RESULTS`] alone.
pub fn render(tree: &ReportTree, title: &str) -> String {
    if tree.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut lines = vec![
        format!("# {}", title),
        format!("Total: {} asset(s) found.", tree.total()),
        "=".repeat(RULE_WIDTH),
    ];

    for (squad, characters) in tree.iter() {
        lines.push(String::new());
        lines.push(format!("## Squad: {}", squad));
        lines.push("-".repeat(squad.chars().count() + 8));

        for (name, paths) in characters {
            lines.push(String::new());
            lines.push(format!("### {} ({})", name, paths.len()));
            lines.extend(paths.iter().map(|p| format!("  - {}", p)));
        }
    }

    lines.join("\n")
}

/// Renders `tree` as a JSON document with the same content as [`render`].
pub fn render_json(tree: &ReportTree, title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "total": tree.total(),
        "squads": tree,
    })
}
