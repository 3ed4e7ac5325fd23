use jobgraph_core::StructuredIssue;

pub fn render_issue_lines(issues: &[StructuredIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  {issue}"))
        .collect::<Vec<_>>()
        .join("\n")
}
