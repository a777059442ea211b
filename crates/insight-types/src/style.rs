/// Wrap user declarations in the rule that scopes highlight visuals under the
/// page-level enable class.
pub fn highlight_rule(declarations: &str) -> String {
    let body = declarations
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        ".insight-word-enable insight-word.insight-word-highlight {{\n    /* custom style */\n{body}\n    /* end */\n}}"
    )
}

/// Built-in highlight styles offered by the settings popup
pub fn preset_styles() -> Vec<String> {
    [
        "text-shadow: 0 0 5px #ade30b, 0 0 5px #ade30b",
        "text-decoration: rgba(10, 163, 205, 0.491) wavy underline;",
        "background-color: rgba(10, 163, 205, 0.491);",
        "filter: drop-shadow(0 0 3px #ade30b) drop-shadow(0 0 3px #ade30b);",
    ]
    .into_iter()
    .map(highlight_rule)
    .collect()
}

pub fn default_style() -> String {
    highlight_rule("text-shadow: 0 0 5px #ade30b, 0 0 5px #ade30b")
}
