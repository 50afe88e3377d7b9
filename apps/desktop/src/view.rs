use std::fmt::Write as _;

use client_core::FormState;

const REQUIRED: &str = "<required>";

fn shown(text: &str) -> &str {
    if text.is_empty() {
        REQUIRED
    } else {
        text
    }
}

/// Renders the menu as the editor shows it. Empty names, keys and values are
/// flagged but never block a save.
pub fn render(state: &FormState) -> String {
    let mut out = String::new();
    if state.records().is_empty() {
        out.push_str("(no beers; try 'add-beer')\n");
    }
    for (index, record) in state.records().iter().enumerate() {
        let _ = write!(out, "[{index}] {}", shown(&record.name));
        if let Some(style) = &record.style {
            let _ = write!(out, " ({style})");
        }
        out.push('\n');
        for (position, field) in record.fields.iter().enumerate() {
            let id = field.id.to_string();
            let _ = writeln!(
                out,
                "    {position} #{} {} = {}",
                &id[..8],
                shown(&field.key),
                shown(&field.value)
            );
        }
    }
    if state.is_saving() {
        out.push_str("saving...\n");
    }
    if let Some(notice) = state.notice() {
        let _ = writeln!(out, "* {}", notice.message());
    }
    out
}
