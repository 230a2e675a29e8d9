// CounselDesk - core/render.rs
//
// Text and HTML presentation of keyword results and records: keyword chips,
// the bar-chart "word cloud", and label/value record blocks.
// Core layer: returns strings, performs no I/O.

/// Inline style of one keyword chip.
pub const CHIP_STYLE: &str = "display:inline-block;margin:4px 6px;padding:6px 10px;\
border-radius:16px;background:#e3f2fd;color:#1976d2;font-weight:600";

/// Escape the five HTML-significant characters.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render keywords as styled `#word` chips, concatenated without separators.
pub fn chips_html(items: &[(String, usize)]) -> String {
    items
        .iter()
        .map(|(word, _)| format!("<span style='{}'>#{}</span>", CHIP_STYLE, escape_html(word)))
        .collect()
}

/// Render keywords as `#word` labels for a terminal.
pub fn chips_text(items: &[(String, usize)]) -> String {
    items
        .iter()
        .map(|(word, _)| format!("#{word}"))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Render a horizontal bar chart, one keyword per line.
///
/// The largest count spans `width` cells; every non-zero count gets at least
/// one cell. Labels are padded to a common character width.
pub fn bar_chart(items: &[(String, usize)], width: usize) -> String {
    let Some(max) = items.iter().map(|(_, c)| *c).max().filter(|m| *m > 0) else {
        return String::new();
    };
    let label_width = items
        .iter()
        .map(|(w, _)| w.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (word, count) in items {
        let cells = if *count == 0 {
            0
        } else {
            ((count * width) / max).max(1)
        };
        let pad = label_width - word.chars().count();
        out.push_str(word);
        out.push_str(&" ".repeat(pad));
        out.push_str(" | ");
        out.push_str(&"█".repeat(cells));
        out.push_str(&format!(" {count}\n"));
    }
    out
}

/// Render one record as aligned `label: value` lines.
pub fn record_block(fields: &[(&str, &str)]) -> String {
    let label_width = fields
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (label, value) in fields {
        let pad = label_width - label.chars().count();
        out.push_str(&format!("{label}{} : {value}\n", " ".repeat(pad)));
    }
    out
}
