/// Render a simple aligned table for string rows.
///
/// Cells wider than `max_cell` characters are truncated with an ellipsis.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>], max_cell: Option<usize>) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let widest = rows
                .iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.chars().count());
            max_cell.map_or(widest, |max| widest.min(max.max(header.chars().count())))
        })
        .collect();

    let header_line = headers
        .iter()
        .zip(widths.iter())
        .map(|(header, width)| format_cell(header, *width))
        .collect::<Vec<_>>()
        .join("  ");

    let divider = "-".repeat(header_line.chars().count());

    let row_lines = rows.iter().map(|row| {
        widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let value = row.get(index).map_or("-", String::as_str);
                format_cell(&truncate_text(value, *width), *width)
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    });

    let mut lines = vec![header_line.trim_end().to_string(), divider];
    lines.extend(row_lines);
    lines.join("\n")
}

fn truncate_text(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }

    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn format_cell(value: &str, width: usize) -> String {
    let pad = width.saturating_sub(value.chars().count());
    format!("{value}{}", " ".repeat(pad))
}
