use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use scrubgrid_engine::Record;

const MAX_COL_WIDTH: usize = 28;

/// Display width of a string, accounting for CJK double-width, emoji, etc.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate to `width` display columns, ending in ".." when cut.
pub(crate) fn truncate_display(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    if width < 3 {
        return s
            .chars()
            .next()
            .filter(|ch| UnicodeWidthChar::width(*ch).unwrap_or(0) <= width)
            .map(String::from)
            .unwrap_or_default();
    }

    let budget = width - 2;
    let mut used = 0;
    let mut end_byte = 0;
    for (i, ch) in s.char_indices() {
        let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > budget {
            end_byte = i;
            break;
        }
        used += cw;
        end_byte = i + ch.len_utf8();
    }

    format!("{}..", &s[..end_byte])
}

/// Pad or truncate to exactly `width` display columns.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let sw = display_width(s);
    if sw > width {
        truncate_display(s, width)
    } else {
        format!("{}{}", s, " ".repeat(width - sw))
    }
}

/// Render rows as an aligned text grid with a leading id column.
pub(crate) fn render_records(columns: &[String], rows: &[Record]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| (0..columns.len()).map(|i| r.cell(i).to_string()).collect())
        .collect();

    let id_width = rows
        .iter()
        .map(|r| r.id.to_string().len())
        .chain(std::iter::once(2))
        .max()
        .unwrap_or(2);
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .map(|row| display_width(&row[i]))
                .chain(std::iter::once(display_width(name)))
                .max()
                .unwrap_or(0)
                .min(MAX_COL_WIDTH)
        })
        .collect();

    let mut out = String::new();
    let line = |id: &str, values: &[String]| -> String {
        let mut s = format!("{:>id_width$}", id);
        for (v, w) in values.iter().zip(&widths) {
            s.push_str("  ");
            s.push_str(&pad_right(v, *w));
        }
        s.trim_end().to_string()
    };

    out.push_str(&line("id", columns));
    out.push('\n');
    for (record, row) in rows.iter().zip(&cells) {
        out.push_str(&line(&record.id.to_string(), row));
        out.push('\n');
    }
    out
}
