//! Two-column console tables

use std::io::{self, Write};

use console::measure_text_width;

/// Bordered key/value table, rendered as
///
/// ```text
/// +----------+-------+
/// | Property | Value |
/// +----------+-------+
/// | version  | 1.2.0 |
/// +----------+-------+
/// ```
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: (String, String),
    rows: Vec<(String, String)>,
}

impl Table {
    /// Empty table with the given column headers
    #[must_use]
    pub fn new(left: &str, right: &str) -> Self {
        Self {
            headers: (left.to_string(), right.to_string()),
            rows: Vec::new(),
        }
    }

    /// Append a row
    #[must_use]
    pub fn row(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.rows.push((left.into(), right.into()));
        self
    }

    /// Append rows
    #[must_use]
    pub fn rows<I, K, V>(self, rows: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        rows.into_iter().fold(self, |table, (k, v)| table.row(k, v))
    }

    /// Write the table to `out`
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        let widths = std::iter::once(&self.headers)
            .chain(&self.rows)
            .fold((0, 0), |(l, r), (left, right)| {
                (l.max(width(left)), r.max(width(right)))
            });

        let border = format!("+{}+{}+", "-".repeat(widths.0 + 2), "-".repeat(widths.1 + 2));
        writeln!(out, "{border}")?;
        write_row(out, &self.headers, widths)?;
        writeln!(out, "{border}")?;
        for row in &self.rows {
            write_row(out, row, widths)?;
        }
        writeln!(out, "{border}")
    }
}

// Multi-line cells are flattened so the borders line up
fn width(cell: &str) -> usize {
    measure_text_width(&flatten(cell))
}

fn flatten(cell: &str) -> String {
    cell.replace("\r\n", " ").replace('\n', " ")
}

fn pad(cell: &str, target: usize) -> String {
    let cell = flatten(cell);
    let fill = target.saturating_sub(measure_text_width(&cell));
    format!("{cell}{}", " ".repeat(fill))
}

fn write_row(out: &mut impl Write, (left, right): &(String, String), widths: (usize, usize)) -> io::Result<()> {
    writeln!(out, "| {} | {} |", pad(left, widths.0), pad(right, widths.1))
}
