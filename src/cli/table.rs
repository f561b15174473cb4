/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: &'static str,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

impl TableColumn {
    pub const fn left(header: &'static str) -> Self {
        Self {
            header,
            max_width: None,
            alignment: Alignment::Left,
        }
    }

    pub const fn right(header: &'static str) -> Self {
        Self {
            header,
            max_width: None,
            alignment: Alignment::Right,
        }
    }

    pub const fn truncated(mut self, max_width: usize) -> Self {
        self.max_width = Some(max_width);
        self
    }
}

/// Plain-text table with a header row and a rule under it.
pub struct Table {
    columns: Vec<TableColumn>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = visible_width(column.header);
                for row in &self.rows {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(visible_width(cell));
                    }
                }
                match column.max_width {
                    Some(max) => width.min(max),
                    None => width,
                }
            })
            .collect()
    }

    fn render_row(&self, cells: &[&str], widths: &[usize]) -> String {
        self.columns
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, (column, width))| {
                render_cell(cells.get(idx).copied().unwrap_or(""), *width, column.alignment)
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let headers: Vec<&str> = self.columns.iter().map(|column| column.header).collect();
        let mut lines = vec![
            self.render_row(&headers, &widths),
            widths
                .iter()
                .map(|width| "-".repeat(*width))
                .collect::<Vec<_>>()
                .join("  "),
        ];
        for row in &self.rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            lines.push(self.render_row(&cells, &widths));
        }
        lines.join("\n")
    }
}

/// Display width in chars, skipping ANSI color sequences.
fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            for code in chars.by_ref() {
                if code.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

fn truncate_text(text: &str, width: usize) -> String {
    if visible_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut fitted: String = text.chars().take(width - 1).collect();
    fitted.push('…');
    fitted
}

fn render_cell(text: &str, width: usize, alignment: Alignment) -> String {
    let fitted = truncate_text(text, width);
    let padding = width.saturating_sub(visible_width(&fitted));
    match alignment {
        Alignment::Left => format!("{fitted}{}", " ".repeat(padding)),
        Alignment::Right => format!("{}{fitted}", " ".repeat(padding)),
    }
}
