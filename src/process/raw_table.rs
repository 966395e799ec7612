/// A scraped HTML table, cell text already cleaned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Header rows, outermost first. Spanning cells are repeated across
    /// every column (and level) they cover.
    pub header_levels: Vec<Vec<String>>,
    /// Each data row, one String per column.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// The innermost header level, or an empty slice for headerless tables.
    pub fn headers(&self) -> &[String] {
        self.header_levels
            .last()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Index of the first innermost header satisfying `pred`.
    pub fn find_column(&self, pred: impl Fn(&str) -> bool) -> Option<usize> {
        self.headers().iter().position(|h| pred(h))
    }

    /// Cell at (`row`, `col`); short rows yield `None`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}
