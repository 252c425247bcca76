//! Raw table representation shared by all workbook sources.

/// A logical table as read from the source: trimmed headers plus string
/// cells. Rows are normalized to the header width before use.
#[derive(Debug, Clone, Default)]
pub struct TableData {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableData {
    /// Builds a table, trimming headers and padding or truncating each row
    /// to the header count.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when the table holds no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates data rows as header-addressable records.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |cells| Record {
            headers: &self.headers,
            cells,
        })
    }
}

/// One data row, addressable by header text.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    headers: &'a [String],
    cells: &'a [String],
}

impl<'a> Record<'a> {
    /// Returns the trimmed cell under `header`, or None when the column is
    /// absent or the cell is blank.
    pub fn get(&self, header: &str) -> Option<&'a str> {
        let idx = self.headers.iter().position(|h| h == header)?;
        let cell = self.cells.get(idx)?.trim();
        (!cell.is_empty()).then_some(cell)
    }

    /// First non-blank cell among the given header spellings.
    pub fn get_any(&self, headers: &[&str]) -> Option<&'a str> {
        headers.iter().find_map(|h| self.get(h))
    }
}
