//! Searchable table widget.
//!
//! Turns a collection of records into a column-aligned [`Frame`]: a styled
//! heading, proportionally sized columns, case-insensitive substring
//! search, and a selection cursor that stays visible as the result set
//! shrinks and grows.

use crossterm::style::Stylize;
use parking_lot::Mutex;

use lineweave::{Cursor, Frame};

/// Access to a record's printable fields by column name.
///
/// The table never inspects record types; each record type names its own
/// mapping from column name to display string. Unknown columns should
/// return an empty string.
pub trait Record {
    /// The display string for one column of this record.
    fn field(&self, column: &str) -> String;
}

struct TableState<R> {
    records: Vec<R>,
    columns: Vec<String>,
    /// Stringified fields, one row per record, computed once per `update`.
    values: Vec<Vec<String>>,
    widths: Vec<usize>,
    width: usize,
    height: usize,
    searching: bool,
    query: String,
    /// Original-order indices of the rows passing the active filter.
    results: Vec<usize>,
    cursor: Cursor,
}

/// Searchable, column-aligned view over a collection of records.
///
/// The table guards its state with its own lock, distinct from the
/// application monitor, so a background refresh (`update`, `search`) may
/// run concurrently with a `draw` from the render thread; every method
/// takes `&self`.
///
/// # Example
///
/// ```rust,ignore
/// use lineweave_widgets::{Record, Table};
///
/// struct Service { name: String, port: u16 }
///
/// impl Record for Service {
///     fn field(&self, column: &str) -> String {
///         match column {
///             "Name" => self.name.clone(),
///             "Port" => self.port.to_string(),
///             _ => String::new(),
///         }
///     }
/// }
///
/// let table = Table::new(80, 24);
/// table.update(services, vec!["Name".into(), "Port".into()]);
/// table.search("http");
/// let frame = table.draw();
/// ```
pub struct Table<R> {
    state: Mutex<TableState<R>>,
}

impl<R: Record> Table<R> {
    /// An empty table drawn at `width` × `height` (the height includes the
    /// heading line).
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            state: Mutex::new(TableState {
                records: Vec::new(),
                columns: Vec::new(),
                values: Vec::new(),
                widths: Vec::new(),
                width,
                height,
                searching: false,
                query: String::new(),
                results: Vec::new(),
                cursor: Cursor::new(0, 1),
            }),
        }
    }

    /// Change the size the table draws at.
    ///
    /// Column widths are recomputed on the next `update`, not here.
    pub fn set_size(&self, width: usize, height: usize) {
        let mut state = self.state.lock();
        state.width = width;
        state.height = height;
    }

    /// Replace the table's contents.
    ///
    /// Stringifies every column of every record once, recomputes the
    /// column widths, resets the filter results to all rows in original
    /// order, and re-bounds the selection cursor. An active search keeps
    /// its query but must be re-issued to filter the new data.
    pub fn update(&self, records: Vec<R>, columns: Vec<String>) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.values = records
            .iter()
            .map(|record| columns.iter().map(|c| record.field(c)).collect())
            .collect();
        state.records = records;
        state.columns = columns;
        state.widths = compute_widths(&state.values, state.columns.len(), state.width);
        state.results = (0..state.values.len()).collect();
        state.cursor.set_size(state.results.len(), 1);
    }

    /// Filter the rows to those with any column containing `query`,
    /// case-insensitively. An empty query matches every row.
    pub fn search(&self, query: &str) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.searching = true;
        state.query = query.to_string();
        let needle = query.to_lowercase();
        state.results = state
            .values
            .iter()
            .enumerate()
            .filter(|(_, row)| row.iter().any(|cell| cell.to_lowercase().contains(&needle)))
            .map(|(index, _)| index)
            .collect();
        state.cursor.set_size(state.results.len(), 1);
    }

    /// Deactivate the search, keeping the last query string around.
    pub fn clear_search(&self) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.searching = false;
        state.results = (0..state.values.len()).collect();
        state.cursor.set_size(state.results.len(), 1);
    }

    /// Whether a search is active.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.state.lock().searching
    }

    /// The last search query, active or not.
    #[must_use]
    pub fn query(&self) -> String {
        self.state.lock().query.clone()
    }

    /// Number of rows passing the active filter.
    #[must_use]
    pub fn result_count(&self) -> usize {
        self.state.lock().results.len()
    }

    /// The selected position within the filtered results.
    #[must_use]
    pub fn selection(&self) -> usize {
        self.state.lock().cursor.position().0
    }

    /// Move the selection up one row. Returns true iff it moved.
    pub fn select_up(&self) -> bool {
        self.state.lock().cursor.up()
    }

    /// Move the selection down one row. Returns true iff it moved.
    pub fn select_down(&self) -> bool {
        self.state.lock().cursor.down()
    }

    /// Jump the selection to the first row.
    pub fn select_top(&self) {
        self.state.lock().cursor.top();
    }

    /// Jump the selection to the last row.
    pub fn select_bottom(&self) {
        self.state.lock().cursor.bottom();
    }

    /// The original-collection index of the selected record, or `None`
    /// when no rows pass the filter.
    #[must_use]
    pub fn selected_record(&self) -> Option<usize> {
        let state = self.state.lock();
        let (selected, _) = state.cursor.position();
        state.results.get(selected).copied()
    }

    /// Render the table into a frame of the configured height: a styled
    /// heading, then the window of filtered rows containing the selection,
    /// the selected row highlighted. When a search is active the last line
    /// is the search status instead of a data row.
    #[must_use]
    pub fn draw(&self) -> Frame {
        let state = self.state.lock();
        if state.height == 0 {
            return Frame::new();
        }

        let mut frame = Frame::blank(state.height);
        frame.set_line(0, heading(&state.columns, &state.widths));

        let visible = (state.height - 1).saturating_sub(usize::from(state.searching));
        let shown = visible.min(state.results.len());
        let (selected, _) = state.cursor.position();
        // Keep the selection inside [offset, offset + visible).
        let offset = if visible > 0 && selected >= visible {
            selected - visible + 1
        } else {
            0
        };

        for slot in 0..shown {
            let index = state.results[offset + slot];
            let line = render_row(&state.values[index], &state.widths);
            if offset + slot == selected {
                frame.set_line(1 + slot, line.black().on_yellow().to_string());
            } else {
                frame.set_line(1 + slot, line);
            }
        }

        if state.searching && state.height >= 2 {
            frame.set_line(state.height - 1, format!(" Searching for \"{}\"", state.query));
        }

        frame
    }
}

/// Per-column display widths: average stringified length per column,
/// scaled to the configured total, remainder handed out round-robin until
/// the row spans the table. Empty data or all-empty cells yield no widths
/// at all rather than dividing by zero.
fn compute_widths(values: &[Vec<String>], columns: usize, total: usize) -> Vec<usize> {
    if columns == 0 || values.is_empty() {
        return Vec::new();
    }

    let mut averages = vec![0usize; columns];
    for row in values {
        for (column, cell) in row.iter().enumerate() {
            averages[column] += cell.chars().count();
        }
    }
    for average in &mut averages {
        *average /= values.len();
    }

    let sum: usize = averages.iter().sum();
    if sum == 0 {
        return Vec::new();
    }

    let mut widths: Vec<usize> = averages.iter().map(|&avg| avg * total / sum).collect();
    let mut column = 0;
    while widths.iter().sum::<usize>() < total + 1 {
        widths[column] += 1;
        column = (column + 1) % columns;
    }
    widths
}

fn heading(columns: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (column, name) in columns.iter().enumerate() {
        // With no widths computed, size heading cells to their names so
        // the column names still show over an empty body.
        let width = widths
            .get(column)
            .copied()
            .unwrap_or_else(|| name.chars().count() + 2);
        line.push_str(&pad_cell(name, width));
    }
    line.black().on_white().to_string()
}

fn render_row(row: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (column, cell) in row.iter().enumerate() {
        line.push_str(&pad_cell(cell, widths.get(column).copied().unwrap_or(0)));
    }
    line
}

/// Pad `value` into a `width`-char cell with single-space gutters,
/// truncating by char count.
fn pad_cell(value: &str, width: usize) -> String {
    if width < 2 {
        return " ".repeat(width);
    }
    let inner = width - 2;
    let truncated: String = value.chars().take(inner).collect();
    format!(" {truncated:<inner$} ")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Proc {
        pid: u32,
        name: &'static str,
        state: &'static str,
    }

    impl Record for Proc {
        fn field(&self, column: &str) -> String {
            match column {
                "Pid" => self.pid.to_string(),
                "Name" => self.name.to_string(),
                "State" => self.state.to_string(),
                _ => String::new(),
            }
        }
    }

    fn columns() -> Vec<String> {
        vec!["Pid".into(), "Name".into(), "State".into()]
    }

    fn procs() -> Vec<Proc> {
        vec![
            Proc { pid: 1, name: "init", state: "sleeping" },
            Proc { pid: 42, name: "nginx", state: "running" },
            Proc { pid: 43, name: "nginx-worker", state: "running" },
            Proc { pid: 99, name: "postgres", state: "idle" },
        ]
    }

    fn table() -> Table<Proc> {
        let table = Table::new(40, 10);
        table.update(procs(), columns());
        table
    }

    #[test]
    fn test_update_collects_values_and_results() {
        let table = table();
        assert_eq!(table.result_count(), 4);
        assert_eq!(table.selected_record(), Some(0));
    }

    #[test]
    fn test_search_filters_case_insensitively() {
        let table = table();
        table.search("NGINX");

        assert_eq!(table.result_count(), 2);
        assert_eq!(table.selected_record(), Some(1));
        assert!(table.is_searching());
    }

    #[test]
    fn test_search_matches_any_column() {
        let table = table();
        table.search("running");
        assert_eq!(table.result_count(), 2);

        table.search("99");
        assert_eq!(table.result_count(), 1);
        assert_eq!(table.selected_record(), Some(3));
    }

    #[test]
    fn test_search_preserves_original_order() {
        let table = table();
        table.search("n");

        // Every matching index, in original order, no duplicates.
        let mut seen = Vec::new();
        while let Some(index) = table.selected_record() {
            seen.push(index);
            if !table.select_down() {
                break;
            }
        }
        let mut sorted = seen.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(seen, sorted);
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let table = table();
        table.search("");
        assert_eq!(table.result_count(), 4);
    }

    #[test]
    fn test_no_match_leaves_no_selection() {
        let table = table();
        table.search("zzz");

        assert_eq!(table.result_count(), 0);
        assert_eq!(table.selected_record(), None);
    }

    #[test]
    fn test_clear_search_keeps_query_and_restores_rows() {
        let table = table();
        table.search("nginx");
        table.clear_search();

        assert!(!table.is_searching());
        assert_eq!(table.query(), "nginx");
        assert_eq!(table.result_count(), 4);
    }

    #[test]
    fn test_selection_rebounds_as_results_shrink() {
        let table = table();
        table.select_bottom();
        assert_eq!(table.selected_record(), Some(3));

        table.search("nginx");
        // Two results; the selection was clamped into them.
        assert!(table.selection() < 2);
        assert!(table.selected_record().is_some());
    }

    #[test]
    fn test_widths_cover_the_table() {
        let table = table();
        let frame = table.draw();
        let heading = frame.line(0).unwrap();
        // The heading spans at least the configured width (styling codes
        // add more bytes; count chars of the padded cells instead).
        let state = table.state.lock();
        let total: usize = state.widths.iter().sum();
        assert!(total >= 41, "widths {:?} sum to {}", state.widths, total);
        assert!(heading.contains("Pid"));
    }

    #[test]
    fn test_no_records_computes_no_widths() {
        let table: Table<Proc> = Table::new(40, 5);
        table.update(Vec::new(), columns());

        let frame = table.draw();
        assert_eq!(frame.len(), 5);
        // Heading still shows the column names; the body is blank.
        assert!(frame.line(0).unwrap().contains("Name"));
        assert_eq!(frame.line(1), Some(""));
        assert_eq!(table.selected_record(), None);
    }

    #[test]
    fn test_all_empty_cells_compute_no_widths() {
        struct Blank;
        impl Record for Blank {
            fn field(&self, _column: &str) -> String {
                String::new()
            }
        }

        let table: Table<Blank> = Table::new(20, 4);
        table.update(vec![Blank, Blank], vec!["A".into()]);

        let state = table.state.lock();
        assert!(state.widths.is_empty());
    }

    #[test]
    fn test_draw_heading_and_rows() {
        let table = table();
        let frame = table.draw();

        assert_eq!(frame.len(), 10);
        assert!(frame.line(0).unwrap().contains("State"));
        assert!(frame.line(1).unwrap().contains("init"));
        assert!(frame.line(2).unwrap().contains("nginx"));
    }

    #[test]
    fn test_draw_highlights_the_selected_row() {
        let table = table();
        table.select_down();
        let frame = table.draw();

        let plain = {
            let state = table.state.lock();
            render_row(&state.values[1], &state.widths)
        };
        let drawn = frame.line(2).unwrap();
        assert!(drawn.contains("nginx"));
        assert_ne!(drawn, plain, "selected row should carry styling");
        assert!(frame.line(1).unwrap().contains("init"));
    }

    #[test]
    fn test_draw_search_status_line() {
        let table = table();
        table.search("post");
        let frame = table.draw();

        assert_eq!(frame.line(9), Some(" Searching for \"post\""));
    }

    #[test]
    fn test_draw_keeps_selection_visible() {
        // Height 4 = heading + 3 body rows over 4 records.
        let table = Table::new(40, 4);
        table.update(procs(), columns());
        table.select_bottom();

        let frame = table.draw();
        // Selection is row 3; the window slid down to rows 1..4.
        assert!(frame.line(3).unwrap().contains("postgres"));
        assert!(frame.line(1).unwrap().contains("nginx"));
        let first = frame.line(1).unwrap();
        assert!(!first.contains("init"), "row 0 scrolled out: {first}");
    }

    #[test]
    fn test_draw_zero_height() {
        let table = Table::new(40, 0);
        table.update(procs(), columns());
        assert!(table.draw().is_empty());
    }

    #[test]
    fn test_searching_with_tiny_height_draws_no_rows() {
        let table = Table::new(40, 1);
        table.update(procs(), columns());
        table.search("x");

        let frame = table.draw();
        assert_eq!(frame.len(), 1);
    }

    #[test]
    fn test_table_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Table<Proc>>();
    }

    #[test]
    fn test_pad_cell() {
        assert_eq!(pad_cell("ab", 6), " ab   ");
        assert_eq!(pad_cell("abcdef", 6), " abcd ");
        assert_eq!(pad_cell("x", 1), " ");
        assert_eq!(pad_cell("x", 0), "");
    }

    #[test]
    fn test_compute_widths_round_robin() {
        let values = vec![
            vec!["aa".to_string(), "bbbb".to_string()],
            vec!["aa".to_string(), "bbbb".to_string()],
        ];
        let widths = compute_widths(&values, 2, 12);

        assert_eq!(widths.len(), 2);
        assert!(widths.iter().sum::<usize>() >= 13);
        assert!(widths[1] > widths[0], "wider column gets more space");
    }
}
