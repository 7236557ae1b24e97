// ── Generic table model ──
//
// Declarative column descriptors plus a small interpreter that projects
// any `T: Serialize` into display cells through its JSON form. The
// model owns the transient per-view state (sort, filter, visibility,
// pagination, selection) and stays UI-toolkit agnostic; renderers
// consume `header()` and `rows()`.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

/// How a cell value is turned into display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellRender {
    /// The raw value, stringified.
    Text,
    /// Stringified, then truncated to `max` characters with an ellipsis.
    Truncate(usize),
    /// Enum-style value mapped through a label table; unmapped values
    /// fall through unchanged.
    Badge(IndexMap<String, String>),
    /// Placeholder column for per-row edit/delete controls. Carries no
    /// data; the renderer draws its own widgets here.
    Actions,
}

/// One column of a resource table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Field name in the record's JSON projection.
    pub key: String,
    pub label: String,
    pub render: CellRender,
    pub sortable: bool,
    pub filterable: bool,
    pub hideable: bool,
}

impl ColumnDescriptor {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_owned(),
            label: label.to_owned(),
            render: CellRender::Text,
            sortable: false,
            filterable: false,
            hideable: true,
        }
    }

    #[must_use]
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    #[must_use]
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    #[must_use]
    pub fn fixed(mut self) -> Self {
        self.hideable = false;
        self
    }

    #[must_use]
    pub fn render(mut self, render: CellRender) -> Self {
        self.render = render;
        self
    }
}

/// The per-row actions column. A factory rather than a constant so
/// every resource gets its own instance with the shared shape.
pub fn actions_column() -> ColumnDescriptor {
    ColumnDescriptor {
        key: "__actions".to_owned(),
        label: "Acciones".to_owned(),
        render: CellRender::Actions,
        sortable: false,
        filterable: false,
        hideable: false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn indicator(self) -> &'static str {
        match self {
            Self::Ascending => "↑",
            Self::Descending => "↓",
        }
    }
}

/// One rendered row: the index into the source slice plus one display
/// string per visible column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Position in the slice passed to [`TableModel::rows`], so the
    /// renderer can map a row intent back to the record.
    pub index: usize,
    pub cells: Vec<String>,
}

/// Transient view state over one resource table.
///
/// Sort, filter, visibility, page, and selection live here and nowhere
/// else; the record collection itself stays owned by the controller.
#[derive(Debug)]
pub struct TableModel {
    columns: Vec<ColumnDescriptor>,
    /// Column key the text filter applies to.
    search_key: String,
    filter: String,
    sort: Option<(String, SortDirection)>,
    hidden: Vec<String>,
    page: usize,
    page_size: usize,
    selected: usize,
}

impl TableModel {
    pub fn new(columns: Vec<ColumnDescriptor>, search_key: &str) -> Self {
        Self {
            columns,
            search_key: search_key.to_owned(),
            filter: String::new(),
            sort: None,
            hidden: Vec::new(),
            page: 0,
            page_size: 10,
            selected: 0,
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    // ── Sorting ──────────────────────────────────────────────────

    /// Cycle the sort on a column: ascending → descending → none.
    /// Sorting a different column starts ascending and drops the old
    /// sort. Non-sortable columns are ignored.
    pub fn toggle_sort(&mut self, key: &str) {
        let sortable = self
            .columns
            .iter()
            .any(|c| c.key == key && c.sortable);
        if !sortable {
            return;
        }
        self.sort = match self.sort.take() {
            Some((k, SortDirection::Ascending)) if k == key => {
                Some((k, SortDirection::Descending))
            }
            Some((k, SortDirection::Descending)) if k == key => None,
            _ => Some((key.to_owned(), SortDirection::Ascending)),
        };
        trace!(key, sort = ?self.sort, "sort toggled");
        self.page = 0;
    }

    pub fn sort(&self) -> Option<(&str, SortDirection)> {
        self.sort.as_ref().map(|(k, d)| (k.as_str(), *d))
    }

    // ── Filtering ────────────────────────────────────────────────

    /// Replace the text filter (case-insensitive substring on the
    /// search column). Resets to the first page.
    pub fn set_filter(&mut self, text: &str) {
        self.filter = text.to_owned();
        self.page = 0;
        self.selected = 0;
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    // ── Visibility ───────────────────────────────────────────────

    /// Show or hide a column. Non-hideable columns stay visible.
    pub fn toggle_visibility(&mut self, key: &str) {
        let hideable = self
            .columns
            .iter()
            .any(|c| c.key == key && c.hideable);
        if !hideable {
            return;
        }
        if let Some(pos) = self.hidden.iter().position(|k| k == key) {
            self.hidden.remove(pos);
        } else {
            self.hidden.push(key.to_owned());
        }
    }

    pub fn is_visible(&self, key: &str) -> bool {
        !self.hidden.iter().any(|k| k == key)
    }

    pub fn visible_columns(&self) -> Vec<&ColumnDescriptor> {
        self.columns
            .iter()
            .filter(|c| self.is_visible(&c.key))
            .collect()
    }

    /// Header labels for the visible columns, with a sort indicator on
    /// the sorted one.
    pub fn header(&self) -> Vec<String> {
        self.visible_columns()
            .into_iter()
            .map(|c| match &self.sort {
                Some((key, dir)) if *key == c.key => {
                    format!("{} {}", c.label, dir.indicator())
                }
                _ => c.label.clone(),
            })
            .collect()
    }

    // ── Pagination / selection ───────────────────────────────────

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self, filtered_len: usize) -> usize {
        filtered_len.div_ceil(self.page_size).max(1)
    }

    pub fn next_page(&mut self, filtered_len: usize) {
        if self.page + 1 < self.page_count(filtered_len) {
            self.page += 1;
            self.selected = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
            self.selected = 0;
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self, page_len: usize) {
        if page_len > 0 && self.selected + 1 < page_len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Clamp selection after the row set shrank (delete, filter change).
    pub fn clamp_selection(&mut self, page_len: usize) {
        if page_len == 0 {
            self.selected = 0;
        } else if self.selected >= page_len {
            self.selected = page_len - 1;
        }
    }

    // ── Projection ───────────────────────────────────────────────

    /// The current page of `items` as display rows: filter on the
    /// search column, sort, then slice the active page. Row indices
    /// point back into `items`.
    pub fn rows<T: Serialize>(&self, items: &[T]) -> Vec<TableRow> {
        let projected: Vec<(usize, Value)> = items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| {
                serde_json::to_value(item).ok().map(|v| (i, v))
            })
            .collect();

        let needle = self.filter.to_lowercase();
        let mut filtered: Vec<&(usize, Value)> = projected
            .iter()
            .filter(|(_, value)| {
                needle.is_empty()
                    || cell_text(value, &self.search_key)
                        .to_lowercase()
                        .contains(&needle)
            })
            .collect();

        if let Some((key, direction)) = &self.sort {
            filtered.sort_by(|(_, a), (_, b)| {
                let ord = compare_values(field(a, key), field(b, key));
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        filtered
            .into_iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .map(|(index, value)| TableRow {
                index: *index,
                cells: self
                    .visible_columns()
                    .into_iter()
                    .map(|c| render_cell(value, c))
                    .collect(),
            })
            .collect()
    }

    /// How many items survive the current filter (drives page counts).
    pub fn filtered_len<T: Serialize>(&self, items: &[T]) -> usize {
        let needle = self.filter.to_lowercase();
        if needle.is_empty() {
            return items.len();
        }
        items
            .iter()
            .filter_map(|item| serde_json::to_value(item).ok())
            .filter(|value| {
                cell_text(value, &self.search_key)
                    .to_lowercase()
                    .contains(&needle)
            })
            .count()
    }
}

// ── Cell interpreter ─────────────────────────────────────────────────

fn field<'v>(value: &'v Value, key: &str) -> Option<&'v Value> {
    value.get(key)
}

fn cell_text(value: &Value, key: &str) -> String {
    match field(value, key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn render_cell(value: &Value, column: &ColumnDescriptor) -> String {
    let text = cell_text(value, &column.key);
    match &column.render {
        CellRender::Text => text,
        CellRender::Truncate(max) => truncate(&text, *max),
        CellRender::Badge(labels) => {
            labels.get(&text).cloned().unwrap_or(text)
        }
        CellRender::Actions => String::new(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

/// Order JSON scalars naturally: numbers numerically, everything else
/// by case-insensitive string form.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(std::cmp::Ordering::Equal),
        _ => {
            let x = a.map(|v| cell_text_value(v)).unwrap_or_default();
            let y = b.map(|v| cell_text_value(v)).unwrap_or_default();
            x.to_lowercase().cmp(&y.to_lowercase())
        }
    }
}

fn cell_text_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Row {
        id: i64,
        title: String,
        kind: String,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: 1,
                title: "A".into(),
                kind: "DIGITAL".into(),
            },
            Row {
                id: 2,
                title: "B".into(),
                kind: "NON_DIGITAL".into(),
            },
        ]
    }

    fn columns() -> Vec<ColumnDescriptor> {
        let mut badge = IndexMap::new();
        badge.insert("DIGITAL".to_owned(), "Digital".to_owned());
        badge.insert("NON_DIGITAL".to_owned(), "No Digital".to_owned());
        vec![
            ColumnDescriptor::new("id", "ID").sortable().fixed(),
            ColumnDescriptor::new("title", "Título").sortable().filterable(),
            ColumnDescriptor::new("kind", "Tipo").render(CellRender::Badge(badge)),
            actions_column(),
        ]
    }

    fn model() -> TableModel {
        TableModel::new(columns(), "title")
    }

    #[test]
    fn sort_title_descending_reverses_rows() {
        let mut m = model();
        m.toggle_sort("title");
        m.toggle_sort("title");

        let rendered = m.rows(&rows());
        assert_eq!(rendered[0].cells[1], "B");
        assert_eq!(rendered[1].cells[1], "A");
        // Indices still point at the original slice.
        assert_eq!(rendered[0].index, 1);
    }

    #[test]
    fn third_toggle_clears_sort() {
        let mut m = model();
        m.toggle_sort("title");
        m.toggle_sort("title");
        m.toggle_sort("title");
        assert!(m.sort().is_none());
    }

    #[test]
    fn toggle_ignores_unsortable_column() {
        let mut m = model();
        m.toggle_sort("kind");
        assert!(m.sort().is_none());
    }

    #[test]
    fn filter_on_title_is_case_insensitive() {
        let mut m = model();
        m.set_filter("a");

        let rendered = m.rows(&rows());
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].cells[0], "1");
        assert_eq!(m.filtered_len(&rows()), 1);
    }

    #[test]
    fn numeric_sort_is_numeric_not_lexicographic() {
        let mut m = model();
        let items = vec![
            Row {
                id: 10,
                title: "x".into(),
                kind: "DIGITAL".into(),
            },
            Row {
                id: 2,
                title: "y".into(),
                kind: "DIGITAL".into(),
            },
        ];
        m.toggle_sort("id");
        let rendered = m.rows(&items);
        assert_eq!(rendered[0].cells[0], "2");
        assert_eq!(rendered[1].cells[0], "10");
    }

    #[test]
    fn badge_maps_enum_values_to_labels() {
        let m = model();
        let rendered = m.rows(&rows());
        assert_eq!(rendered[0].cells[2], "Digital");
        assert_eq!(rendered[1].cells[2], "No Digital");
    }

    #[test]
    fn hidden_column_drops_out_of_header_and_rows() {
        let mut m = model();
        m.toggle_visibility("kind");

        assert_eq!(m.header(), vec!["ID", "Título", "Acciones"]);
        assert_eq!(m.rows(&rows())[0].cells.len(), 3);

        m.toggle_visibility("kind");
        assert_eq!(m.header().len(), 4);
    }

    #[test]
    fn fixed_column_cannot_be_hidden() {
        let mut m = model();
        m.toggle_visibility("id");
        assert!(m.is_visible("id"));
    }

    #[test]
    fn header_carries_sort_indicator() {
        let mut m = model();
        m.toggle_sort("title");
        assert_eq!(m.header()[1], "Título ↑");
        m.toggle_sort("title");
        assert_eq!(m.header()[1], "Título ↓");
    }

    #[test]
    fn pagination_slices_filtered_sorted_set() {
        let mut m = TableModel::new(columns(), "title").with_page_size(2);
        let items: Vec<Row> = (1..=5)
            .map(|i| Row {
                id: i,
                title: format!("t{i}"),
                kind: "DIGITAL".into(),
            })
            .collect();

        assert_eq!(m.page_count(m.filtered_len(&items)), 3);
        assert_eq!(m.rows(&items).len(), 2);

        m.next_page(5);
        m.next_page(5);
        assert_eq!(m.page(), 2);
        assert_eq!(m.rows(&items).len(), 1);

        // Already on the last page.
        m.next_page(5);
        assert_eq!(m.page(), 2);

        m.prev_page();
        assert_eq!(m.page(), 1);
    }

    #[test]
    fn filter_change_resets_page() {
        let mut m = TableModel::new(columns(), "title").with_page_size(1);
        m.next_page(2);
        assert_eq!(m.page(), 1);
        m.set_filter("A");
        assert_eq!(m.page(), 0);
    }

    #[test]
    fn selection_moves_and_clamps() {
        let mut m = model();
        m.select_next(2);
        assert_eq!(m.selected(), 1);
        m.select_next(2);
        assert_eq!(m.selected(), 1);
        m.clamp_selection(1);
        assert_eq!(m.selected(), 0);
        m.select_prev();
        assert_eq!(m.selected(), 0);
    }

    #[test]
    fn truncate_render_appends_ellipsis() {
        let column = ColumnDescriptor::new("title", "Título")
            .render(CellRender::Truncate(4));
        let value = serde_json::json!({"title": "long description"});
        assert_eq!(render_cell(&value, &column), "lon…");
        let short = serde_json::json!({"title": "ok"});
        assert_eq!(render_cell(&short, &column), "ok");
    }

    #[test]
    fn missing_and_null_fields_render_empty() {
        let value = serde_json::json!({"id": 1, "title": null});
        assert_eq!(cell_text(&value, "title"), "");
        assert_eq!(cell_text(&value, "nope"), "");
    }
}
