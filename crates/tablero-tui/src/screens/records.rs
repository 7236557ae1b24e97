//! Records screen — the generic resource table plus its create/edit
//! overlay.
//!
//! The screen renders whatever the controller publishes: the record
//! collection, loading/submitting flags, and modal visibility all come
//! in through [`Action::StateChanged`]. Sort, filter, column
//! visibility, pagination, and row selection are local concerns held
//! in a [`TableModel`].

use color_eyre::eyre::Result;
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use tablero_core::{Activity, CellRender, Record, ResourceBinding, TableModel, ViewState};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::form::{ActivityForm, FormEvent};

pub struct RecordsScreen {
    binding: ResourceBinding,
    model: TableModel,
    view: ViewState<Activity>,
    throbber: ThrobberState,
    /// Present exactly while the controller reports an open modal.
    form: Option<ActivityForm>,
    search_active: bool,
    search_input: Input,
    columns_open: bool,
    columns_cursor: usize,
}

impl RecordsScreen {
    pub fn new(binding: ResourceBinding, page_size: usize) -> Self {
        let model =
            TableModel::new(binding.columns.clone(), &binding.search_column).with_page_size(page_size);
        Self {
            binding,
            model,
            view: ViewState::default(),
            throbber: ThrobberState::default(),
            form: None,
            search_active: false,
            search_input: Input::default(),
            columns_open: false,
            columns_cursor: 0,
        }
    }

    fn page_rows(&self) -> Vec<tablero_core::TableRow> {
        self.model.rows(&self.view.items)
    }

    fn selected_activity(&self) -> Option<Activity> {
        let rows = self.page_rows();
        rows.get(self.model.selected())
            .and_then(|row| self.view.items.get(row.index))
            .cloned()
    }

    /// Keys of the columns the user may show or hide.
    fn hideable_keys(&self) -> Vec<String> {
        self.binding
            .columns
            .iter()
            .filter(|c| c.hideable)
            .map(|c| c.key.clone())
            .collect()
    }

    /// Keep the local form in step with the controller's modal state.
    /// A modal that closed (submit, Esc, back navigation) drops the
    /// form; a modal that opened gets a fresh one.
    fn sync_form(&mut self, state: &ViewState<Activity>) {
        if state.is_create_open {
            if self.form.as_ref().is_none_or(ActivityForm::is_edit) {
                self.form = Some(ActivityForm::create());
            }
        } else if state.is_edit_open {
            if let Some(item) = &state.editing_item {
                let id = item.id();
                let stale = self
                    .form
                    .as_ref()
                    .is_none_or(|f| f.editing_id() != Some(&id));
                if stale {
                    self.form = Some(ActivityForm::edit(item));
                }
            }
        } else {
            self.form = None;
        }
    }

    // ── Key handling per mode ───────────────────────────────────

    fn handle_columns_key(&mut self, key: KeyEvent) {
        let keys = self.hideable_keys();
        match key.code {
            KeyCode::Esc | KeyCode::Char('v') => self.columns_open = false,
            KeyCode::Char('j') | KeyCode::Down => {
                if self.columns_cursor + 1 < keys.len() {
                    self.columns_cursor += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.columns_cursor = self.columns_cursor.saturating_sub(1);
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(column_key) = keys.get(self.columns_cursor) {
                    self.model.toggle_visibility(column_key);
                }
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            // Esc discards the filter, Enter keeps it.
            KeyCode::Esc => {
                self.search_active = false;
                self.search_input.reset();
                self.model.set_filter("");
            }
            KeyCode::Enter => self.search_active = false,
            _ => {
                self.search_input.handle_event(&CrosstermEvent::Key(key));
                self.model.set_filter(self.search_input.value());
            }
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        // No edits or cancels mid-submit.
        if self.view.is_submitting {
            return None;
        }
        let form = self.form.as_mut()?;
        match form.handle_key(key)? {
            FormEvent::Cancel => Some(Action::CloseModal),
            FormEvent::Submit(payload) => {
                if form.is_edit() {
                    Some(Action::SubmitEdit(payload))
                } else {
                    Some(Action::SubmitCreate(payload))
                }
            }
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) -> Option<Action> {
        let page_len = self.page_rows().len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.model.select_next(page_len),
            KeyCode::Char('k') | KeyCode::Up => self.model.select_prev(),
            KeyCode::Char('g') => {
                self.model.clamp_selection(page_len);
                while self.model.selected() > 0 {
                    self.model.select_prev();
                }
            }
            KeyCode::Char('G') => {
                while self.model.selected() + 1 < page_len {
                    self.model.select_next(page_len);
                }
            }
            KeyCode::Char('h') | KeyCode::Left => self.model.prev_page(),
            KeyCode::Char('l') | KeyCode::Right => {
                let filtered = self.model.filtered_len(&self.view.items);
                self.model.next_page(filtered);
            }
            KeyCode::Char('/') => self.search_active = true,
            KeyCode::Char('v') => {
                self.columns_open = true;
                self.columns_cursor = 0;
            }
            KeyCode::Char('r') => return Some(Action::Refresh),
            KeyCode::Char('n') => return Some(Action::OpenCreate),
            KeyCode::Char('e') => {
                return self.selected_activity().map(Action::OpenEdit);
            }
            KeyCode::Char('d') => {
                return self.selected_activity().map(|a| Action::RequestDelete {
                    id: a.id(),
                    title: a.title,
                });
            }
            KeyCode::Char(digit @ '1'..='9') => {
                let idx = (digit as usize) - ('1' as usize);
                let column_key = self
                    .model
                    .visible_columns()
                    .get(idx)
                    .map(|c| c.key.clone());
                if let Some(column_key) = column_key {
                    self.model.toggle_sort(&column_key);
                }
            }
            _ => {}
        }
        None
    }

    // ── Rendering ───────────────────────────────────────────────

    fn render_search_bar(&self, frame: &mut Frame, area: Rect) {
        let cursor = if self.search_active { "▎" } else { "" };
        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", self.binding.search_placeholder),
                theme::key_hint_key(),
            ),
            Span::styled(self.search_input.value().to_owned(), theme::field_value()),
            Span::styled(cursor, theme::field_focused()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let rows = self.page_rows();

        if self.view.is_loading && self.view.items.is_empty() {
            let throbber = Throbber::default()
                .label("Cargando...")
                .style(theme::placeholder());
            let mut state = self.throbber.clone();
            frame.render_stateful_widget(throbber, area, &mut state);
            return;
        }

        if rows.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "No hay registros",
                    theme::placeholder(),
                ))),
                area,
            );
            return;
        }

        let visible = self.model.visible_columns();
        let actions_idx = visible
            .iter()
            .position(|c| matches!(c.render, CellRender::Actions));

        let header = Row::new(
            self.model
                .header()
                .into_iter()
                .map(|label| Cell::from(label).style(theme::table_header())),
        );

        let selected = self.model.selected();
        let body: Vec<Row> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let style = if i == selected {
                    theme::table_selected()
                } else {
                    theme::table_row()
                };
                let cells = row.cells.iter().enumerate().map(|(col, text)| {
                    if actions_idx == Some(col) {
                        Cell::from("✎ ✖").style(theme::key_hint())
                    } else {
                        Cell::from(text.clone())
                    }
                });
                Row::new(cells).style(style)
            })
            .collect();

        let widths: Vec<Constraint> = visible
            .iter()
            .map(|c| match c.render {
                CellRender::Truncate(max) => {
                    Constraint::Length(u16::try_from(max).unwrap_or(40).saturating_add(2))
                }
                CellRender::Actions => Constraint::Length(10),
                _ => Constraint::Min(u16::try_from(c.label.len()).unwrap_or(8).saturating_add(4)),
            })
            .collect();

        frame.render_widget(Table::new(body, widths).header(header), area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let filtered = self.model.filtered_len(&self.view.items);
        let pages = self.model.page_count(filtered);
        let hints = Line::from(vec![
            Span::styled(
                format!(" Página {}/{pages}  ", self.model.page() + 1),
                theme::key_hint(),
            ),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("nuevo  ", theme::key_hint()),
            Span::styled("e ", theme::key_hint_key()),
            Span::styled("editar  ", theme::key_hint()),
            Span::styled("d ", theme::key_hint_key()),
            Span::styled("eliminar  ", theme::key_hint()),
            Span::styled("/ ", theme::key_hint_key()),
            Span::styled("buscar  ", theme::key_hint()),
            Span::styled("v ", theme::key_hint_key()),
            Span::styled("columnas  ", theme::key_hint()),
            Span::styled("1-9 ", theme::key_hint_key()),
            Span::styled("ordenar  ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("recargar", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), area);
    }

    fn render_columns_overlay(&self, frame: &mut Frame, area: Rect) {
        let keys = self.hideable_keys();
        let overlay_w = 30u16.min(area.width.saturating_sub(4));
        let overlay_h = u16::try_from(keys.len())
            .unwrap_or(4)
            .saturating_add(4)
            .min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
        let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
        let overlay = Rect::new(x, y, overlay_w, overlay_h);

        frame.render_widget(Clear, overlay);
        let block = Block::default()
            .title(" Columnas ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let mut lines = Vec::with_capacity(keys.len() + 1);
        for (i, key) in keys.iter().enumerate() {
            let label = self
                .binding
                .columns
                .iter()
                .find(|c| &c.key == key)
                .map_or(key.as_str(), |c| c.label.as_str());
            let mark = if self.model.is_visible(key) { "[x]" } else { "[ ]" };
            let style = if i == self.columns_cursor {
                theme::field_focused()
            } else {
                theme::field_value()
            };
            lines.push(Line::from(Span::styled(
                format!(" {mark} {label}"),
                style,
            )));
        }
        lines.push(Line::from(vec![
            Span::styled(" Espacio", theme::key_hint_key()),
            Span::styled(" alternar  ", theme::key_hint()),
            Span::styled("Esc", theme::key_hint_key()),
            Span::styled(" cerrar", theme::key_hint()),
        ]));
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for RecordsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.columns_open {
            self.handle_columns_key(key);
            return Ok(None);
        }
        if self.form.is_some() {
            return Ok(self.handle_form_key(key));
        }
        if self.search_active {
            self.handle_search_key(key);
            return Ok(None);
        }
        Ok(self.handle_table_key(key))
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => self.throbber.calc_next(),
            Action::StateChanged(state) => {
                self.sync_form(state);
                self.view = state.clone();
                let page_len = self.page_rows().len();
                self.model.clamp_selection(page_len);
            }
            _ => {}
        }
        Ok(None)
    }

    fn wants_text_input(&self) -> bool {
        self.form.is_some() || self.search_active || self.columns_open
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let total = self.view.items.len();
        let block = Block::default()
            .title(format!(" {} ({total}) ", self.binding.title))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let show_search = self.search_active || !self.model.filter().is_empty();
        let layout = if show_search {
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(inner)
        } else {
            Layout::vertical([
                Constraint::Length(0),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(inner)
        };

        if show_search {
            self.render_search_bar(frame, layout[0]);
        }
        self.render_table(frame, layout[1]);
        self.render_footer(frame, layout[2]);

        if self.columns_open {
            self.render_columns_overlay(frame, area);
        }
        if let Some(ref form) = self.form {
            form.render(frame, area, self.view.is_submitting);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use tablero_core::{ActivityType, RecordId, activities_binding};

    use super::*;

    fn sample_state() -> ViewState<Activity> {
        ViewState {
            items: vec![
                Activity {
                    id: 1,
                    title: "Taller de robótica".into(),
                    description: "Robots".into(),
                    activity_type: ActivityType::NonDigital,
                    image_url: None,
                    resource_url: None,
                },
                Activity {
                    id: 2,
                    title: "Curso de Scratch".into(),
                    description: "Programación".into(),
                    activity_type: ActivityType::Digital,
                    image_url: None,
                    resource_url: None,
                },
            ],
            is_loading: false,
            is_submitting: false,
            is_create_open: false,
            is_edit_open: false,
            editing_item: None,
        }
    }

    fn screen_with_items() -> RecordsScreen {
        let mut screen = RecordsScreen::new(activities_binding(), 10);
        screen
            .update(&Action::StateChanged(sample_state()))
            .unwrap();
        screen
    }

    fn press(screen: &mut RecordsScreen, code: KeyCode) -> Option<Action> {
        screen.handle_key_event(KeyEvent::from(code)).unwrap()
    }

    #[test]
    fn edit_key_targets_selected_row() {
        let mut screen = screen_with_items();
        press(&mut screen, KeyCode::Char('j'));
        let action = press(&mut screen, KeyCode::Char('e')).unwrap();
        let Action::OpenEdit(activity) = action else {
            panic!("expected OpenEdit");
        };
        assert_eq!(activity.id, 2);
    }

    #[test]
    fn delete_key_requests_confirmation() {
        let mut screen = screen_with_items();
        let action = press(&mut screen, KeyCode::Char('d')).unwrap();
        let Action::RequestDelete { id, title } = action else {
            panic!("expected RequestDelete");
        };
        assert_eq!(id, RecordId::Int(1));
        assert_eq!(title, "Taller de robótica");
    }

    #[test]
    fn search_filters_rows() {
        let mut screen = screen_with_items();
        press(&mut screen, KeyCode::Char('/'));
        assert!(screen.wants_text_input());
        for ch in "scratch".chars() {
            press(&mut screen, KeyCode::Char(ch));
        }
        let rows = screen.page_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(screen.view.items[rows[0].index].id, 2);
    }

    #[test]
    fn escape_discards_filter() {
        let mut screen = screen_with_items();
        press(&mut screen, KeyCode::Char('/'));
        press(&mut screen, KeyCode::Char('x'));
        assert_eq!(screen.page_rows().len(), 0);
        press(&mut screen, KeyCode::Esc);
        assert_eq!(screen.page_rows().len(), 2);
        assert!(!screen.wants_text_input());
    }

    #[test]
    fn digit_toggles_sort_on_visible_column() {
        let mut screen = screen_with_items();
        // Column 2 is "title"
        press(&mut screen, KeyCode::Char('2'));
        assert_eq!(screen.model.sort().map(|(k, _)| k.to_owned()), Some("title".into()));
        let rows = screen.page_rows();
        assert_eq!(screen.view.items[rows[0].index].id, 2, "Curso sorts first");
    }

    #[test]
    fn create_modal_state_opens_form() {
        let mut screen = screen_with_items();
        let mut state = sample_state();
        state.is_create_open = true;
        screen.update(&Action::StateChanged(state)).unwrap();
        assert!(screen.wants_text_input());
        assert!(screen.form.is_some());

        // Esc inside the form asks the controller to close the modal
        let action = press(&mut screen, KeyCode::Esc).unwrap();
        assert!(matches!(action, Action::CloseModal));
    }

    #[test]
    fn closed_modal_state_drops_form() {
        let mut screen = screen_with_items();
        let mut state = sample_state();
        state.is_create_open = true;
        screen.update(&Action::StateChanged(state)).unwrap();
        screen
            .update(&Action::StateChanged(sample_state()))
            .unwrap();
        assert!(screen.form.is_none());
        assert!(!screen.wants_text_input());
    }

    #[test]
    fn edit_modal_state_prefills_form() {
        let mut screen = screen_with_items();
        let mut state = sample_state();
        state.is_edit_open = true;
        state.editing_item = Some(state.items[1].clone());
        screen.update(&Action::StateChanged(state)).unwrap();

        let form = screen.form.as_ref().unwrap();
        assert!(form.is_edit());
        assert_eq!(form.editing_id(), Some(&RecordId::Int(2)));
    }

    #[test]
    fn submit_maps_to_edit_action_for_edit_form() {
        let mut screen = screen_with_items();
        let mut state = sample_state();
        state.is_edit_open = true;
        state.editing_item = Some(state.items[0].clone());
        screen.update(&Action::StateChanged(state)).unwrap();

        let action = press(&mut screen, KeyCode::Enter).unwrap();
        let Action::SubmitEdit(payload) = action else {
            panic!("expected SubmitEdit");
        };
        assert_eq!(payload.title, "Taller de robótica");
    }

    #[test]
    fn keys_ignored_while_submitting() {
        let mut screen = screen_with_items();
        let mut state = sample_state();
        state.is_create_open = true;
        state.is_submitting = true;
        screen.update(&Action::StateChanged(state)).unwrap();
        assert!(press(&mut screen, KeyCode::Esc).is_none());
    }

    #[test]
    fn columns_overlay_toggles_visibility() {
        let mut screen = screen_with_items();
        press(&mut screen, KeyCode::Char('v'));
        assert!(screen.wants_text_input());
        // First hideable column is "title"
        press(&mut screen, KeyCode::Char(' '));
        assert!(!screen.model.is_visible("title"));
        press(&mut screen, KeyCode::Esc);
        assert!(!screen.columns_open);
    }
}
