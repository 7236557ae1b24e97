//! Create/edit form for activities, rendered as a centered overlay.
//!
//! The form owns only the input buffers; whether it is visible at all
//! is decided by the controller's view state. On a failed submit the
//! controller leaves the modal open, so the buffers (and the user's
//! typing) survive.

use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use tablero_core::{Activity, ActivityPayload, ActivityType, RecordId};

use crate::theme;

/// What a key press did to the form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// Enter on a valid form: submit this payload.
    Submit(ActivityPayload),
    /// Esc: close without saving.
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FormMode {
    Create,
    Edit(RecordId),
}

/// Field order: title, description, type, image URL, resource URL.
const FIELD_COUNT: usize = 5;
const TYPE_FIELD: usize = 2;

pub struct ActivityForm {
    mode: FormMode,
    title: Input,
    description: Input,
    activity_type: ActivityType,
    image_url: Input,
    resource_url: Input,
    field: usize,
    error: Option<String>,
}

impl ActivityForm {
    /// An empty form for a new activity.
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            title: Input::default(),
            description: Input::default(),
            activity_type: ActivityType::default(),
            image_url: Input::default(),
            resource_url: Input::default(),
            field: 0,
            error: None,
        }
    }

    /// A form prefilled from the activity being edited.
    pub fn edit(activity: &Activity) -> Self {
        Self {
            mode: FormMode::Edit(tablero_core::Record::id(activity)),
            title: Input::default().with_value(activity.title.clone()),
            description: Input::default().with_value(activity.description.clone()),
            activity_type: activity.activity_type,
            image_url: Input::default().with_value(activity.image_url.clone().unwrap_or_default()),
            resource_url: Input::default()
                .with_value(activity.resource_url.clone().unwrap_or_default()),
            field: 0,
            error: None,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    /// The record being edited, if any. Used to detect when the
    /// controller switched the modal to a different record.
    pub fn editing_id(&self) -> Option<&RecordId> {
        match &self.mode {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(id),
        }
    }

    // ── Input handling ──────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FormEvent> {
        match key.code {
            KeyCode::Esc => return Some(FormEvent::Cancel),
            KeyCode::Enter => {
                return match self.validate() {
                    Ok(payload) => Some(FormEvent::Submit(payload)),
                    Err(message) => {
                        self.error = Some(message);
                        None
                    }
                };
            }
            KeyCode::Tab | KeyCode::Down => {
                self.field = (self.field + 1) % FIELD_COUNT;
                return None;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.field = self.field.checked_sub(1).unwrap_or(FIELD_COUNT - 1);
                return None;
            }
            _ => {}
        }

        if self.field == TYPE_FIELD {
            let toggles = matches!(
                key.code,
                KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right
            );
            if toggles {
                self.activity_type = match self.activity_type {
                    ActivityType::Digital => ActivityType::NonDigital,
                    ActivityType::NonDigital => ActivityType::Digital,
                };
            }
        } else if let Some(input) = self.focused_input_mut() {
            input.handle_event(&CrosstermEvent::Key(key));
            self.error = None;
        }

        None
    }

    fn focused_input_mut(&mut self) -> Option<&mut Input> {
        match self.field {
            0 => Some(&mut self.title),
            1 => Some(&mut self.description),
            3 => Some(&mut self.image_url),
            4 => Some(&mut self.resource_url),
            _ => None,
        }
    }

    /// Check required fields and build the payload.
    fn validate(&self) -> Result<ActivityPayload, String> {
        let title = self.title.value().trim();
        if title.is_empty() {
            return Err("El título es obligatorio".to_owned());
        }
        let description = self.description.value().trim();
        if description.is_empty() {
            return Err("La descripción es obligatoria".to_owned());
        }

        let optional = |input: &Input| {
            let value = input.value().trim();
            (!value.is_empty()).then(|| value.to_owned())
        };

        Ok(ActivityPayload {
            title: title.to_owned(),
            description: description.to_owned(),
            activity_type: self.activity_type,
            image_url: optional(&self.image_url),
            resource_url: optional(&self.resource_url),
        })
    }

    // ── Rendering ───────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, submitting: bool) {
        let overlay_w = 56u16.min(area.width.saturating_sub(4));
        let overlay_h = 12u16.min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
        let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
        let overlay = Rect::new(x, y, overlay_w, overlay_h);

        frame.render_widget(Clear, overlay);

        let title = if self.is_edit() {
            " Editar actividad "
        } else {
            " Nueva actividad "
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(theme::border_focused());

        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let mut lines = Vec::with_capacity(FIELD_COUNT + 3);
        for idx in 0..FIELD_COUNT {
            lines.push(self.field_line(idx));
        }

        lines.push(Line::from(""));
        if let Some(ref message) = self.error {
            lines.push(Line::from(Span::styled(
                format!(" {message}"),
                Style::default().fg(theme::ERROR_RED),
            )));
        } else if submitting {
            lines.push(Line::from(Span::styled(
                " Guardando...",
                theme::placeholder(),
            )));
        } else {
            lines.push(Line::from(vec![
                Span::styled(" Tab", theme::key_hint_key()),
                Span::styled(" campo  ", theme::key_hint()),
                Span::styled("Espacio", theme::key_hint_key()),
                Span::styled(" tipo  ", theme::key_hint()),
                Span::styled("Enter", theme::key_hint_key()),
                Span::styled(" guardar  ", theme::key_hint()),
                Span::styled("Esc", theme::key_hint_key()),
                Span::styled(" cancelar", theme::key_hint()),
            ]));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn field_line(&self, idx: usize) -> Line<'_> {
        let focused = idx == self.field;
        let label_style = if focused {
            theme::field_focused()
        } else {
            theme::field_label()
        };
        let marker = if focused { "▸ " } else { "  " };

        let (label, value) = match idx {
            0 => ("Título", self.title.value().to_owned()),
            1 => ("Descripción", self.description.value().to_owned()),
            TYPE_FIELD => ("Tipo", self.activity_type.to_string()),
            3 => ("Imagen", self.image_url.value().to_owned()),
            _ => ("Recurso", self.resource_url.value().to_owned()),
        };

        let cursor = if focused && idx != TYPE_FIELD { "▎" } else { "" };

        Line::from(vec![
            Span::styled(marker, label_style),
            Span::styled(format!("{label:<13}"), label_style),
            Span::styled(value, theme::field_value()),
            Span::styled(cursor, theme::field_focused()),
        ])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn press(form: &mut ActivityForm, code: KeyCode) -> Option<FormEvent> {
        form.handle_key(KeyEvent::from(code))
    }

    fn type_text(form: &mut ActivityForm, text: &str) {
        for ch in text.chars() {
            press(form, KeyCode::Char(ch));
        }
    }

    fn sample_activity() -> Activity {
        Activity {
            id: 3,
            title: "Taller de robótica".into(),
            description: "Construcción de robots".into(),
            activity_type: ActivityType::NonDigital,
            image_url: Some("https://example.test/robots.png".into()),
            resource_url: None,
        }
    }

    #[test]
    fn empty_title_blocks_submit() {
        let mut form = ActivityForm::create();
        let event = press(&mut form, KeyCode::Enter);
        assert_eq!(event, None);
        assert_eq!(form.error.as_deref(), Some("El título es obligatorio"));
    }

    #[test]
    fn missing_description_blocks_submit() {
        let mut form = ActivityForm::create();
        type_text(&mut form, "Curso");
        let event = press(&mut form, KeyCode::Enter);
        assert_eq!(event, None);
        assert_eq!(
            form.error.as_deref(),
            Some("La descripción es obligatoria")
        );
    }

    #[test]
    fn complete_form_submits_payload() {
        let mut form = ActivityForm::create();
        type_text(&mut form, "Curso de Scratch");
        press(&mut form, KeyCode::Tab);
        type_text(&mut form, "Programación visual");

        let event = press(&mut form, KeyCode::Enter).unwrap();
        let FormEvent::Submit(payload) = event else {
            panic!("expected submit");
        };
        assert_eq!(payload.title, "Curso de Scratch");
        assert_eq!(payload.description, "Programación visual");
        assert_eq!(payload.activity_type, ActivityType::Digital);
        assert_eq!(payload.image_url, None);
        assert_eq!(payload.resource_url, None);
    }

    #[test]
    fn space_toggles_activity_type() {
        let mut form = ActivityForm::create();
        press(&mut form, KeyCode::Tab);
        press(&mut form, KeyCode::Tab); // now on the type field
        press(&mut form, KeyCode::Char(' '));
        assert_eq!(form.activity_type, ActivityType::NonDigital);
        press(&mut form, KeyCode::Char(' '));
        assert_eq!(form.activity_type, ActivityType::Digital);
    }

    #[test]
    fn edit_form_prefills_and_tracks_id() {
        let activity = sample_activity();
        let mut form = ActivityForm::edit(&activity);
        assert!(form.is_edit());
        assert_eq!(form.editing_id(), Some(&RecordId::Int(3)));

        let event = press(&mut form, KeyCode::Enter).unwrap();
        let FormEvent::Submit(payload) = event else {
            panic!("expected submit");
        };
        assert_eq!(payload.title, "Taller de robótica");
        assert_eq!(payload.activity_type, ActivityType::NonDigital);
        assert_eq!(
            payload.image_url.as_deref(),
            Some("https://example.test/robots.png")
        );
        assert_eq!(payload.resource_url, None);
    }

    #[test]
    fn failed_validation_clears_on_typing() {
        let mut form = ActivityForm::create();
        press(&mut form, KeyCode::Enter);
        assert!(form.error.is_some());
        press(&mut form, KeyCode::Char('a'));
        assert_eq!(form.error, None);
    }

    #[test]
    fn escape_cancels() {
        let mut form = ActivityForm::create();
        assert_eq!(press(&mut form, KeyCode::Esc), Some(FormEvent::Cancel));
    }
}
