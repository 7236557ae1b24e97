//! Central event loop: terminal events in, actions dispatched, frames out.

use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::info;

use tablero_api::ApiClient;
use tablero_core::{Notification, NotificationLevel, RecordId, activities_binding};

use crate::action::Action;
use crate::bridge::{Command, spawn_bridge};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::records::RecordsScreen;
use crate::theme;
use crate::tui::Tui;

/// Toasts disappear on their own after this long.
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

pub struct App {
    records: RecordsScreen,
    action_tx: UnboundedSender<Action>,
    action_rx: UnboundedReceiver<Action>,
    cmd_tx: UnboundedSender<Command>,
    cancel: CancellationToken,
    should_quit: bool,
    show_help: bool,
    pending_delete: Option<(RecordId, String)>,
    notification: Option<(Notification, Instant)>,
    backend_label: String,
}

impl App {
    pub fn new(client: Arc<ApiClient>, backend_label: String, page_size: usize) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let binding = activities_binding();
        let cmd_tx = spawn_bridge(
            client,
            &binding.endpoint,
            action_tx.clone(),
            cancel.clone(),
        );

        Self {
            records: RecordsScreen::new(binding, page_size),
            action_tx,
            action_rx,
            cmd_tx,
            cancel,
            should_quit: false,
            show_help: false,
            pending_delete: None,
            notification: None,
            backend_label,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let mut events = EventReader::new(Duration::from_millis(250), Duration::from_millis(33));
        self.records.init(self.action_tx.clone())?;

        info!("event loop started");
        while !self.should_quit {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => self.handle_key(key)?,
                Event::Resize(w, h) => self.dispatch(Action::Resize(w, h)),
                Event::Tick => self.dispatch(Action::Tick),
                Event::Render => self.dispatch(Action::Render),
            }

            let mut needs_draw = false;
            while let Ok(action) = self.action_rx.try_recv() {
                if matches!(action, Action::Render | Action::Resize(..)) {
                    needs_draw = true;
                }
                self.process_action(action)?;
            }
            if needs_draw && !self.should_quit {
                tui.draw(|frame| self.render(frame))?;
            }
        }

        self.cancel.cancel();
        tui.exit()?;
        Ok(())
    }

    fn dispatch(&self, action: Action) {
        let _ = self.action_tx.send(action);
    }

    // ── Input routing ───────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Ctrl+C always quits, even with a form open.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.dispatch(Action::Quit);
            return Ok(());
        }

        if self.show_help {
            self.dispatch(Action::ToggleHelp);
            return Ok(());
        }

        if self.pending_delete.is_some() {
            match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => self.dispatch(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => self.dispatch(Action::ConfirmNo),
                _ => {}
            }
            return Ok(());
        }

        if !self.records.wants_text_input() {
            match key.code {
                KeyCode::Char('q') => {
                    self.dispatch(Action::Quit);
                    return Ok(());
                }
                KeyCode::Char('?') => {
                    self.dispatch(Action::ToggleHelp);
                    return Ok(());
                }
                _ => {}
            }
        }

        if let Some(action) = self.records.handle_key_event(key)? {
            self.dispatch(action);
        }
        Ok(())
    }

    // ── Action processing ───────────────────────────────────────

    fn process_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleHelp => self.show_help = !self.show_help,

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, at)| at.elapsed() > NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
                self.forward(&Action::Tick)?;
            }

            Action::Notify(notification) => {
                self.notification = Some((notification, Instant::now()));
            }
            Action::DismissNotification => self.notification = None,

            Action::StateChanged(_) => self.forward(&action)?,

            Action::Refresh => self.command(Command::Refresh),
            Action::OpenCreate => self.command(Command::OpenCreate),
            Action::OpenEdit(item) => self.command(Command::OpenEdit(item)),
            Action::CloseModal => self.command(Command::CloseModal),
            Action::SubmitCreate(payload) => self.command(Command::SubmitCreate(payload)),
            Action::SubmitEdit(payload) => self.command(Command::SubmitEdit(payload)),

            Action::RequestDelete { id, title } => self.pending_delete = Some((id, title)),
            Action::ConfirmYes => {
                if let Some((id, _)) = self.pending_delete.take() {
                    self.command(Command::Delete(id));
                }
            }
            Action::ConfirmNo => self.pending_delete = None,

            Action::Render | Action::Resize(..) => {}
        }
        Ok(())
    }

    fn forward(&mut self, action: &Action) -> Result<()> {
        if let Some(follow_up) = self.records.update(action)? {
            self.dispatch(follow_up);
        }
        Ok(())
    }

    fn command(&self, cmd: Command) {
        let _ = self.cmd_tx.send(cmd);
    }

    // ── Rendering ───────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

        let header = Line::from(vec![
            Span::styled(" tablero ", theme::title_style()),
            Span::styled(format!("· {}", self.backend_label), theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(header), layout[0]);

        self.records.render(frame, layout[1]);

        let status = Line::from(vec![
            Span::styled(" q ", theme::key_hint_key()),
            Span::styled("salir  ", theme::key_hint()),
            Span::styled("? ", theme::key_hint_key()),
            Span::styled("ayuda", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(status), layout[2]);

        if let Some((id, title)) = &self.pending_delete {
            self.render_confirm(frame, frame.area(), id, title);
        }
        if self.show_help {
            render_help(frame, frame.area());
        }
        if let Some((notification, _)) = &self.notification {
            render_toast(frame, frame.area(), notification);
        }
    }

    #[allow(clippy::unused_self)]
    fn render_confirm(&self, frame: &mut Frame, area: Rect, id: &RecordId, title: &str) {
        let message = format!("¿Eliminar \"{title}\" (id {id})?");
        let overlay_w = u16::try_from(message.chars().count())
            .unwrap_or(40)
            .saturating_add(6)
            .min(area.width.saturating_sub(4));
        let overlay = centered(area, overlay_w, 5);

        frame.render_widget(Clear, overlay);
        let block = Block::default()
            .title(" Confirmar ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(theme::border_focused());
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let lines = vec![
            Line::from(Span::styled(format!(" {message}"), theme::field_value())),
            Line::from(Span::styled(
                " Esta acción no se puede deshacer.",
                theme::placeholder(),
            )),
            Line::from(vec![
                Span::styled(" y", theme::key_hint_key()),
                Span::styled(" sí  ", theme::key_hint()),
                Span::styled("n", theme::key_hint_key()),
                Span::styled(" no", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

fn render_help(frame: &mut Frame, area: Rect) {
    let entries: &[(&str, &str)] = &[
        ("j/k", "mover la selección"),
        ("h/l", "cambiar de página"),
        ("n", "nueva actividad"),
        ("e", "editar la seleccionada"),
        ("d", "eliminar la seleccionada"),
        ("/", "buscar por título"),
        ("v", "mostrar/ocultar columnas"),
        ("1-9", "ordenar por columna"),
        ("r", "recargar"),
        ("q", "salir"),
    ];

    let overlay = centered(area, 44, u16::try_from(entries.len()).unwrap_or(10) + 2);
    frame.render_widget(Clear, overlay);
    let block = Block::default()
        .title(" Ayuda ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    let lines: Vec<Line> = entries
        .iter()
        .map(|(key, text)| {
            Line::from(vec![
                Span::styled(format!(" {key:<5}"), theme::key_hint_key()),
                Span::styled((*text).to_owned(), theme::key_hint()),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Toast in the bottom-right corner, colored by severity.
fn render_toast(frame: &mut Frame, area: Rect, notification: &Notification) {
    let style = match notification.level {
        NotificationLevel::Success => ratatui::style::Style::default().fg(theme::SUCCESS_GREEN),
        NotificationLevel::Error => ratatui::style::Style::default().fg(theme::ERROR_RED),
    };

    let width = u16::try_from(notification.message.chars().count())
        .unwrap_or(30)
        .saturating_add(4)
        .min(area.width);
    let x = area.right().saturating_sub(width + 1);
    let y = area.bottom().saturating_sub(4);
    let overlay = Rect::new(x, y, width, 3);

    frame.render_widget(Clear, overlay);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(style);
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {}", notification.message),
            style,
        ))),
        inner,
    );
}
