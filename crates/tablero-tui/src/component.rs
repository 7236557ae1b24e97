//! The Component trait — the seam every screen implements.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;

/// A renderable, event-handling unit of the UI.
///
/// Screens receive key events, react to actions from the central loop,
/// and draw themselves into an assigned area.
pub trait Component {
    /// Called once with the action channel before the event loop starts.
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        let _ = action_tx;
        Ok(())
    }

    /// Handle a key event. May return an action for the central loop.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    /// React to an action dispatched by the central loop.
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    /// Whether the component currently consumes plain character keys
    /// (an open form or search bar). Global shortcuts like `q` are
    /// suspended while true.
    fn wants_text_input(&self) -> bool {
        false
    }

    /// Draw the component into `area`.
    fn render(&self, frame: &mut Frame, area: Rect);
}
