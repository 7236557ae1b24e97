//! Controller bridge — runs the CRUD state machine in a background task.
//!
//! The event loop cannot await backend calls without freezing the UI,
//! so the [`CrudController`] lives in its own task: view-state changes
//! and toasts flow out as [`Action`]s, user intents flow in as
//! [`Command`]s.

use std::future::Future;
use std::pin::pin;
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use tablero_api::{ApiClient, RecordService};
use tablero_core::{
    Activity, ActivityPayload, ChannelNotifier, CrudController, MemoryNavigator, Notification,
    RecordId, ViewState,
};

use crate::action::Action;

/// User intents forwarded to the controller task.
#[derive(Debug)]
pub enum Command {
    Refresh,
    OpenCreate,
    OpenEdit(Activity),
    CloseModal,
    SubmitCreate(ActivityPayload),
    SubmitEdit(ActivityPayload),
    Delete(RecordId),
}

/// Spawn the controller task for one resource endpoint.
///
/// Performs the initial fetch, then loops: every view-state transition
/// is forwarded as [`Action::StateChanged`], every toast as
/// [`Action::Notify`], and incoming [`Command`]s drive the controller.
/// Shuts down on cancellation.
pub fn spawn_bridge(
    client: Arc<ApiClient>,
    endpoint: &str,
    action_tx: UnboundedSender<Action>,
    cancel: CancellationToken,
) -> UnboundedSender<Command> {
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<Command>();
    let (toast_tx, mut toast_rx) = mpsc::unbounded_channel();

    let service: RecordService<Activity, ActivityPayload> = RecordService::new(client, endpoint);
    let navigator = Arc::new(MemoryNavigator::new());
    let notifier = Arc::new(ChannelNotifier::new(toast_tx));

    tokio::spawn(async move {
        let mut controller = CrudController::new(service, navigator, notifier);
        let mut state_rx = controller.subscribe();

        forward_during(controller.load(), &mut state_rx, &mut toast_rx, &action_tx).await;

        loop {
            tokio::select! {
                biased;

                () = cancel.cancelled() => break,

                Ok(()) = state_rx.changed() => {
                    let state = state_rx.borrow_and_update().clone();
                    if action_tx.send(Action::StateChanged(state)).is_err() {
                        break;
                    }
                }

                Some(notification) = toast_rx.recv() => {
                    let _ = action_tx.send(Action::Notify(notification));
                }

                Some(cmd) = cmd_rx.recv() => {
                    debug!(?cmd, "bridge command");
                    match cmd {
                        Command::Refresh => {
                            forward_during(
                                controller.refresh(),
                                &mut state_rx, &mut toast_rx, &action_tx,
                            ).await;
                        }
                        Command::OpenCreate => controller.open_create(),
                        Command::OpenEdit(item) => controller.open_edit(item),
                        Command::CloseModal => {
                            let state = controller.state();
                            if state.is_create_open {
                                controller.close_create();
                            } else if state.is_edit_open {
                                controller.close_edit();
                            }
                        }
                        // Failures already produced a toast and left the
                        // modal open; nothing further to do here.
                        Command::SubmitCreate(payload) => {
                            forward_during(
                                async { let _ = controller.submit_create(payload).await; },
                                &mut state_rx, &mut toast_rx, &action_tx,
                            ).await;
                        }
                        Command::SubmitEdit(payload) => {
                            forward_during(
                                async { let _ = controller.submit_edit(payload).await; },
                                &mut state_rx, &mut toast_rx, &action_tx,
                            ).await;
                        }
                        Command::Delete(id) => {
                            forward_during(
                                async { let _ = controller.delete(id).await; },
                                &mut state_rx, &mut toast_rx, &action_tx,
                            ).await;
                        }
                    }
                }
            }
        }

        debug!("controller bridge shut down");
    });

    cmd_tx
}

/// Await a controller call while still forwarding state and toast
/// traffic. The watch channel coalesces: the `is_submitting` and
/// `is_loading` pulses published mid-call would otherwise be overwritten
/// before the screen reads them, leaving its submit gate blind.
async fn forward_during(
    fut: impl Future<Output = ()>,
    state_rx: &mut watch::Receiver<ViewState<Activity>>,
    toast_rx: &mut UnboundedReceiver<Notification>,
    action_tx: &UnboundedSender<Action>,
) {
    let mut fut = pin!(fut);
    loop {
        tokio::select! {
            () = &mut fut => break,

            Ok(()) = state_rx.changed() => {
                let state = state_rx.borrow_and_update().clone();
                let _ = action_tx.send(Action::StateChanged(state));
            }

            Some(notification) = toast_rx.recv() => {
                let _ = action_tx.send(Action::Notify(notification));
            }
        }
    }
}
