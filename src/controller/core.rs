use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::adapters::{ButtonSource, Display, DisplaySession};
use crate::config::{Config, DaemonConfig, SelectAction};
use crate::core::spawn_task;
use crate::error::RuntimeError;
use crate::events::{Button, Event, Mailbox, MailboxSender, mailbox};
use crate::ui::{UiState, render};

use super::slot::{DaemonSlot, SlotStatus};

/// Single reader of the mailbox and owner of the menu state.
///
/// Holds the program list, the current [`UiState`], the daemon slot and the
/// one-shot tasks fired by select presses.
pub struct Controller {
    programs: Vec<DaemonConfig>,
    cfg: Config,
    state: UiState,

    tx: MailboxSender,
    rx: Mailbox,

    slot: DaemonSlot,
    tasks: JoinSet<()>,
    token: CancellationToken,
}

impl Controller {
    /// Creates a controller; `token` is the process-wide shutdown token.
    pub fn new(programs: Vec<DaemonConfig>, cfg: Config, token: CancellationToken) -> Self {
        let (tx, rx) = mailbox();
        Self {
            programs,
            cfg,
            state: UiState::new(),
            tx,
            rx,
            slot: DaemonSlot::default(),
            tasks: JoinSet::new(),
            token,
        }
    }

    /// Returns a producer handle for input adapters.
    pub fn sender(&self) -> MailboxSender {
        self.tx.clone()
    }

    /// Current menu state.
    pub fn state(&self) -> UiState {
        self.state
    }

    /// Runs the loop until the shutdown token is cancelled.
    ///
    /// The display is powered on first and powered off last, after the
    /// supervised child and all one-shots are gone. Returns the final state.
    pub async fn run(mut self, display: &mut dyn Display) -> Result<UiState, RuntimeError> {
        let mut session = DisplaySession::acquire(display)?;
        info!(programs = self.programs.len(), action = ?self.cfg.select_action, "control loop started");

        if !self.programs.is_empty() {
            self.supervise(0).await;
            self.state = self.state.on_press_select();
        }

        loop {
            self.draw(&mut session);

            let ev = tokio::select! {
                biased;
                _ = self.token.cancelled() => break,
                ev = self.rx.get() => ev,
            };
            // unreachable while `self.tx` is alive
            let Some(ev) = ev else { break };

            debug!(event = ev.as_label(), lifecycle = ev.is_lifecycle(), "dispatch");
            self.dispatch(ev).await;
            while self.tasks.try_join_next().is_some() {}
        }

        self.shutdown().await;
        info!("control loop stopped");
        Ok(self.state)
    }

    async fn dispatch(&mut self, ev: Event) {
        self.state = match ev {
            Event::ButtonPressed(Button::Select) => {
                self.on_select().await;
                return;
            }
            Event::ButtonPressed(Button::Next) => self
                .state
                .on_press_next(self.programs.len(), self.cfg.num_visible_lines()),
            Event::Started => self.state.on_app_started(),
            Event::Exited(_) => self.state.on_app_exited(),
            Event::Failed => self.state.on_app_failed(),
            Event::TaskFinished { code, output } => {
                debug!(?code, bytes = output.len(), "task result");
                self.state.on_display_task(code, &output)
            }
        };
    }

    async fn on_select(&mut self) {
        self.state = self.state.on_press_select();
        let Some(index) = self.state.selected_index() else {
            return;
        };
        let Some(task) = self.programs.get(index).map(|p| p.program.clone()) else {
            return;
        };

        match self.cfg.select_action {
            // restarting supervision replaces the one-shot, so a program never runs twice
            SelectAction::Task => match self.slot.status() {
                SlotStatus::Running { index: running } => {
                    debug!(running, "daemon keeps running");
                    spawn_task(&mut self.tasks, task, self.tx.clone());
                }
                SlotStatus::Finished { index: previous } => {
                    info!(previous, "daemon has ended; supervising selection");
                    self.supervise(index).await;
                }
                SlotStatus::Empty => self.supervise(index).await,
            },
            SelectAction::Switch => self.supervise(index).await,
        }
    }

    /// Replaces the supervised program with row `index`.
    async fn supervise(&mut self, index: usize) {
        let Some(config) = self.programs.get(index) else {
            return;
        };
        let grace = self.cfg.terminate_grace();
        self.slot.replace(index, config, &self.tx, grace, &self.token).await;
    }

    fn draw(&self, session: &mut DisplaySession<'_>) {
        let frame = render(&self.state, &self.programs, &self.cfg.styles);
        if let Err(e) = session.render(&frame) {
            warn!(error = %e, label = e.as_label(), "render failed");
        }
    }

    async fn shutdown(&mut self) {
        self.slot.stop().await;
        if !self.tasks.is_empty() {
            debug!(tasks = self.tasks.len(), "aborting one-shot tasks");
        }
        self.tasks.shutdown().await;
    }
}

/// Runs the launcher: input adapter in the background, control loop in the foreground.
///
/// `buttons` receives the shutdown token itself, so a backend may request
/// shutdown by cancelling it. The button task is aborted once the loop ends.
pub async fn run(
    programs: Vec<DaemonConfig>,
    cfg: Config,
    display: &mut dyn Display,
    buttons: Box<dyn ButtonSource>,
    token: CancellationToken,
) -> Result<UiState, RuntimeError> {
    let controller = Controller::new(programs, cfg, token.clone());

    let name = buttons.name();
    let input = tokio::spawn(buttons.run(controller.sender(), token));
    debug!(source = name, "input started");

    let result = controller.run(display).await;

    input.abort();
    match input.await {
        Ok(Err(e)) => warn!(source = name, error = %e, label = e.as_label(), "input stopped with error"),
        Ok(Ok(())) | Err(_) => debug!(source = name, "input stopped"),
    }
    result
}
