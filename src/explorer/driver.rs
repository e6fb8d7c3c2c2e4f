use super::client::SearchBackend;
use super::controller::{Command, Controller, DEFAULT_DEBOUNCE, Event, View};
use super::history::History;
use crate::search::types::FacetSelection;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    pub debounce: Duration,
    /// Query string the explorer opens on.
    pub initial_url: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            initial_url: String::new(),
        }
    }
}

enum Input {
    Event(Event),
    Back,
    Forward,
}

/// Handle to a controller running on its own task.
///
/// Inputs are queued and applied in order; every applied input publishes a fresh [`View`].
/// Dropping the handle stops the task along with any pending timer or request.
pub struct Explorer {
    inputs: mpsc::UnboundedSender<Input>,
    view: watch::Receiver<View>,
    task: JoinHandle<()>,
}

impl Explorer {
    pub fn spawn(backend: Arc<dyn SearchBackend>, config: ExplorerConfig) -> Self {
        let controller = Controller::new(&config.initial_url, config.debounce);
        let history = History::new(controller.url());

        let (tx, rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(controller.view());

        let runner = Runner {
            controller,
            history,
            backend,
            inputs: tx.clone(),
            view: view_tx,
            debounce: None,
            fetch: None,
        };

        Self {
            inputs: tx,
            view: view_rx,
            task: tokio::spawn(runner.run(rx)),
        }
    }

    pub fn type_text(&self, text: impl Into<String>) {
        self.send(Input::Event(Event::TypedChar(text.into())));
    }

    pub fn submit(&self) {
        self.send(Input::Event(Event::ExplicitSubmit));
    }

    pub fn apply_facets(&self, selection: FacetSelection) {
        self.send(Input::Event(Event::FacetApplied(selection)));
    }

    pub fn change_page(&self, page: u32) {
        self.send(Input::Event(Event::PageChanged(page)));
    }

    pub fn back(&self) {
        self.send(Input::Back);
    }

    pub fn forward(&self) {
        self.send(Input::Forward);
    }

    pub fn view(&self) -> View {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<View> {
        self.view.clone()
    }

    fn send(&self, input: Input) {
        if self.inputs.send(input).is_err() {
            tracing::warn!("Explorer task has stopped, input dropped");
        }
    }
}

impl Drop for Explorer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct Runner {
    controller: Controller,
    history: History,
    backend: Arc<dyn SearchBackend>,
    inputs: mpsc::UnboundedSender<Input>,
    view: watch::Sender<View>,
    debounce: Option<JoinHandle<()>>,
    fetch: Option<(u64, JoinHandle<()>)>,
}

impl Runner {
    async fn run(mut self, mut inputs: mpsc::UnboundedReceiver<Input>) {
        let commands = self.controller.start();
        self.execute(commands);
        self.publish();

        while let Some(input) = inputs.recv().await {
            let commands = match input {
                Input::Event(event) => self.controller.handle(event),
                Input::Back => match self.history.back().map(str::to_string) {
                    Some(url) => self.controller.handle(Event::HistoryNavigated(url)),
                    None => Vec::new(),
                },
                Input::Forward => match self.history.forward().map(str::to_string) {
                    Some(url) => self.controller.handle(Event::HistoryNavigated(url)),
                    None => Vec::new(),
                },
            };
            self.execute(commands);
            self.publish();
        }
    }

    fn execute(&mut self, commands: Vec<Command>) {
        for command in commands {
            tracing::trace!("Explorer command: {:?}", command);
            match command {
                Command::StartDebounce { ticket, delay } => {
                    self.cancel_debounce();
                    let inputs = self.inputs.clone();
                    self.debounce = Some(tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = inputs.send(Input::Event(Event::DebounceElapsed { ticket }));
                    }));
                }
                Command::CancelDebounce => self.cancel_debounce(),
                Command::AbortInFlight { generation } => {
                    if let Some((current, handle)) = self.fetch.take()
                        && current == generation
                    {
                        tracing::debug!("Aborting superseded request {}", generation);
                        handle.abort();
                    }
                }
                Command::Fetch { generation, key } => {
                    let backend = self.backend.clone();
                    let inputs = self.inputs.clone();
                    let handle = tokio::spawn(async move {
                        let request = key.to_request();
                        let event = match backend.search(&request).await {
                            Ok(response) => Event::ResponseArrived {
                                generation,
                                key,
                                response,
                            },
                            Err(e) => Event::ResponseFailed {
                                generation,
                                reason: format!("{:#}", e),
                            },
                        };
                        let _ = inputs.send(Input::Event(event));
                    });
                    self.fetch = Some((generation, handle));
                }
                Command::PushUrl(url) => self.history.push(url),
            }
        }
    }

    fn cancel_debounce(&mut self) {
        if let Some(handle) = self.debounce.take() {
            handle.abort();
        }
    }

    fn publish(&self) {
        self.view.send_replace(self.controller.view());
    }
}

impl Drop for Runner {
    fn drop(&mut self) {
        self.cancel_debounce();
        if let Some((_, handle)) = self.fetch.take() {
            handle.abort();
        }
    }
}
