//! Form runtime: executes the side effects the pure update function asks
//! for. Owns the message channel, the single in-flight catalog fetch, and
//! the cancellation token that tears everything down deterministically.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::catalog::NodeKey;
use crate::config::Config;
use crate::fetch::{NodeFetcher, RetryPolicy};
use crate::task::PriorTask;
use crate::tea::{update, Command, FormModel, Message, Phase};
use crate::{nlog_debug, Result};

/// Cheap cloneable handle the rendering collaborator uses to feed events
/// back into the form.
#[derive(Clone)]
pub struct FormHandle {
    tx: mpsc::UnboundedSender<Message>,
}

impl FormHandle {
    pub fn on_name_change(&self, name: String) {
        let _ = self.tx.send(Message::NameChanged(name));
    }

    pub fn on_select_node(&self, key: NodeKey) {
        let _ = self.tx.send(Message::SelectNode(key));
    }

    pub fn on_toggle_advanced(&self, flag: bool) {
        let _ = self.tx.send(Message::SetAdvancedOptions(flag));
    }

    pub fn on_option_change(&self, name: String, value: Option<serde_json::Value>) {
        let _ = self.tx.send(Message::OptionChanged(name, value));
    }

    pub fn on_retry(&self) {
        let _ = self.tx.send(Message::Retry);
    }
}

/// Drives a [`FormModel`] against a fetch collaborator.
///
/// At most one catalog fetch is in flight at a time: fetches are only
/// started by `FetchNodes`/`ScheduleRetry` commands, and those are only
/// emitted once the previous attempt has fully succeeded or failed.
pub struct FormRuntime {
    model: FormModel,
    fetcher: Arc<dyn NodeFetcher>,
    retry: RetryPolicy,
    msg_tx: mpsc::UnboundedSender<Message>,
    msg_rx: mpsc::UnboundedReceiver<Message>,
    cancel: CancellationToken,
    on_loaded: Option<Box<dyn FnOnce() + Send>>,
    started: bool,
}

impl FormRuntime {
    pub fn new(config: Config, prior: Option<PriorTask>, fetcher: Arc<dyn NodeFetcher>) -> Self {
        let model = FormModel::new(config, prior);
        let retry = RetryPolicy::from_config(&model.config);
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        Self {
            model,
            fetcher,
            retry,
            msg_tx,
            msg_rx,
            cancel: CancellationToken::new(),
            on_loaded: None,
            started: false,
        }
    }

    /// Host completion callback, invoked once after the first successful load.
    pub fn on_loaded(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_loaded = Some(Box::new(callback));
        self
    }

    pub fn handle(&self) -> FormHandle {
        FormHandle {
            tx: self.msg_tx.clone(),
        }
    }

    pub fn model(&self) -> &FormModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut FormModel {
        &mut self.model
    }

    /// Kick off the initial catalog fetch. Idempotent.
    pub fn start(&mut self) {
        if !self.started {
            self.started = true;
            self.execute(Command::FetchNodes);
        }
    }

    /// Apply one message synchronously and execute the resulting commands.
    pub fn apply(&mut self, msg: Message) {
        for cmd in update(&mut self.model, msg) {
            self.execute(cmd);
        }
    }

    /// Process incoming messages until the form settles in `Ready` or
    /// `Error`, or the runtime is torn down. Transport failures keep it in
    /// `Loading` and retry silently, so this only returns once the catalog
    /// actually answered.
    pub async fn run_until_settled(&mut self) -> Result<()> {
        self.start();
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return Ok(()),
                msg = self.msg_rx.recv() => {
                    let Some(msg) = msg else { return Ok(()) };
                    self.apply(msg);
                    if !matches!(self.model.phase, Phase::Loading) {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Tear down: cancels any in-flight fetch or pending retry so nothing
    /// mutates a defunct form.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    fn execute(&mut self, cmd: Command) {
        match cmd {
            Command::FetchNodes => self.spawn_fetch(None),
            Command::ScheduleRetry => self.spawn_fetch(Some(self.retry.delay)),
            Command::NotifyLoaded => {
                nlog_debug!("Form loaded, firing host callback");
                if let Some(callback) = self.on_loaded.take() {
                    callback();
                }
            }
        }
    }

    fn spawn_fetch(&self, delay: Option<Duration>) {
        let fetcher = self.fetcher.clone();
        let tx = self.msg_tx.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            let attempt = async {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                fetcher.fetch().await
            };

            tokio::select! {
                _ = cancel.cancelled() => {
                    nlog_debug!("Catalog fetch cancelled");
                }
                result = attempt => {
                    let msg = match result {
                        Ok(raw) => Message::NodesFetched(raw),
                        Err(e) => Message::FetchFailed(e.to_string()),
                    };
                    let _ = tx.send(msg);
                }
            }
        });
    }
}

impl Drop for FormRuntime {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
