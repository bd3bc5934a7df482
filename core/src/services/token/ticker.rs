//! Tick sources for periodic background work

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval, Interval, MissedTickBehavior};

/// Something that resolves once per period
#[async_trait]
pub trait Ticker: Send {
    async fn tick(&mut self);
}

/// Ticker backed by `tokio::time::interval`; the first tick fires immediately
///
/// Under a paused tokio clock, `tokio::time::advance` drives it.
#[derive(Debug)]
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// Ticker that fires only when its [`ManualTrigger`] says so
#[derive(Debug)]
pub struct ManualTicker {
    requests: mpsc::UnboundedReceiver<oneshot::Sender<()>>,
    pending_ack: Option<oneshot::Sender<()>>,
}

/// Remote control for a [`ManualTicker`]
#[derive(Debug, Clone)]
pub struct ManualTrigger {
    requests: mpsc::UnboundedSender<oneshot::Sender<()>>,
}

/// Create a linked ticker and trigger
pub fn manual_ticker() -> (ManualTicker, ManualTrigger) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        ManualTicker {
            requests: rx,
            pending_ack: None,
        },
        ManualTrigger { requests: tx },
    )
}

#[async_trait]
impl Ticker for ManualTicker {
    async fn tick(&mut self) {
        // Being asked for the next tick means the previous one's work is done
        if let Some(ack) = self.pending_ack.take() {
            let _ = ack.send(());
        }
        match self.requests.recv().await {
            Some(ack) => self.pending_ack = Some(ack),
            None => std::future::pending::<()>().await,
        }
    }
}

impl ManualTrigger {
    /// Fire one tick and wait until the consumer asks for the next one
    ///
    /// Returns `false` if the ticker was dropped before acknowledging.
    pub async fn fire(&self) -> bool {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.requests.send(ack_tx).is_err() {
            return false;
        }
        ack_rx.await.is_ok()
    }
}
