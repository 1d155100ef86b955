use crate::cluster::StepEngine;
use crate::controller::{RunController, TickReport};
use crate::error::Result;
use crate::generator::ViewTransform;
use crate::geometry::Point2D;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Timer loop for a [`RunController`].
///
/// One tokio task sleeps until the controller's pending deadline and applies
/// the tick under the controller lock. Commands lock the controller, update
/// it and wake the task so it picks up the new deadline. Tick reports are
/// published on a watch channel for the renderer.
pub struct Driver<E: StepEngine> {
    controller: Arc<Mutex<RunController<E>>>,
    wake: Arc<Notify>,
    ticks: watch::Receiver<Option<TickReport>>,
    task: JoinHandle<()>,
}

impl<E> Driver<E>
where
    E: StepEngine + Send + 'static,
    E::State: Send + 'static,
{
    /// Must be called from within a tokio runtime.
    pub fn spawn(controller: RunController<E>) -> Self {
        let controller = Arc::new(Mutex::new(controller));
        let wake = Arc::new(Notify::new());
        let (tx, ticks) = watch::channel(None);

        let task = tokio::spawn(run(controller.clone(), wake.clone(), tx));

        Self {
            controller,
            wake,
            ticks,
            task,
        }
    }

    pub fn start(&self) -> bool {
        let started = self.controller.lock().start(Instant::now());
        self.wake.notify_one();
        started
    }

    pub fn pause(&self) {
        self.controller.lock().pause();
        self.wake.notify_one();
    }

    pub fn reset(&self) -> Result<()> {
        let result = self.controller.lock().reset();
        self.wake.notify_one();
        result
    }

    pub fn set_speed(&self, speed: f64) -> Result<()> {
        let result = self.controller.lock().set_speed(speed, Instant::now());
        self.wake.notify_one();
        result
    }

    pub fn step_once(&self) -> TickReport {
        let report = self.controller.lock().step_once();
        self.wake.notify_one();
        report
    }

    pub fn inject(&self, center: Point2D, transform: &ViewTransform) -> Result<usize> {
        self.controller.lock().inject(center, transform)
    }

    /// Read the controller under its lock, e.g. to take a snapshot.
    pub fn with_controller<T>(&self, f: impl FnOnce(&RunController<E>) -> T) -> T {
        f(&self.controller.lock())
    }

    /// Latest tick report, updated after every scheduled step.
    pub fn subscribe(&self) -> watch::Receiver<Option<TickReport>> {
        self.ticks.clone()
    }

    pub fn shutdown(self) {
        self.task.abort();
    }
}

impl<E: StepEngine> Drop for Driver<E> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<E>(
    controller: Arc<Mutex<RunController<E>>>,
    wake: Arc<Notify>,
    tx: watch::Sender<Option<TickReport>>,
) where
    E: StepEngine,
{
    loop {
        let deadline = controller.lock().next_tick();
        match deadline {
            Some(at) => {
                tokio::select! {
                    _ = tokio::time::sleep_until(at) => {
                        let report = controller.lock().poll(Instant::now());
                        if let Some(report) = report {
                            tracing::debug!(step = report.step, finished = report.finished, "tick");
                            tx.send_replace(Some(report));
                        }
                    }
                    _ = wake.notified() => {}
                }
            }
            None => wake.notified().await,
        }
    }
}
