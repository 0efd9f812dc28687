//! Wall-clock host for a [`StageMachine`].
//!
//! The driver owns a worker thread fed by a command channel. The worker
//! sleeps until the machine's next deadline, applies elapsed time, and
//! fires the completion callback at most once. Teardown is synchronous:
//! `shutdown()` (and `Drop`) send a shutdown command and join the thread,
//! so no transition can fire after the handle is gone.

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::stage_machine::{StageMachine, StageState};

enum DriverCmd {
    Advance,
    Reset,
    Shutdown,
}

/// Read-only view of the hosted machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSnapshot {
    pub stage: StageState,
    pub steps: u32,
}

pub struct StageDriver {
    tx: Sender<DriverCmd>,
    machine: Arc<Mutex<StageMachine>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl StageDriver {
    /// Start hosting `machine`. `on_complete` fires on the worker thread
    /// when the machine reaches `afterglow`, at most once per driver.
    pub fn spawn<F>(machine: StageMachine, on_complete: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let (tx, rx) = unbounded();
        let machine = Arc::new(Mutex::new(machine));
        let shared = Arc::clone(&machine);
        let worker = thread::spawn(move || {
            Self::run(shared, rx, Box::new(on_complete));
        });
        StageDriver {
            tx,
            machine,
            worker: Some(worker),
        }
    }

    /// Forward one interaction to the machine. Out-of-stage interactions
    /// are absorbed as no-ops, matching the machine contract.
    pub fn advance(&self) {
        let _ = self.tx.send(DriverCmd::Advance);
    }

    /// Cancel all pending transitions and leave the machine dormant.
    pub fn reset(&self) {
        let _ = self.tx.send(DriverCmd::Reset);
    }

    pub fn snapshot(&self) -> StageSnapshot {
        let m = self.machine.lock();
        StageSnapshot {
            stage: m.stage(),
            steps: m.steps(),
        }
    }

    /// Stop the worker and join it. After this returns, no scheduled work
    /// is outstanding and the callback can no longer fire.
    pub fn shutdown(mut self) {
        self.shutdown_inner();
    }

    fn shutdown_inner(&mut self) {
        let _ = self.tx.send(DriverCmd::Shutdown);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }

    fn run(
        machine: Arc<Mutex<StageMachine>>,
        rx: Receiver<DriverCmd>,
        on_complete: Box<dyn FnOnce() + Send>,
    ) {
        let mut on_complete = Some(on_complete);
        let mut last = Instant::now();

        loop {
            let deadline_us = machine.lock().next_deadline_us();

            // Sleep until the next deadline, or park on the channel while
            // the machine waits on interaction.
            let msg = match deadline_us {
                Some(us) => match rx.recv_timeout(Duration::from_micros(us)) {
                    Ok(cmd) => Some(cmd),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                },
                None => match rx.recv() {
                    Ok(cmd) => Some(cmd),
                    Err(_) => break,
                },
            };

            // Advance `last` only by whole consumed microseconds so the
            // sub-microsecond remainder is never truncated away.
            let dt_us = Instant::now().duration_since(last).as_micros() as u64;
            if dt_us > 0 {
                last += Duration::from_micros(dt_us);
            }

            let mut shutdown = false;
            let fire = {
                let mut m = machine.lock();
                let entered = m.tick(dt_us);
                if !entered.is_empty() {
                    log::debug!("stage driver entered {:?}", entered);
                }
                match msg {
                    Some(DriverCmd::Advance) => {
                        m.advance();
                    }
                    Some(DriverCmd::Reset) => m.reset(),
                    Some(DriverCmd::Shutdown) => {
                        m.reset();
                        shutdown = true;
                    }
                    None => {}
                }
                m.take_completion()
            };

            if fire && !shutdown {
                if let Some(cb) = on_complete.take() {
                    cb();
                }
            }
            if shutdown {
                break;
            }
        }
    }
}

impl Drop for StageDriver {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.shutdown_inner();
        }
    }
}
