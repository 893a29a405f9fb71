//! Worker thread lifecycle.
//!
//! The worker polls the mailbox on a fixed interval rather than waiting on a
//! signal: background music loads are rare compared to the poll rate, and
//! polling keeps the producer side down to a single try-lock.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::app::AppContext;
use crate::resolver::{Resolution, Resolver};

const WORKER_THREAD_NAME: &str = "bgm-worker";

/// Handle to the running worker. Dropping it stops and joins the thread.
#[derive(Debug)]
pub struct WorkerHandle {
    context: Arc<AppContext>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Clears the worker-active flag and waits for the thread to exit, which
    /// takes at most one poll interval.
    pub fn shutdown(mut self) {
        self.stop();
    }

    pub fn is_running(&self) -> bool {
        self.thread
            .as_ref()
            .is_some_and(|thread| !thread.is_finished())
    }

    fn stop(&mut self) {
        self.context.set_worker_active(false);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("BGM worker thread panicked.");
            } else {
                log::info!("BGM worker thread joined.");
            }
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawn the worker thread draining `context`'s mailbox.
pub fn run(context: Arc<AppContext>) -> io::Result<WorkerHandle> {
    context.set_worker_active(true);
    let worker_context = context.clone();
    let spawned = thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || worker_loop(&worker_context));

    match spawned {
        Ok(thread) => Ok(WorkerHandle {
            context,
            thread: Some(thread),
        }),
        Err(err) => {
            context.set_worker_active(false);
            Err(err)
        }
    }
}

fn worker_loop(context: &AppContext) {
    log::info!("BGM worker thread started.");
    let mut resolver = Resolver::new(
        context.catalog.clone(),
        context.board.clone(),
        context.cooldown(),
    );
    let poll_interval = context.poll_interval();

    while context.is_worker_active() {
        if let Some(path) = context.mailbox.take_if_present() {
            match resolver.resolve(&path, Instant::now()) {
                Resolution::Shown { display_name } => {
                    log::info!("Showing notification for {display_name:?}.");
                }
                Resolution::Suppressed { display_name } => {
                    log::debug!("{display_name:?} is on cooldown, notification suppressed.");
                }
                Resolution::Duplicate | Resolution::Unmatched => {}
            }
        }
        thread::sleep(poll_interval);
    }
    log::info!("BGM worker thread shutting down.");
}
