use super::command::Command;
use super::poller::{Notifier, Poller};
use super::timer::TimerEntry;

use std::collections::BinaryHeap;
use std::io;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, SendError, Sender, TryRecvError, channel};
use std::thread;
use std::time::Instant;

/// The reactor loop, running on its own thread.
///
/// Each turn it:
/// 1. drains pending commands,
/// 2. fires every timer whose deadline has passed,
/// 3. waits until the next deadline or the next command.
pub(crate) struct Reactor {
    receiver: Receiver<Command>,

    poller: Poller,

    /// Min-heap of pending timers, earliest deadline on top.
    timers: BinaryHeap<TimerEntry>,
}

/// Cloneable sender half of the reactor.
#[derive(Clone)]
pub(crate) struct ReactorHandle {
    sender: Sender<Command>,

    notifier: Arc<Notifier>,
}

impl ReactorHandle {
    /// Queues a command and interrupts the reactor's wait.
    pub(crate) fn send(&self, cmd: Command) -> Result<(), SendError<Command>> {
        self.sender.send(cmd)?;
        self.notifier.notify();
        Ok(())
    }
}

enum Turn {
    Continue,
    Stop,
}

impl Reactor {
    fn new(receiver: Receiver<Command>, poller: Poller) -> Self {
        Self {
            receiver,
            poller,
            timers: BinaryHeap::new(),
        }
    }

    /// Spawns the reactor thread.
    ///
    /// The thread exits on [`Command::Shutdown`] or once every handle
    /// has been dropped.
    pub(crate) fn start() -> io::Result<(ReactorHandle, thread::JoinHandle<()>)> {
        let (sender, receiver) = channel();
        let poller = Poller::new()?;
        let notifier = poller.notifier();

        let thread = thread::Builder::new()
            .name("tandem-reactor".into())
            .spawn(move || {
                tracing::debug!("reactor started");

                if let Err(err) = Reactor::new(receiver, poller).run() {
                    tracing::error!(error = %err, "reactor failed");
                }

                tracing::debug!("reactor stopped");
            })?;

        Ok((ReactorHandle { sender, notifier }, thread))
    }

    fn run(&mut self) -> io::Result<()> {
        loop {
            if let Turn::Stop = self.drain_commands() {
                return Ok(());
            }

            self.fire_expired(Instant::now());

            let timeout = self
                .timers
                .peek()
                .map(|timer| timer.deadline.saturating_duration_since(Instant::now()));

            self.poller.wait(timeout)?;
        }
    }

    fn drain_commands(&mut self) -> Turn {
        loop {
            match self.receiver.try_recv() {
                Ok(Command::AddTimer(entry)) => {
                    tracing::trace!(deadline = ?entry.deadline, "timer registered");
                    self.timers.push(entry);
                }
                Ok(Command::Shutdown) | Err(TryRecvError::Disconnected) => return Turn::Stop,
                Err(TryRecvError::Empty) => return Turn::Continue,
            }
        }
    }

    /// Fires, in deadline order, every timer due at `now`.
    fn fire_expired(&mut self, now: Instant) {
        while self.timers.peek().is_some_and(|timer| timer.deadline <= now) {
            let Some(timer) = self.timers.pop() else {
                break;
            };

            if timer.slot.is_cancelled() {
                tracing::trace!("cancelled timer dropped");
                continue;
            }

            timer.slot.fire();
        }
    }
}
