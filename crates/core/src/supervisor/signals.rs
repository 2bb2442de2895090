//! Sources of termination requests.
//!
//! Only SIGINT and SIGTERM are intercepted. SIGKILL cannot be caught by any
//! process, so it is never part of the registered set.

use async_trait::async_trait;
use pm_protocol::process_models::TerminationSignal;
use tokio::sync::mpsc;

/// The complete set of signals the supervisor registers for.
pub const INTERCEPTED_SIGNALS: [TerminationSignal; 2] =
    [TerminationSignal::Interrupt, TerminationSignal::Terminate];

/// Platform signal number for `signal`.
#[cfg(unix)]
pub fn signal_number(signal: TerminationSignal) -> i32 {
    use nix::sys::signal::Signal;
    match signal {
        TerminationSignal::Interrupt => Signal::SIGINT as i32,
        TerminationSignal::Terminate => Signal::SIGTERM as i32,
    }
}

/// Delivers termination requests to the supervisor.
#[async_trait]
pub trait TerminationSource: Send {
    /// Start listening. Called once, right before the server is launched.
    fn register(&mut self) -> std::io::Result<()>;

    /// Wait for the next request. `None` means no more requests can arrive.
    async fn next_request(&mut self) -> Option<TerminationSignal>;
}

/// Termination requests delivered by the operating system.
///
/// Nothing is registered until [`TerminationSource::register`] runs, so
/// Ctrl-C keeps its default behavior while sources are generated and built.
/// Registration covers exactly [`INTERCEPTED_SIGNALS`].
#[derive(Default)]
pub struct OsSignals {
    #[cfg(unix)]
    streams: Vec<(TerminationSignal, tokio::signal::unix::Signal)>,
    #[cfg(not(unix))]
    registered: bool,
}

impl OsSignals {
    /// Signals currently being listened for.
    #[cfg(unix)]
    pub fn registered(&self) -> Vec<TerminationSignal> {
        self.streams.iter().map(|(signal, _)| *signal).collect()
    }

    /// Signals currently being listened for.
    #[cfg(not(unix))]
    pub fn registered(&self) -> Vec<TerminationSignal> {
        if self.registered {
            vec![TerminationSignal::Interrupt]
        } else {
            Vec::new()
        }
    }
}

#[async_trait]
impl TerminationSource for OsSignals {
    #[cfg(unix)]
    fn register(&mut self) -> std::io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        if self.streams.is_empty() {
            self.streams = INTERCEPTED_SIGNALS
                .iter()
                .map(|&requested| -> std::io::Result<_> {
                    let stream = signal(SignalKind::from_raw(signal_number(requested)))?;
                    Ok((requested, stream))
                })
                .collect::<std::io::Result<Vec<_>>>()?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn register(&mut self) -> std::io::Result<()> {
        self.registered = true;
        Ok(())
    }

    #[cfg(unix)]
    async fn next_request(&mut self) -> Option<TerminationSignal> {
        use std::task::Poll;

        if self.streams.is_empty() {
            return None;
        }
        std::future::poll_fn(|cx| {
            let mut open = false;
            for (requested, stream) in self.streams.iter_mut() {
                match stream.poll_recv(cx) {
                    Poll::Ready(Some(())) => return Poll::Ready(Some(*requested)),
                    Poll::Ready(None) => {}
                    Poll::Pending => open = true,
                }
            }
            if open {
                Poll::Pending
            } else {
                Poll::Ready(None)
            }
        })
        .await
    }

    #[cfg(not(unix))]
    async fn next_request(&mut self) -> Option<TerminationSignal> {
        if !self.registered {
            return None;
        }
        tokio::signal::ctrl_c()
            .await
            .ok()
            .map(|()| TerminationSignal::Interrupt)
    }
}

/// Termination requests fed through a channel, for embedding and tests.
pub struct ChannelTermination {
    rx: mpsc::Receiver<TerminationSignal>,
}

impl ChannelTermination {
    /// Create a source and the sender that feeds it.
    pub fn new(buffer: usize) -> (mpsc::Sender<TerminationSignal>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self { rx })
    }
}

#[async_trait]
impl TerminationSource for ChannelTermination {
    fn register(&mut self) -> std::io::Result<()> {
        Ok(())
    }

    async fn next_request(&mut self) -> Option<TerminationSignal> {
        self.rx.recv().await
    }
}
