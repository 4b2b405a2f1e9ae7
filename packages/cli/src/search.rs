use std::io::BufRead;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossbeam::channel::{self, Receiver, Sender};

use crate::client::{ApiClient, Resource, SearchParams};

/// Quiet period after the last keystroke before a query goes out.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Hands out increasing sequence numbers and only accepts the newest.
///
/// Responses may arrive in any order; one tagged with an older number than
/// the latest issued is stale and must be dropped.
#[derive(Debug, Default)]
pub struct QuerySequencer {
    latest: u64,
}

impl QuerySequencer {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }

    pub fn accepts(&self, seq: u64) -> bool {
        seq == self.latest
    }
}

/// Holds the most recent input until it has been left alone for `window`.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Replace whatever is pending and restart the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// When the pending value becomes due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.window)
    }

    /// Take the pending value if its quiet period has elapsed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    /// Take the pending value regardless of timing.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(v, _)| v)
    }
}

type Reply = (u64, Result<Vec<Resource>>);

fn spawn_lines(input: impl BufRead + Send + 'static) -> Receiver<String> {
    let (tx, rx) = channel::unbounded();
    thread::spawn(move || {
        for line in input.lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn dispatch(client: &ApiClient, base: &SearchParams, text: String, seq: u64, tx: &Sender<Reply>) {
    let client = client.clone();
    let params = SearchParams {
        query: Some(text).filter(|t| !t.trim().is_empty()),
        ..base.clone()
    };
    let tx = tx.clone();
    thread::spawn(move || {
        // The loop may have exited already.
        let _ = tx.send((seq, client.search(&params)));
    });
}

/// Interactive search: every line read from `input` replaces the free-text
/// query. Results are printed through `show` only for the latest query.
pub fn browse(
    client: &ApiClient,
    base: SearchParams,
    input: impl BufRead + Send + 'static,
    show: impl FnMut(u64, &Result<Vec<Resource>>),
) -> Result<()> {
    let (reply_tx, replies) = channel::unbounded::<Reply>();
    run(
        spawn_lines(input),
        replies,
        |text, seq| dispatch(client, &base, text, seq, &reply_tx),
        show,
    );
    Ok(())
}

/// Event loop behind [`browse`]. `dispatch` starts a query whose reply must
/// come back on `replies` tagged with the same sequence number.
fn run(
    mut lines: Receiver<String>,
    replies: Receiver<Reply>,
    mut dispatch: impl FnMut(String, u64),
    mut show: impl FnMut(u64, &Result<Vec<Resource>>),
) {
    let mut sequencer = QuerySequencer::default();
    let mut debouncer = Debouncer::new(DEBOUNCE_WINDOW);
    let mut input_open = true;
    let mut in_flight = false;

    loop {
        if let Some(text) = debouncer.take_due(Instant::now()) {
            dispatch(text, sequencer.issue());
            in_flight = true;
        }

        if !input_open {
            if let Some(text) = debouncer.flush() {
                dispatch(text, sequencer.issue());
                in_flight = true;
            }
            if !in_flight {
                return;
            }
        }

        let timeout = debouncer
            .deadline()
            .map(|d| d.saturating_duration_since(Instant::now()))
            .unwrap_or(Duration::from_secs(3600));

        channel::select! {
            recv(lines) -> line => match line {
                Ok(text) => debouncer.push(text, Instant::now()),
                Err(_) => {
                    input_open = false;
                    lines = channel::never();
                }
            },
            recv(replies) -> reply => {
                if let Ok((seq, result)) = reply
                    && sequencer.accepts(seq)
                {
                    in_flight = false;
                    show(seq, &result);
                }
            },
            default(timeout) => {}
        }
    }
}
