//! Background dispatch of oracle requests and the guard that keeps late
//! replies from overwriting newer state.
//!
//! Every request runs on its own worker thread and reports back over a
//! channel drained by the UI loop. Requests are never cancelled; instead each
//! one carries a [`Ticket`] and the [`RequestTracker`] only accepts the reply
//! whose ticket (and, for chapters, target) is still current.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::models::{ChapterContent, ChapterRef, SearchResult};
use crate::source::{ScriptureSource, SourceError};
use crate::verses::normalize_chapter;

/// Identity of one dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// What a worker was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Chapter(ChapterRef),
    Search(String),
}

/// A finished request, tagged with the ticket and target it was issued for.
/// Chapter payloads are already normalized.
#[derive(Debug)]
pub enum Completion {
    Chapter {
        ticket: Ticket,
        target: ChapterRef,
        result: Result<ChapterContent, SourceError>,
    },
    Search {
        ticket: Ticket,
        query: String,
        result: Result<Vec<SearchResult>, SourceError>,
    },
}

/// Spawns one worker thread per request.
pub struct Loader {
    source: Arc<dyn ScriptureSource>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    next_id: u64,
}

impl Loader {
    pub fn new(source: Arc<dyn ScriptureSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            tx,
            rx,
            next_id: 0,
        }
    }

    /// Start `request` in the background and return its ticket.
    pub fn dispatch(&mut self, request: Request) -> Ticket {
        self.next_id += 1;
        let ticket = Ticket(self.next_id);
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        info!(ticket = ticket.0, ?request, "dispatching request");

        thread::spawn(move || {
            let completion = match request {
                Request::Chapter(target) => {
                    let result = source
                        .fetch_chapter(&target.book, target.chapter)
                        .map(normalize_chapter);
                    Completion::Chapter {
                        ticket,
                        target,
                        result,
                    }
                }
                Request::Search(query) => {
                    let result = source.search(&query);
                    Completion::Search {
                        ticket,
                        query,
                        result,
                    }
                }
            };
            // The receiver only goes away when the app is shutting down.
            if tx.send(completion).is_err() {
                debug!(ticket = ticket.0, "reply dropped after shutdown");
            }
        });

        ticket
    }

    /// Next finished request, if any, without blocking.
    pub fn try_next(&self) -> Option<Completion> {
        self.rx.try_recv().ok()
    }

    /// Block until a request finishes or `timeout` elapses.
    pub fn next_timeout(&self, timeout: Duration) -> Option<Completion> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// Remembers the latest outstanding request of each kind.
#[derive(Debug, Default)]
pub struct RequestTracker {
    chapter: Option<(Ticket, ChapterRef)>,
    search: Option<Ticket>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a chapter request, superseding any earlier one.
    pub fn begin_chapter(&mut self, ticket: Ticket, target: ChapterRef) {
        self.chapter = Some((ticket, target));
    }

    /// Record a search request, superseding any earlier one.
    pub fn begin_search(&mut self, ticket: Ticket) {
        self.search = Some(ticket);
    }

    /// Forget the outstanding search, e.g. when leaving the search view.
    pub fn abandon_search(&mut self) {
        self.search = None;
    }

    pub fn chapter_pending(&self) -> bool {
        self.chapter.is_some()
    }

    pub fn search_pending(&self) -> bool {
        self.search.is_some()
    }

    /// Decide whether a chapter reply may be applied while `active` is the
    /// open chapter. Accepting clears the pending slot.
    pub fn accept_chapter(
        &mut self,
        ticket: Ticket,
        target: &ChapterRef,
        active: Option<&ChapterRef>,
    ) -> bool {
        let current = matches!(
            &self.chapter,
            Some((pending, pending_target)) if *pending == ticket && pending_target == target
        );
        if !current || active != Some(target) {
            warn!(ticket = ticket.0, chapter = %target, "discarding stale chapter reply");
            return false;
        }
        self.chapter = None;
        true
    }

    /// Decide whether a search reply may be applied. Accepting clears the
    /// pending slot.
    pub fn accept_search(&mut self, ticket: Ticket) -> bool {
        if self.search != Some(ticket) {
            warn!(ticket = ticket.0, "discarding stale search reply");
            return false;
        }
        self.search = None;
        true
    }
}
