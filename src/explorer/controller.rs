//! The explorer state machine.
//!
//! `Controller::handle` is the only way state changes. It returns the side effects the caller
//! must perform (start a timer, abort a request, fetch, push a URL) and never does I/O itself,
//! so every ordering of keystrokes, timers and responses can be replayed deterministically.

use super::location;
use crate::search::types::{DEFAULT_PAGE_SIZE, FacetSelection, SearchRequest, SearchResponse};

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const CACHE_CAPACITY: usize = 64;

/// Identity of one result page: what was searched, under which facets, which page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub q: String,
    pub facets: FacetSelection,
    pub page: u32,
}

impl Default for QueryKey {
    fn default() -> Self {
        Self {
            q: String::new(),
            facets: FacetSelection::default(),
            page: 1,
        }
    }
}

impl QueryKey {
    pub fn to_request(&self) -> SearchRequest {
        SearchRequest {
            q: self.q.clone(),
            facets: self.facets.clone(),
            page: self.page,
            page_size: DEFAULT_PAGE_SIZE,
            with_aggregates: false,
        }
    }

    pub fn query_string(&self) -> String {
        location::encode(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing displayed yet and nothing pending.
    Idle,
    /// A deferred search is waiting for the quiet period to elapse.
    Debouncing { ticket: u64 },
    /// A request is outstanding.
    InFlight { generation: u64 },
    /// Results are displayed and nothing is pending.
    Settled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The free-text input now holds this text.
    TypedChar(String),
    /// Enter or blur on the text input.
    ExplicitSubmit,
    FacetApplied(FacetSelection),
    PageChanged(u32),
    DebounceElapsed {
        ticket: u64,
    },
    ResponseArrived {
        generation: u64,
        key: QueryKey,
        response: SearchResponse,
    },
    ResponseAborted {
        generation: u64,
    },
    ResponseFailed {
        generation: u64,
        reason: String,
    },
    /// Back/forward landed on this query string.
    HistoryNavigated(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Start (or restart) the debounce timer; only `ticket` may fire.
    StartDebounce { ticket: u64, delay: Duration },
    CancelDebounce,
    AbortInFlight { generation: u64 },
    Fetch { generation: u64, key: QueryKey },
    /// Add a history entry for this query string.
    PushUrl(String),
}

/// Snapshot for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    /// What the inputs currently hold.
    pub input: QueryKey,
    /// Key of the displayed results, if any.
    pub shown: Option<QueryKey>,
    pub results: SearchResponse,
    pub phase: Phase,
    pub url: String,
}

/// Bounded result cache; the oldest entry is evicted first.
#[derive(Debug, Clone)]
pub struct PageCache {
    entries: HashMap<QueryKey, SearchResponse>,
    order: VecDeque<QueryKey>,
    capacity: usize,
}

impl PageCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &QueryKey) -> Option<&SearchResponse> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: QueryKey, response: SearchResponse) {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = response;
            return;
        }

        while self.order.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, response);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct Controller {
    q: String,
    facets: FacetSelection,
    page: u32,
    debounce: Duration,
    ticket: u64,
    pending_ticket: Option<u64>,
    generation: u64,
    in_flight: Option<u64>,
    cache: PageCache,
    shown: Option<QueryKey>,
    results: SearchResponse,
    url: String,
}

impl Controller {
    /// A controller whose inputs are read from `url`.
    pub fn new(url: &str, debounce: Duration) -> Self {
        let key = location::decode(url);
        Self {
            url: key.query_string(),
            q: key.q,
            facets: key.facets,
            page: key.page,
            debounce,
            ticket: 0,
            pending_ticket: None,
            generation: 0,
            in_flight: None,
            cache: PageCache::new(CACHE_CAPACITY),
            shown: None,
            results: SearchResponse::default(),
        }
    }

    /// Initial search for whatever the URL held at construction.
    pub fn start(&mut self) -> Vec<Command> {
        self.issue()
    }

    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::TypedChar(text) => {
                self.q = text;
                self.page = 1;
                self.ticket += 1;
                self.pending_ticket = Some(self.ticket);
                vec![Command::StartDebounce {
                    ticket: self.ticket,
                    delay: self.debounce,
                }]
            }
            Event::DebounceElapsed { ticket } => {
                if self.pending_ticket != Some(ticket) {
                    tracing::trace!("Ignoring superseded debounce ticket {}", ticket);
                    return Vec::new();
                }
                self.pending_ticket = None;
                self.issue()
            }
            Event::ExplicitSubmit => self.immediate(),
            Event::FacetApplied(selection) => {
                self.facets = selection;
                self.page = 1;
                self.cache.clear();
                self.immediate()
            }
            Event::PageChanged(page) => {
                self.page = page.max(1);
                self.immediate()
            }
            Event::ResponseArrived {
                generation,
                key,
                response,
            } => {
                if self.in_flight != Some(generation) {
                    tracing::debug!(
                        "Discarding stale response for generation {} (latest {})",
                        generation,
                        self.generation
                    );
                    return Vec::new();
                }
                self.in_flight = None;
                self.cache.insert(key.clone(), response.clone());
                self.show(key, response)
            }
            Event::ResponseAborted { generation } => {
                if self.in_flight == Some(generation) {
                    self.in_flight = None;
                }
                Vec::new()
            }
            Event::ResponseFailed { generation, reason } => {
                if self.in_flight == Some(generation) {
                    tracing::warn!("Search failed, keeping previous results: {}", reason);
                    self.in_flight = None;
                }
                Vec::new()
            }
            Event::HistoryNavigated(url) => {
                let mut commands = self.cancel_debounce();
                let key = location::decode(&url);
                self.url = key.query_string();
                self.q = key.q;
                self.facets = key.facets;
                self.page = key.page;
                commands.extend(self.issue());
                commands
            }
        }
    }

    pub fn phase(&self) -> Phase {
        if let Some(ticket) = self.pending_ticket {
            Phase::Debouncing { ticket }
        } else if let Some(generation) = self.in_flight {
            Phase::InFlight { generation }
        } else if self.shown.is_some() {
            Phase::Settled
        } else {
            Phase::Idle
        }
    }

    pub fn current_key(&self) -> QueryKey {
        QueryKey {
            q: self.q.trim().to_string(),
            facets: self.facets.clone(),
            page: self.page,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cached_pages(&self) -> usize {
        self.cache.len()
    }

    pub fn view(&self) -> View {
        View {
            input: QueryKey {
                q: self.q.clone(),
                facets: self.facets.clone(),
                page: self.page,
            },
            shown: self.shown.clone(),
            results: self.results.clone(),
            phase: self.phase(),
            url: self.url.clone(),
        }
    }

    fn immediate(&mut self) -> Vec<Command> {
        let mut commands = self.cancel_debounce();
        commands.extend(self.issue());
        commands
    }

    fn cancel_debounce(&mut self) -> Vec<Command> {
        match self.pending_ticket.take() {
            Some(_) => vec![Command::CancelDebounce],
            None => Vec::new(),
        }
    }

    /// Serves the current key from cache or starts a new generation for it. Either way the
    /// previous in-flight request is superseded.
    fn issue(&mut self) -> Vec<Command> {
        let key = self.current_key();
        let mut commands = Vec::new();

        if let Some(generation) = self.in_flight.take() {
            commands.push(Command::AbortInFlight { generation });
        }
        self.generation += 1;

        if let Some(cached) = self.cache.get(&key).cloned() {
            tracing::debug!("Serving '{}' page {} from cache", key.q, key.page);
            commands.extend(self.show(key, cached));
            return commands;
        }

        self.in_flight = Some(self.generation);
        commands.push(Command::Fetch {
            generation: self.generation,
            key,
        });
        commands
    }

    fn show(&mut self, key: QueryKey, response: SearchResponse) -> Vec<Command> {
        let url = key.query_string();
        self.results = response;
        self.shown = Some(key);

        if url == self.url {
            return Vec::new();
        }
        self.url = url.clone();
        vec![Command::PushUrl(url)]
    }
}
