use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::debounce::Debouncer;
use super::inline_message;
use super::source::{Suggestion, SuggestionSource};
use crate::types::MIN_SEARCH_LENGTH;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

type OnSelect<T> = Box<dyn Fn(&T) + Send + Sync>;

/// Observable selector state.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorState<T> {
    pub query: String,
    pub suggestions: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub selected: Option<T>,
    /// Whether the suggestion panel is shown.
    pub open: bool,
}

impl<T> Default for SelectorState<T> {
    fn default() -> Self {
        Self {
            query: String::new(),
            suggestions: Vec::new(),
            loading: false,
            error: None,
            selected: None,
            open: false,
        }
    }
}

/// What the dropdown under the input shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<T> {
    Hidden,
    Loading,
    Error(String),
    Suggestions(Vec<T>),
    /// Open, long enough query, nothing found.
    NoMatches,
}

/// Autocomplete input with debounced remote search.
///
/// Typing schedules a search once the query reaches the minimum length.
/// Searches already in flight are never cancelled, so the response that
/// resolves last wins.
pub struct SearchSelector<S: SuggestionSource> {
    source: Arc<S>,
    state: Arc<Mutex<SelectorState<S::Item>>>,
    debouncer: Debouncer,
    min_length: usize,
    on_select: Option<OnSelect<S::Item>>,
}

impl<S: SuggestionSource> SearchSelector<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            state: Arc::new(Mutex::new(SelectorState::default())),
            debouncer: Debouncer::new(DEFAULT_DEBOUNCE),
            min_length: MIN_SEARCH_LENGTH,
            on_select: None,
        }
    }

    #[must_use]
    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debouncer = Debouncer::new(delay);
        self
    }

    #[must_use]
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Called with the item after every successful [`select`](Self::select).
    #[must_use]
    pub fn on_select(mut self, callback: impl Fn(&S::Item) + Send + Sync + 'static) -> Self {
        self.on_select = Some(Box::new(callback));
        self
    }

    /// Text typed into the input.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn input(&self, text: impl Into<String>) {
        let text = text.into();
        let searchable = text.chars().count() >= self.min_length;

        {
            let mut state = lock(&self.state);
            state.query.clone_from(&text);
            state.selected = None;
            if !searchable {
                state.suggestions.clear();
                state.open = false;
            }
        }

        if searchable {
            let source = Arc::clone(&self.source);
            let state = Arc::clone(&self.state);
            self.debouncer.schedule(run_search(source, state, text));
        } else {
            self.debouncer.cancel();
        }
    }

    /// Pick the suggestion at `index`. Returns `None` if there is none.
    pub fn select(&self, index: usize) -> Option<S::Item> {
        let item = {
            let mut state = lock(&self.state);
            let item = state.suggestions.get(index)?.clone();
            state.query = item.label().to_string();
            state.selected = Some(item.clone());
            state.suggestions.clear();
            state.open = false;
            item
        };

        if let Some(callback) = &self.on_select {
            callback(&item);
        }
        Some(item)
    }

    /// Reset to empty and drop any pending search.
    pub fn clear(&self) {
        self.debouncer.cancel();
        *lock(&self.state) = SelectorState::default();
    }

    /// Hide the panel, keeping the typed text.
    pub fn dismiss(&self) {
        lock(&self.state).open = false;
    }

    #[must_use]
    pub fn snapshot(&self) -> SelectorState<S::Item> {
        lock(&self.state).clone()
    }

    #[must_use]
    pub fn selected(&self) -> Option<S::Item> {
        lock(&self.state).selected.clone()
    }

    #[must_use]
    pub fn panel(&self) -> Panel<S::Item> {
        let state = lock(&self.state);
        if state.loading {
            return Panel::Loading;
        }
        if let Some(error) = &state.error {
            return Panel::Error(error.clone());
        }
        if !state.open {
            return Panel::Hidden;
        }
        if !state.suggestions.is_empty() {
            return Panel::Suggestions(state.suggestions.clone());
        }
        if state.query.chars().count() >= self.min_length {
            Panel::NoMatches
        } else {
            Panel::Hidden
        }
    }
}

async fn run_search<S: SuggestionSource>(
    source: Arc<S>,
    state: Arc<Mutex<SelectorState<S::Item>>>,
    word: String,
) {
    {
        let mut state = lock(&state);
        state.loading = true;
        state.error = None;
    }

    let result = source.search(&word).await;

    let mut state = lock(&state);
    match result {
        Ok(items) => {
            state.suggestions = items;
            state.open = true;
        }
        Err(e) => {
            tracing::warn!(error = %e, word = %word, "Suggestion search failed");
            state.error = Some(inline_message(&e, <S::Item as Suggestion>::FAILURE));
            state.suggestions.clear();
        }
    }
    state.loading = false;
}

fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
