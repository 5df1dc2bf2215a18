//! Application state shared by the list and the map.
//!
//! Each field has one writer: the query lifecycle (`begin_query`,
//! `set_results`, `set_error`) owns the attraction set, status and error; the
//! views only ever touch the selection. Responses are tagged with the
//! [`QueryToken`] handed out by `begin_query`, and anything but the latest
//! token is dropped on arrival.

use crate::map::{MarkerSpec, marker_specs};
use crate::model::{Attraction, AttractionId, RouteRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryToken(u64);

impl QueryToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Failure,
}

/// Whether a completion was written into the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    Discarded,
}

/// What the results list shows, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListState<'a> {
    Loading,
    Failed(&'a str),
    Empty,
    Results(&'a [Attraction]),
}

#[derive(Debug, Default)]
pub struct AppState {
    attractions: Vec<Attraction>,
    status: QueryStatus,
    error: Option<String>,
    selected: Option<AttractionId>,
    route: Option<RouteRequest>,
    latest: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters `Loading`: drops the previous results, error and selection and
    /// returns the token the matching completion must carry.
    pub fn begin_query(&mut self, request: RouteRequest) -> QueryToken {
        self.latest += 1;
        self.attractions.clear();
        self.error = None;
        self.selected = None;
        self.route = Some(request);
        self.status = QueryStatus::Loading;
        QueryToken(self.latest)
    }

    pub fn set_results(&mut self, token: QueryToken, attractions: Vec<Attraction>) -> Applied {
        if !self.is_current(token) {
            return Applied::Discarded;
        }
        self.attractions = attractions;
        self.error = None;
        self.status = QueryStatus::Success;
        Applied::Applied
    }

    pub fn set_error(&mut self, token: QueryToken, message: impl Into<String>) -> Applied {
        if !self.is_current(token) {
            return Applied::Discarded;
        }
        self.attractions.clear();
        self.error = Some(message.into());
        self.status = QueryStatus::Failure;
        Applied::Applied
    }

    /// Selects `id` if it belongs to the current set. Returns whether the
    /// selection changed to `id`.
    pub fn select(&mut self, id: &AttractionId) -> bool {
        if self.attractions.iter().any(|a| &a.id == id) {
            self.selected = Some(id.clone());
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    fn is_current(&self, token: QueryToken) -> bool {
        token.0 == self.latest && self.status == QueryStatus::Loading
    }

    pub fn attractions(&self) -> &[Attraction] {
        &self.attractions
    }

    pub fn status(&self) -> QueryStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn route(&self) -> Option<&RouteRequest> {
        self.route.as_ref()
    }

    pub fn selected_id(&self) -> Option<&AttractionId> {
        self.selected.as_ref()
    }

    /// The selected attraction, `None` when nothing is selected or the id is
    /// not part of the current set.
    pub fn selected_attraction(&self) -> Option<&Attraction> {
        let id = self.selected.as_ref()?;
        self.attractions.iter().find(|a| &a.id == id)
    }

    pub fn is_selected(&self, id: &AttractionId) -> bool {
        self.selected_attraction().is_some_and(|a| &a.id == id)
    }

    pub fn list_state(&self) -> ListState<'_> {
        if self.is_loading() {
            ListState::Loading
        } else if let Some(error) = self.error.as_deref() {
            ListState::Failed(error)
        } else if self.attractions.is_empty() {
            ListState::Empty
        } else {
            ListState::Results(&self.attractions)
        }
    }

    pub fn markers(&self) -> Vec<MarkerSpec> {
        marker_specs(&self.attractions, self.selected.as_ref())
    }
}
