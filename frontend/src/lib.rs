mod api;
mod config;
mod logging;
mod map;

use seed::{prelude::*, virtual_dom::AtValue, *};
use shared::{
    AppState, Applied, Attraction, AttractionId, ListState, QueryError, QueryStatus, QueryToken,
    RouteRequest,
};
use wasm_bindgen::{JsCast, prelude::wasm_bindgen};

use crate::map::MarkerClickPayload;

const DESCRIPTION_CHARS: usize = 140;

pub struct Model {
    form: SearchForm,
    state: AppState,
}

#[derive(Default, Clone)]
struct SearchForm {
    start: String,
    end: String,
}

impl SearchForm {
    fn can_submit(&self) -> bool {
        !self.start.trim().is_empty() && !self.end.trim().is_empty()
    }

    fn to_request(&self) -> Result<RouteRequest, QueryError> {
        RouteRequest::new(&self.start, &self.end)
    }
}

pub enum Msg {
    StartChanged(String),
    EndChanged(String),
    Submit,
    AttractionsFetched {
        token: QueryToken,
        result: Result<Vec<Attraction>, QueryError>,
    },
    Select(AttractionId),
    MarkerClicked(AttractionId),
}

pub fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    orders.stream(streams::window_event(
        Ev::from(map::MARKER_CLICK_EVENT),
        |event| {
            let detail = event.dyn_into::<web_sys::CustomEvent>().ok()?.detail();
            let payload: MarkerClickPayload = serde_wasm_bindgen::from_value(detail).ok()?;
            Some(Msg::MarkerClicked(payload.id))
        },
    ));

    Model {
        form: SearchForm::default(),
        state: AppState::new(),
    }
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::StartChanged(val) => model.form.start = val,
        Msg::EndChanged(val) => model.form.end = val,
        Msg::Submit => match model.form.to_request() {
            Ok(request) => {
                let token = model.state.begin_query(request.clone());
                logging::debug(&format!(
                    "query #{} started: {} -> {}",
                    token.value(),
                    request.start,
                    request.end
                ));
                map::redraw(&model.state);
                orders.perform_cmd(async move {
                    let result = api::find_attractions(request).await;
                    Msg::AttractionsFetched { token, result }
                });
            }
            Err(err) => logging::debug(&format!("submit ignored: {err}")),
        },
        Msg::AttractionsFetched { token, result } => {
            let applied = match result {
                Ok(attractions) => {
                    let count = attractions.len();
                    let applied = model.state.set_results(token, attractions);
                    if applied == Applied::Applied {
                        logging::debug(&format!("query #{} found {count} attractions", token.value()));
                    }
                    applied
                }
                Err(err) => {
                    logging::error(&format!("query #{} failed: {err}", token.value()));
                    model.state.set_error(token, err.user_message())
                }
            };
            match applied {
                Applied::Applied => map::redraw(&model.state),
                Applied::Discarded => logging::debug(&format!(
                    "discarded stale response for query #{}",
                    token.value()
                )),
            }
        }
        Msg::Select(id) | Msg::MarkerClicked(id) => {
            if model.state.select(&id) {
                map::redraw(&model.state);
            } else {
                logging::debug(&format!("ignored selection of unknown attraction {id}"));
            }
        }
    }
}

pub fn view(model: &Model) -> Node<Msg> {
    div![
        C!["sidebar"],
        view_header(),
        view_form(model),
        view_results(&model.state),
    ]
}

fn view_header() -> Node<Msg> {
    div![C!["brand"], div![C!["brand-logo"], "RS"], h1!["RouteScout"]]
}

fn view_form(model: &Model) -> Node<Msg> {
    let loading = model.state.is_loading();
    let input_field = |class: &str, value: &str, placeholder: &str, msg: fn(String) -> Msg| {
        div![
            C!["input-field", class],
            span![C!["dot"]],
            input![
                attrs! {
                    At::Type => "text",
                    At::Value => value,
                    At::Placeholder => placeholder,
                    At::AutoComplete => "off",
                },
                input_ev(Ev::Input, msg),
            ]
        ]
    };

    form![
        C!["controls"],
        ev(Ev::Submit, |event| {
            event.prevent_default();
            Msg::Submit
        }),
        input_field(
            "start",
            &model.form.start,
            "Start Location (e.g., Los Angeles)",
            Msg::StartChanged
        ),
        input_field(
            "end",
            &model.form.end,
            "Destination (e.g., Grand Canyon)",
            Msg::EndChanged
        ),
        button![
            attrs! {
                At::Type => "submit",
                At::Disabled => bool_attr(loading || !model.form.can_submit()),
            },
            if loading {
                vec![span![C!["spinner"]], span!["Scouting..."]]
            } else {
                vec![span!["Find Attractions"]]
            },
        ],
    ]
}

fn view_results(state: &AppState) -> Node<Msg> {
    let body = match state.list_state() {
        ListState::Loading => vec![div![
            C!["loading"],
            span![C!["spinner"]],
            "Scouting attractions along your route..."
        ]],
        ListState::Failed(message) => vec![div![C!["error"], message]],
        ListState::Empty => vec![view_empty_state(state.status())],
        ListState::Results(attractions) => attractions
            .iter()
            .map(|attraction| view_card(attraction, state.is_selected(&attraction.id)))
            .collect(),
    };

    div![
        C!["results"],
        results_heading(state).map(|heading| h2![C!["results-heading"], heading]),
        body,
    ]
}

fn results_heading(state: &AppState) -> Option<String> {
    if state.status() != QueryStatus::Success || state.attractions().is_empty() {
        return None;
    }
    let route = state.route()?;
    let count = state.attractions().len();
    let noun = if count == 1 { "stop" } else { "stops" };
    Some(format!("{count} {noun} between {} and {}", route.start, route.end))
}

fn view_empty_state(status: QueryStatus) -> Node<Msg> {
    let (title, text) = match status {
        QueryStatus::Success => (
            "No attractions found",
            "Try a longer route or different locations.",
        ),
        _ => (
            "Ready to explore?",
            "Enter your route to discover amazing places along the way.",
        ),
    };
    div![C!["empty-state"], h3![title], p![text]]
}

fn view_card(attraction: &Attraction, selected: bool) -> Node<Msg> {
    let id = attraction.id.clone();
    div![
        C!["attraction-card", IF!(selected => "selected")],
        ev(Ev::Click, move |_| Msg::Select(id)),
        div![
            C!["card-header"],
            h3![&attraction.name],
            attraction
                .formatted_rating()
                .map(|rating| span![C!["rating"], format!("★ {rating}")]),
        ],
        span![
            C!["badge", attraction.category.badge_class()],
            attraction.category.as_str()
        ],
        p![C!["description"], attraction.summary(DESCRIPTION_CHARS)],
        small![C!["coordinates"], attraction.formatted_coordinates()],
    ]
}

fn bool_attr(value: bool) -> AtValue {
    if value {
        AtValue::Some("true".into())
    } else {
        AtValue::Ignored
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    map::init();
    App::start("app", init, update, view);
}
