use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use shared::{
    AppState, Attraction, AttractionId,
    map::{FitOptions, MapSize, Viewport, fit_bounds},
};
use wasm_bindgen::prelude::{JsValue, wasm_bindgen};

use crate::logging;

/// Window event fired by the bridge when a marker is clicked.
pub const MARKER_CLICK_EVENT: &str = "marker-click";

const FALLBACK_SIZE: MapSize = MapSize {
    width: 800.0,
    height: 600.0,
};

#[wasm_bindgen(module = "/leaflet_map.js")]
extern "C" {
    #[wasm_bindgen(js_name = initMap)]
    fn init_map_js(center: JsValue, zoom: u8);
    #[wasm_bindgen(js_name = renderMarkers)]
    fn render_markers_js(markers: JsValue, viewport: JsValue);
    #[wasm_bindgen(js_name = mapSize)]
    fn map_size_js() -> JsValue;
}

#[derive(Deserialize)]
pub struct MarkerClickPayload {
    pub id: AttractionId,
}

pub fn init() {
    let Viewport { center, zoom } = Viewport::DEFAULT;
    match to_value(&center) {
        Ok(center) => init_map_js(center, zoom),
        Err(err) => logging::error(&format!("cannot initialise map: {err}")),
    }
}

/// Clears every marker and draws the current set again, then refits the
/// view. An empty set leaves the view where it is.
pub fn redraw(state: &AppState) {
    let markers = match to_value(&state.markers()) {
        Ok(value) => value,
        Err(err) => {
            logging::error(&format!("cannot serialise markers: {err}"));
            return;
        }
    };
    let viewport = fit_bounds(
        state.attractions().iter().map(Attraction::coordinate),
        current_size(),
        FitOptions::default(),
    );
    let viewport = to_value(&viewport).unwrap_or(JsValue::NULL);
    render_markers_js(markers, viewport);
}

fn current_size() -> MapSize {
    from_value(map_size_js()).unwrap_or(FALLBACK_SIZE)
}
