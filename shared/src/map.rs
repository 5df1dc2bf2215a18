//! Everything the map surface needs, computed without touching the map
//! library: marker descriptors and the viewport that fits them.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::model::{Attraction, AttractionId, Category, Coordinate};

const TILE_SIZE: f64 = 256.0;
const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_6;

const SELECTED_FILL: &str = "#2563EB";
const DEFAULT_FILL: &str = "#EF4444";
const SELECTED_DIAMETER: u32 = 32;
const DEFAULT_DIAMETER: u32 = 24;
const SELECTED_Z_OFFSET: i32 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub fill: &'static str,
    pub accent: &'static str,
    pub diameter: u32,
    pub anchor: u32,
    pub z_index_offset: i32,
    pub open_popup: bool,
}

/// Appearance of a marker. Size and fill follow the selection; the accent
/// colour (popup label) follows the category.
pub fn marker_style(category: Category, selected: bool) -> MarkerStyle {
    let diameter = if selected {
        SELECTED_DIAMETER
    } else {
        DEFAULT_DIAMETER
    };
    MarkerStyle {
        fill: if selected { SELECTED_FILL } else { DEFAULT_FILL },
        accent: category_accent(category),
        diameter,
        anchor: diameter / 2,
        z_index_offset: if selected { SELECTED_Z_OFFSET } else { 0 },
        open_popup: selected,
    }
}

fn category_accent(category: Category) -> &'static str {
    match category {
        Category::Nature => "#059669",
        Category::History => "#D97706",
        Category::Culture => "#7C3AED",
        Category::Food => "#EA580C",
        Category::Adventure => "#DC2626",
        Category::Other => "#4B5563",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub id: AttractionId,
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub category: Category,
    pub selected: bool,
    pub style: MarkerStyle,
}

/// One marker per attraction. Only an exact id match is highlighted, so a
/// selection that no longer exists highlights nothing. The selected marker
/// comes last to be drawn on top.
pub fn marker_specs(attractions: &[Attraction], selected: Option<&AttractionId>) -> Vec<MarkerSpec> {
    let mut markers: Vec<MarkerSpec> = attractions
        .iter()
        .map(|attraction| {
            let is_selected = selected == Some(&attraction.id);
            MarkerSpec {
                id: attraction.id.clone(),
                lat: attraction.latitude,
                lon: attraction.longitude,
                name: attraction.name.clone(),
                category: attraction.category,
                selected: is_selected,
                style: marker_style(attraction.category, is_selected),
            }
        })
        .collect();
    markers.sort_by_key(|marker| marker.selected);
    markers
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = Coordinate>) -> Option<Self> {
        points.into_iter().fold(None, |acc, point| {
            Some(match acc {
                None => Bounds {
                    min_lat: point.lat,
                    max_lat: point.lat,
                    min_lon: point.lon,
                    max_lon: point.lon,
                },
                Some(b) => Bounds {
                    min_lat: b.min_lat.min(point.lat),
                    max_lat: b.max_lat.max(point.lat),
                    min_lon: b.min_lon.min(point.lon),
                    max_lon: b.max_lon.max(point.lon),
                },
            })
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Applied on every side.
    pub padding_px: f64,
    pub max_zoom: u8,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            padding_px: 50.0,
            max_zoom: 15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: Coordinate,
    pub zoom: u8,
}

impl Viewport {
    /// Continental US, shown before the first results arrive.
    pub const DEFAULT: Viewport = Viewport {
        center: Coordinate {
            lat: 39.8283,
            lon: -98.5795,
        },
        zoom: 4,
    };
}

/// Spherical Mercator at zoom 0, in pixels.
fn project(point: Coordinate) -> (f64, f64) {
    let lat = point.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let x = (point.lon + 180.0) / 360.0 * TILE_SIZE;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * TILE_SIZE;
    (x, y)
}

fn unproject(x: f64, y: f64) -> Coordinate {
    let lon = x / TILE_SIZE * 360.0 - 180.0;
    let n = PI - 2.0 * PI * y / TILE_SIZE;
    let lat = n.sinh().atan().to_degrees();
    Coordinate { lat, lon }
}

/// Largest integer zoom at which `points` fit inside `size` minus padding,
/// capped at `max_zoom`, centred on the projected midpoint. `None` for an
/// empty set.
pub fn fit_bounds(
    points: impl IntoIterator<Item = Coordinate>,
    size: MapSize,
    options: FitOptions,
) -> Option<Viewport> {
    let bounds = Bounds::from_points(points)?;
    let (west, north) = project(Coordinate::new(bounds.max_lat, bounds.min_lon));
    let (east, south) = project(Coordinate::new(bounds.min_lat, bounds.max_lon));

    let span_x = east - west;
    let span_y = south - north;
    let avail_w = (size.width - 2.0 * options.padding_px).max(1.0);
    let avail_h = (size.height - 2.0 * options.padding_px).max(1.0);

    let scale = (avail_w / span_x).min(avail_h / span_y);
    let zoom = scale.log2().floor().clamp(0.0, f64::from(options.max_zoom)) as u8;

    Some(Viewport {
        center: unproject((west + east) / 2.0, (north + south) / 2.0),
        zoom,
    })
}

/// Viewport for a set of attractions, falling back to [`Viewport::DEFAULT`].
pub fn viewport_for(attractions: &[Attraction], size: MapSize, options: FitOptions) -> Viewport {
    fit_bounds(attractions.iter().map(Attraction::coordinate), size, options)
        .unwrap_or(Viewport::DEFAULT)
}
