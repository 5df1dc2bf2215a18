use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `true` when both components are finite and inside WGS84 ranges.
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Nature,
    History,
    Culture,
    Food,
    Adventure,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Nature,
        Category::History,
        Category::Culture,
        Category::Food,
        Category::Adventure,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Nature => "Nature",
            Category::History => "History",
            Category::Culture => "Culture",
            Category::Food => "Food",
            Category::Adventure => "Adventure",
            Category::Other => "Other",
        }
    }

    /// CSS modifier used for the category badge in the results list.
    pub fn badge_class(self) -> &'static str {
        match self {
            Category::Nature => "badge-emerald",
            Category::History => "badge-amber",
            Category::Culture => "badge-purple",
            Category::Food => "badge-orange",
            Category::Adventure => "badge-red",
            Category::Other => "badge-gray",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttractionId(String);

impl AttractionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    pub id: AttractionId,
    pub name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl Attraction {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Description cut to at most `max_chars` characters, ending with an
    /// ellipsis when something was removed.
    pub fn summary(&self, max_chars: usize) -> String {
        let text = self.description.trim();
        if text.chars().count() <= max_chars {
            return text.to_string();
        }
        let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", cut.trim_end())
    }

    pub fn formatted_coordinates(&self) -> String {
        format!("{:.3}, {:.3}", self.latitude, self.longitude)
    }

    pub fn formatted_rating(&self) -> Option<String> {
        self.rating.map(|rating| format!("{rating:.1}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start: String,
    pub end: String,
}

impl RouteRequest {
    /// Builds a request from raw form input. Both ends are trimmed and must be
    /// non-empty.
    pub fn new(start: &str, end: &str) -> Result<Self, QueryError> {
        let start = start.trim();
        let end = end.trim();
        if start.is_empty() || end.is_empty() {
            return Err(QueryError::EmptyLocation);
        }
        Ok(Self {
            start: start.to_string(),
            end: end.to_string(),
        })
    }
}
