//! Geospatial filtering with the `geofilt` and `bbox` parsers.

use crate::common::CommonParams;
use crate::error::{Error, Result};
use crate::param::{ParamValue, WireParams};
use crate::query::SolrQuery;

/// Scoring mode for spatial queries, emitted as the `score` local
/// argument via the top-level `score` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatialScore {
    /// Constant score of 1.0 for every match.
    None,
    /// Distance in kilometers.
    Kilometers,
    /// Distance in miles.
    Miles,
    /// Distance in degrees.
    Degrees,
    /// Distance in the units the field is configured with.
    Distance,
    /// Reciprocal of the distance; ranks closer documents higher.
    RecipDistance,
    /// Shape overlap ratio; BBoxField only.
    OverlapRatio,
    /// Overlap area in square units of the distance unit.
    Area,
    /// Overlap area in square degrees.
    Area2D,
}

impl SpatialScore {
    /// Wire value for `score`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SpatialScore::None => "none",
            SpatialScore::Kilometers => "kilometers",
            SpatialScore::Miles => "miles",
            SpatialScore::Degrees => "degrees",
            SpatialScore::Distance => "distance",
            SpatialScore::RecipDistance => "recipDistance",
            SpatialScore::OverlapRatio => "overlapRatio",
            SpatialScore::Area => "area",
            SpatialScore::Area2D => "area2D",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpatialParser {
    Geofilt,
    Bbox,
}

impl SpatialParser {
    fn as_str(self) -> &'static str {
        match self {
            SpatialParser::Geofilt => "geofilt",
            SpatialParser::Bbox => "bbox",
        }
    }
}

/// Query documents by distance from a point.
///
/// `geofilt` matches within an exact circular radius; `bbox` matches
/// within the bounding box of that circle, which is cheaper but
/// admits corner points farther than the radius.
///
/// # Example
///
/// ```
/// use solrflow::{SolrQuery, SpatialQuery};
///
/// let query = SpatialQuery::geofilt("store", 45.15, -93.85, 5.0).unwrap();
/// let pairs = query.build().to_query_pairs();
/// assert!(pairs.contains(&("sfield".to_string(), "store".to_string())));
/// assert!(pairs.contains(&("pt".to_string(), "45.15,-93.85".to_string())));
/// assert!(pairs.contains(&("d".to_string(), "5".to_string())));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialQuery {
    parser: SpatialParser,
    field: String,
    latitude: f64,
    longitude: f64,
    distance_km: f64,
    score: Option<SpatialScore>,
    filter: Option<bool>,
    cache: Option<bool>,
    common: CommonParams,
}

impl SpatialQuery {
    fn new(
        parser: SpatialParser,
        field: impl Into<String>,
        latitude: f64,
        longitude: f64,
        distance_km: f64,
    ) -> Result<Self> {
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(Error::config(format!(
                "spatial distance must be a non-negative number of kilometers, got {distance_km}"
            )));
        }
        Ok(Self {
            parser,
            field: field.into(),
            latitude,
            longitude,
            distance_km,
            score: None,
            filter: None,
            cache: None,
            common: CommonParams::default(),
        })
    }

    /// Match documents within `distance_km` kilometers of the point.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `distance_km` is negative or
    /// not finite. Zero is allowed and matches the point itself.
    pub fn geofilt(
        field: impl Into<String>,
        latitude: f64,
        longitude: f64,
        distance_km: f64,
    ) -> Result<Self> {
        Self::new(SpatialParser::Geofilt, field, latitude, longitude, distance_km)
    }

    /// Match documents within the bounding box of the circle.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `distance_km` is negative or
    /// not finite.
    pub fn bbox(
        field: impl Into<String>,
        latitude: f64,
        longitude: f64,
        distance_km: f64,
    ) -> Result<Self> {
        Self::new(SpatialParser::Bbox, field, latitude, longitude, distance_km)
    }

    /// How matches are scored.
    #[must_use]
    pub fn with_score(mut self, score: SpatialScore) -> Self {
        self.score = Some(score);
        self
    }

    /// Advisory flag that the query is used only for filtering, so
    /// scoring work can be skipped.
    #[must_use]
    pub fn with_filter(mut self, filter: bool) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Whether the filter result may be cached.
    #[must_use]
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Attach the common parameter block.
    #[must_use]
    pub fn with_common(mut self, common: CommonParams) -> Self {
        self.common = common;
        self
    }
}

impl SolrQuery for SpatialQuery {
    fn build(&self) -> WireParams {
        let mut out = WireParams::new();
        self.common.flatten_into(&mut out);
        out.insert("q", "*:*");
        out.insert("defType", self.parser.as_str());
        out.insert("sfield", self.field.clone());
        out.insert("pt", ParamValue::Point(self.latitude, self.longitude));
        out.insert("d", self.distance_km);
        if let Some(score) = self.score {
            out.insert("score", score.as_str());
        }
        if let Some(filter) = self.filter {
            out.insert("filter", filter);
        }
        if let Some(cache) = self.cache {
            out.insert("cache", cache);
        }
        out
    }
}
