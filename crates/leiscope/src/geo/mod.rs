//! Geographic projection of ownership hierarchies

pub mod centroids;
pub mod projector;
pub mod resolver;

use serde::{Deserialize, Serialize};

pub use projector::{project, Edge, GeoProjection, Marker, ProjectionMemo};
pub use resolver::{CoordinateCache, CoordinateResolver, Geocoder, HttpGeocoder};

/// A `[lat, lon]` pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
  pub lat: f64,
  pub lon: f64,
}

impl LatLon {
  /// Reserved position for "could not be geolocated".
  pub const SENTINEL: LatLon = LatLon { lat: 0.0, lon: 0.0 };

  pub const fn new(lat: f64, lon: f64) -> Self {
    Self { lat, lon }
  }

  pub fn is_sentinel(&self) -> bool {
    self.lat == 0.0 && self.lon == 0.0
  }

  /// Only finite in-range coordinates are accepted from remote sources.
  pub fn is_valid(&self) -> bool {
    self.lat.is_finite()
      && self.lon.is_finite()
      && (-90.0..=90.0).contains(&self.lat)
      && (-180.0..=180.0).contains(&self.lon)
  }
}

/// Axis-aligned region used to fit a map view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
  pub south: f64,
  pub west: f64,
  pub north: f64,
  pub east: f64,
}

impl BoundingBox {
  /// Bounding box over all non-sentinel positions, `None` when there are none.
  pub fn around<'a, I>(positions: I) -> Option<Self>
  where
    I: IntoIterator<Item = &'a LatLon>,
  {
    positions.into_iter().filter(|p| !p.is_sentinel()).fold(None, |acc, p| {
      Some(match acc {
        None => BoundingBox { south: p.lat, west: p.lon, north: p.lat, east: p.lon },
        Some(b) => BoundingBox {
          south: b.south.min(p.lat),
          west: b.west.min(p.lon),
          north: b.north.max(p.lat),
          east: b.east.max(p.lon),
        },
      })
    })
  }

  pub fn contains(&self, p: &LatLon) -> bool {
    (self.south..=self.north).contains(&p.lat) && (self.west..=self.east).contains(&p.lon)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_sentinel() {
    assert!(LatLon::SENTINEL.is_sentinel());
    assert!(!LatLon::new(0.0, 12.5).is_sentinel());
  }

  #[test]
  fn test_bounding_box_skips_sentinel() {
    let positions = [LatLon::new(10.0, 20.0), LatLon::SENTINEL, LatLon::new(-5.0, 40.0)];
    let bbox = BoundingBox::around(&positions).unwrap();
    assert_eq!(bbox, BoundingBox { south: -5.0, west: 20.0, north: 10.0, east: 40.0 });
    assert!(!bbox.contains(&LatLon::SENTINEL));
  }

  #[test]
  fn test_bounding_box_of_only_sentinels() {
    assert_eq!(BoundingBox::around(&[LatLon::SENTINEL, LatLon::SENTINEL]), None);
  }

  #[test]
  fn test_validity_range() {
    assert!(LatLon::new(53.4, -8.2).is_valid());
    assert!(!LatLon::new(91.0, 0.0).is_valid());
    assert!(!LatLon::new(f64::NAN, 1.0).is_valid());
  }
}
