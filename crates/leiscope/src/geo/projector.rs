//! Flat hierarchy -> positioned markers and parent/child edges

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use super::{BoundingBox, CoordinateResolver, LatLon};
use crate::types::HierarchyNode;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
  pub lei: String,
  pub name: String,
  pub country: String,
  pub position: LatLon,
  pub is_root: bool,
}

/// A line from a parent's position to a child's position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
  pub parent: String,
  pub child: String,
  pub from: LatLon,
  pub to: LatLon,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GeoProjection {
  pub positions: HashMap<String, LatLon>,
  /// One per input node, in input order
  pub markers: Vec<Marker>,
  pub root: Option<String>,
  pub edges: Vec<Edge>,
  /// Region to fit the map to; `None` means no auto-fit
  pub bounds: Option<BoundingBox>,
}

impl GeoProjection {
  pub fn position(&self, lei: &str) -> Option<LatLon> {
    self.positions.get(lei).copied()
  }

  pub fn unpositioned(&self) -> impl Iterator<Item = &Marker> {
    self.markers.iter().filter(|m| m.position.is_sentinel())
  }
}

/// Project hierarchy nodes onto coordinates.
///
/// Each distinct country is resolved once, sequentially, so a code missing
/// from the cache triggers at most one remote lookup. The root is the first
/// parentless node in input order.
pub async fn project(nodes: &[HierarchyNode], resolver: &CoordinateResolver) -> GeoProjection {
  let mut by_country: HashMap<&str, LatLon> = HashMap::new();
  for node in nodes {
    if !by_country.contains_key(node.country.as_str()) {
      let position = resolver.resolve(&node.country).await;
      by_country.insert(node.country.as_str(), position);
    }
  }

  let positions: HashMap<String, LatLon> = nodes
    .iter()
    .map(|n| (n.lei.clone(), by_country.get(n.country.as_str()).copied().unwrap_or(LatLon::SENTINEL)))
    .collect();

  let root = nodes.iter().find(|n| n.is_parentless()).map(|n| n.lei.clone());

  let edges = nodes
    .iter()
    .filter(|n| Some(&n.lei) != root.as_ref())
    .filter_map(|child| {
      let parent = child.parent_lei.as_deref().filter(|p| !p.trim().is_empty())?;
      let from = *positions.get(parent)?;
      let to = *positions.get(&child.lei)?;
      if from.is_sentinel() || to.is_sentinel() {
        return None;
      }
      Some(Edge { parent: parent.to_string(), child: child.lei.clone(), from, to })
    })
    .collect();

  let markers = nodes
    .iter()
    .map(|n| Marker {
      lei: n.lei.clone(),
      name: n.name.clone(),
      country: n.country.clone(),
      position: positions.get(&n.lei).copied().unwrap_or(LatLon::SENTINEL),
      is_root: Some(&n.lei) == root.as_ref(),
    })
    .collect();

  let bounds = BoundingBox::around(positions.values());

  GeoProjection { positions, markers, root, edges, bounds }
}

/// Remembers the projection of one node list, keyed on the list's identity.
///
/// A freshly fetched list is a new `Arc` and misses even when its contents are
/// equal; coordinates are still served from the resolver's cache.
#[derive(Debug, Clone, Default)]
pub struct ProjectionMemo {
  entry: Option<(Arc<Vec<HierarchyNode>>, Arc<GeoProjection>)>,
}

impl ProjectionMemo {
  pub fn get(&self, nodes: &Arc<Vec<HierarchyNode>>) -> Option<Arc<GeoProjection>> {
    self
      .entry
      .as_ref()
      .filter(|(source, _)| Arc::ptr_eq(source, nodes))
      .map(|(_, projection)| Arc::clone(projection))
  }

  pub fn store(&mut self, nodes: Arc<Vec<HierarchyNode>>, projection: Arc<GeoProjection>) {
    self.entry = Some((nodes, projection));
  }

  /// Projection for `nodes`, computing it only when the identity changed.
  pub async fn get_or_project(
    &mut self,
    nodes: &Arc<Vec<HierarchyNode>>,
    resolver: &CoordinateResolver,
  ) -> Arc<GeoProjection> {
    if let Some(projection) = self.get(nodes) {
      return projection;
    }
    let projection = Arc::new(project(nodes, resolver).await);
    self.store(Arc::clone(nodes), Arc::clone(&projection));
    projection
  }
}
