//! Which screen is visible, and where "back" leads

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum HierarchyMode {
  #[default]
  Tree,
  Map,
}

impl HierarchyMode {
  pub fn toggled(self) -> Self {
    match self {
      HierarchyMode::Tree => HierarchyMode::Map,
      HierarchyMode::Map => HierarchyMode::Tree,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum View {
  #[default]
  Search,
  Company,
  Hierarchy(HierarchyMode),
}

impl View {
  /// Screen reached from `self` by back navigation.
  pub fn back(self, company_loaded: bool) -> View {
    match self {
      View::Hierarchy(_) if company_loaded => View::Company,
      View::Hierarchy(_) | View::Company | View::Search => View::Search,
    }
  }

  pub fn is_hierarchy(self) -> bool {
    matches!(self, View::Hierarchy(_))
  }

  pub fn hierarchy_mode(self) -> Option<HierarchyMode> {
    match self {
      View::Hierarchy(mode) => Some(mode),
      _ => None,
    }
  }

  /// Switch tree/map inside the hierarchy view; other views are unchanged.
  pub fn with_mode(self, mode: HierarchyMode) -> View {
    match self {
      View::Hierarchy(_) => View::Hierarchy(mode),
      other => other,
    }
  }
}
