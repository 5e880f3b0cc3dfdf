//! Terminal rendering
//!
//! Status lines go to stderr with a colored `[prefix]`. Tables, cards and
//! hierarchy text are built as strings so the binary decides where they land.

use colored::*;

use crate::bulk::BulkState;
use crate::geo::GeoProjection;
use crate::task::Progress;
use crate::types::{Address, CompanyRecord, PersistedPairing, SearchResult};

const PROGRESS_WIDTH: usize = 20;

fn format_prefix(color: Color, prefix: &str) -> String {
  format!("[{}]{:<width$}", prefix.color(color).bold(), "", width = 7 - prefix.len() - 2)
}

fn log_with(color: Color, prefix: &str, message: &str) {
  let prefix = format_prefix(color, prefix);
  for line in message.lines() {
    eprintln!("{prefix} {line}");
  }
}

pub fn info(message: &str) {
  log_with(Color::Blue, "info", message);
}

pub fn warn(message: &str) {
  log_with(Color::Yellow, "warn", message);
}

pub fn error(message: &str) {
  log_with(Color::Red, "error", message);
}

pub fn success(message: &str) {
  log_with(Color::Green, "sccs", message);
}

/// `[#####---------------]  25% message`
pub fn progress_line(progress: &Progress) -> String {
  let percent = usize::from(progress.percent.min(100));
  let filled = percent * PROGRESS_WIDTH / 100;
  format!(
    "[{}{}] {:>3}% {}",
    "#".repeat(filled).green(),
    "-".repeat(PROGRESS_WIDTH - filled).dimmed(),
    percent,
    progress.message
  )
}

fn score_label(result: &SearchResult) -> String {
  match result.bounded_score() {
    Some(score) => format!("{:>5.1}%", score * 100.0),
    None => "    ?".to_string(),
  }
}

/// Numbered result list, 1-based like the `--company N` flags.
pub fn search_results(results: &[SearchResult]) -> String {
  let mut out = String::new();
  for (i, result) in results.iter().enumerate() {
    let lei = if result.has_record() {
      result.lei.cyan().to_string()
    } else {
      "no LEI record".dimmed().to_string()
    };
    out.push_str(&format!(
      "{:>2}. {} {}  {}\n",
      i + 1,
      score_label(result).yellow(),
      result.entity.bold(),
      lei
    ));
  }
  out
}

fn address_line(address: &Address) -> String {
  [
    address.first_address_line.as_str(),
    address.city.as_str(),
    address.region.as_str(),
    address.postal_code.as_str(),
    address.country.as_str(),
  ]
  .iter()
  .filter(|part| !part.trim().is_empty())
  .copied()
  .collect::<Vec<_>>()
  .join(", ")
}

fn field(out: &mut String, label: &str, value: &str) {
  if value.trim().is_empty() {
    return;
  }
  out.push_str(&format!("  {:<18} {}\n", format!("{label}:").dimmed(), value));
}

pub fn company_card(record: &CompanyRecord) -> String {
  let mut out = format!("=== {} ===\n", record.legal_name.blue().bold());
  field(&mut out, "LEI", &record.lei);
  field(&mut out, "Status", &record.status);
  field(&mut out, "Legal form", &record.legal_form);
  field(&mut out, "Created", &record.creation_date);
  field(&mut out, "Jurisdiction", &record.registration.country);
  field(&mut out, "Registered", &record.registration.date);
  field(&mut out, "Registration", &record.registration.status);
  field(&mut out, "Legal address", &address_line(&record.addresses.legal));
  field(&mut out, "Headquarters", &address_line(&record.addresses.headquarters));
  field(&mut out, "LEI issued", &record.lei_registration.initial_date);
  field(&mut out, "Last update", &record.lei_registration.last_update);
  field(&mut out, "Next renewal", &record.lei_registration.next_renewal);
  field(&mut out, "Managing LOU", &record.lei_registration.managing_lou);
  out
}

/// Textual stand-in for the interactive map.
pub fn map_summary(projection: &GeoProjection) -> String {
  let mut out = String::new();

  match &projection.root {
    Some(root) => out.push_str(&format!("Root: {}\n", root.green().bold())),
    None => out.push_str(&format!("{}\n", "No root entity in this hierarchy".yellow())),
  }

  for marker in &projection.markers {
    let position = if marker.position.is_sentinel() {
      "unplaced".dimmed().to_string()
    } else {
      format!("{:>8.3}, {:>8.3}", marker.position.lat, marker.position.lon)
    };
    let star = if marker.is_root { "*".green().to_string() } else { " ".to_string() };
    out.push_str(&format!("{star} {:<30} {:<3} {}\n", marker.name, marker.country, position));
  }

  out.push_str(&format!("{} edges\n", projection.edges.len()));
  if let Some(b) = &projection.bounds {
    out.push_str(&format!(
      "Bounds: {:.3},{:.3} .. {:.3},{:.3}\n",
      b.south, b.west, b.north, b.east
    ));
  }

  let unplaced = projection.unpositioned().count();
  if unplaced > 0 {
    out.push_str(&format!("{}\n", format!("{unplaced} entities could not be geolocated").yellow()));
  }
  out
}

/// One block per target; `>` marks the current selection.
pub fn bulk_table(bulk: &BulkState) -> String {
  let mut out = String::new();
  for row in bulk.rows() {
    out.push_str(&format!("{}\n", row.target.blue().bold()));
    if row.matches.is_empty() {
      out.push_str(&format!("     {}\n", "no matches".dimmed()));
      continue;
    }
    for (i, candidate) in row.matches.iter().enumerate() {
      let marker = if bulk.is_selected(&row.target, candidate) { ">".green().to_string() } else { " ".to_string() };
      out.push_str(&format!(
        "  {marker}{:>2}. {} {}  {}\n",
        i + 1,
        score_label(candidate).yellow(),
        candidate.entity,
        candidate.lei.cyan()
      ));
    }
  }
  out
}

pub fn pairings(pairings: &[PersistedPairing], selected: Option<&str>) -> String {
  if pairings.is_empty() {
    return "No saved pairings.\n".to_string();
  }

  let mut out = String::new();
  for pairing in pairings {
    let marker = if Some(pairing.lei()) == selected { ">".green().to_string() } else { " ".to_string() };
    let target = pairing.target.as_deref().unwrap_or("-");
    out.push_str(&format!(
      "{marker} {:<24} {} {}\n",
      target,
      pairing.entity().bold(),
      pairing.lei().cyan()
    ));
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::geo::{LatLon, Marker};
  use crate::types::{BulkRow, LEI_NOT_FOUND};

  fn plain() {
    colored::control::set_override(false);
  }

  #[test]
  fn test_progress_line_fill() {
    plain();
    let line = progress_line(&Progress { loading: true, message: "Working".into(), percent: 50 });
    assert_eq!(line, "[##########----------]  50% Working");
  }

  #[test]
  fn test_search_results_numbering_and_sentinel() {
    plain();
    let results = vec![
      SearchResult { entity: "Apple Inc.".into(), lei: "HWUPKR0MPOU8FGXBT394".into(), score: Some(0.912) },
      SearchResult { entity: "Apple Ghost".into(), lei: LEI_NOT_FOUND.into(), score: None },
    ];
    let out = search_results(&results);
    let lines: Vec<_> = out.lines().collect();
    assert!(lines[0].starts_with(" 1.  91.2% Apple Inc."));
    assert!(lines[1].contains("no LEI record"));
  }

  #[test]
  fn test_company_card_skips_blank_fields() {
    plain();
    let mut record = CompanyRecord { lei: "L1".into(), legal_name: "Example AG".into(), ..Default::default() };
    record.addresses.legal.city = "Berlin".into();
    record.addresses.legal.country = "DE".into();
    let card = company_card(&record);
    assert!(card.contains("Berlin, DE"));
    assert!(!card.contains("Managing LOU"));
  }

  #[test]
  fn test_map_summary_reports_unplaced() {
    plain();
    let projection = GeoProjection {
      markers: vec![Marker {
        lei: "X".into(),
        name: "Nowhere Ltd".into(),
        country: "".into(),
        position: LatLon::SENTINEL,
        is_root: false,
      }],
      ..Default::default()
    };
    let out = map_summary(&projection);
    assert!(out.contains("No root entity"));
    assert!(out.contains("1 entities could not be geolocated"));
  }

  #[test]
  fn test_bulk_table_placeholder_and_selection() {
    plain();
    let mut bulk = BulkState::new();
    bulk.load_rows(vec![
      BulkRow {
        target: "Apple".into(),
        matches: vec![SearchResult { entity: "Apple Inc.".into(), lei: "L1".into(), score: Some(0.9) }],
      },
      BulkRow { target: "3M".into(), matches: vec![] },
    ]);
    let out = bulk_table(&bulk);
    assert!(out.contains("  > 1."));
    assert!(out.contains("no matches"));
  }
}
