//! Overpass QL query text for nearby and name searches.

use crate::category::Category;
use crate::geo::GeoPoint;

const ELEMENT_TYPES: [&str; 3] = ["node", "way", "relation"];

/// Union of every category selector around `center`.
///
/// Ways and relations are asked for with `out center` so they come back with
/// a representative point.
pub(crate) fn nearby_query(
    categories: &[&Category],
    center: GeoPoint,
    radius_m: u32,
    timeout_secs: u32,
) -> String {
    let around = around_filter(center, radius_m);
    let selectors: Vec<&str> = categories
        .iter()
        .map(|c| c.query)
        .filter(|q| !q.is_empty())
        .collect();
    wrap(&union_lines(&selectors, &around), timeout_secs)
}

/// Case-insensitive substring match of `text` against any `name` / `name:xx` tag.
pub(crate) fn name_search_query(
    text: &str,
    center: GeoPoint,
    radius_m: u32,
    timeout_secs: u32,
) -> String {
    let pattern = escape_quoted(&regex::escape(text.trim()));
    let selector = format!("[~\"^name(:[a-z]+)?$\"~\"{pattern}\",i]");
    let around = around_filter(center, radius_m);
    wrap(&union_lines(&[selector.as_str()], &around), timeout_secs)
}

fn around_filter(center: GeoPoint, radius_m: u32) -> String {
    format!("(around:{radius_m},{},{})", center.lat, center.lng)
}

fn union_lines(selectors: &[&str], around: &str) -> Vec<String> {
    let mut lines = Vec::with_capacity(selectors.len() * ELEMENT_TYPES.len());
    for selector in selectors {
        for element_type in ELEMENT_TYPES {
            lines.push(format!("  {element_type}{selector}{around};"));
        }
    }
    lines
}

fn wrap(lines: &[String], timeout_secs: u32) -> String {
    format!(
        "[out:json][timeout:{}];\n(\n{}\n);\nout center tags;",
        timeout_secs.max(1),
        lines.join("\n")
    )
}

fn escape_quoted(raw: &str) -> String {
    raw.replace('\\', r"\\").replace('"', "\\\"")
}
