//! CSV import of work areas into a plan.
//!
//! The importer validates every row, collecting line-numbered errors
//! instead of failing fast, and only inserts when the whole file is
//! clean. Errors are reported grouped by message so a file with the same
//! mistake on two hundred lines reads as one message with two hundred
//! line numbers.

use crate::error::{BackendError, Result};
use log::debug;
use microplan_core::{GroupId, Plan, WorkAreaDraft, WorkAreaStatus};
use microplan_geo::{parse_point, parse_polygon, GeoError};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Column headers the import file must carry, in template order.
pub const REQUIRED_HEADERS: [&str; 8] = [
    "Work Area Group Name",
    "Area Slug",
    "Ward",
    "Centroid",
    "Boundary",
    "Building Count",
    "Expected Visit Count",
    "Status",
];

/// Sample row written into the downloadable template.
const SAMPLE_ROW: [&str; 8] = [
    "",
    "Work-Area-1",
    "Demo Ward",
    "POINT(77.1 28.6)",
    "POLYGON((77 28,78 28,78 29,77 29,77 28))",
    "10",
    "12",
    "not_started",
];

/// Result of an import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ImportReport {
    /// Number of work areas created. Zero when any row errored.
    pub created: usize,
    /// Validation errors grouped by message: each message maps to the
    /// line numbers it occurred on (header is line 1, first data row 2).
    pub errors: BTreeMap<String, Vec<u64>>,
}

impl ImportReport {
    /// True when the import ran without validation errors.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Render the import template: the header row plus one sample row.
///
/// # Errors
///
/// Returns [`BackendError::Csv`] if CSV encoding fails, which does not
/// happen for the fixed template content.
pub fn csv_template() -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REQUIRED_HEADERS)?;
    writer.write_record(SAMPLE_ROW)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| BackendError::Io(std::io::Error::other(e.to_string())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Validating CSV importer for one plan.
///
/// Rows pass through a chain of field processors (slug, ward, geometry,
/// counts, status, group); every processor records its own errors so a
/// bad row reports all of its problems at once.
pub struct WorkAreaCsvImporter<'a> {
    plan: &'a mut Plan,
    errors: Vec<(u64, String)>,
    seen_slugs: HashSet<String>,
}

impl<'a> WorkAreaCsvImporter<'a> {
    /// Create an importer targeting `plan`.
    pub fn new(plan: &'a mut Plan) -> Self {
        Self {
            plan,
            errors: Vec::new(),
            seen_slugs: HashSet::new(),
        }
    }

    /// Parse and validate `csv_content`, inserting all rows if and only
    /// if every row is valid.
    ///
    /// # Errors
    ///
    /// Returns an error for structural failures (unreadable CSV); row
    /// validation problems land in the [`ImportReport`] instead.
    pub fn run(mut self, csv_content: &str) -> Result<ImportReport> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(csv_content.as_bytes());

        let headers = reader.headers()?.clone();
        let columns: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.trim().to_string(), idx))
            .collect();

        let mut missing: Vec<&str> = REQUIRED_HEADERS
            .iter()
            .copied()
            .filter(|name| !columns.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            self.error(1, &format!("Missing columns: {}", missing.join(", ")));
            return Ok(self.report(0));
        }

        let mut drafts = Vec::new();
        for (row_idx, record) in reader.records().enumerate() {
            let line = row_idx as u64 + 2;
            let record = record?;
            if let Some(draft) = self.process_row(line, &record, &columns) {
                drafts.push(draft);
            }
        }

        if !self.errors.is_empty() {
            return Ok(self.report(0));
        }

        let created = drafts.len();
        for draft in drafts {
            self.plan.add_area(draft)?;
        }
        debug!("imported {created} work areas");
        Ok(self.report(created))
    }

    fn process_row(
        &mut self,
        line: u64,
        record: &csv::StringRecord,
        columns: &HashMap<String, usize>,
    ) -> Option<WorkAreaDraft> {
        let get = |name: &str| -> &str {
            columns
                .get(name)
                .and_then(|&idx| record.get(idx))
                .unwrap_or("")
                .trim()
        };

        // Run every processor so one row reports all of its problems.
        let slug = self.process_slug(line, get("Area Slug"));
        let ward = self.process_ward(line, get("Ward"));
        let geometry = self.process_geometry(line, get("Centroid"), get("Boundary"));
        let counts = self.process_counts(line, get("Building Count"), get("Expected Visit Count"));
        let status = self.process_status(line, get("Status"));
        let group = self.process_group(line, get("Work Area Group Name"), ward.as_deref());

        let (centroid, boundary) = geometry?;
        let (building_count, expected_visit_count) = counts?;
        Some(WorkAreaDraft {
            slug: slug?,
            ward: ward?,
            centroid,
            boundary,
            building_count,
            expected_visit_count,
            status: status?,
            group: group?,
        })
    }

    fn process_slug(&mut self, line: u64, raw: &str) -> Option<String> {
        if raw.is_empty() {
            self.error(line, "Area slug is required.");
            return None;
        }
        if self.seen_slugs.contains(raw) {
            self.error(line, "Duplicate Area slug in file");
            return None;
        }
        if self.plan.area_by_slug(raw).is_some() {
            self.error(line, "Area slug already exists for this plan");
            return None;
        }
        self.seen_slugs.insert(raw.to_string());
        Some(raw.to_string())
    }

    fn process_ward(&mut self, line: u64, raw: &str) -> Option<String> {
        if raw.is_empty() {
            self.error(line, "Ward is required.");
            return None;
        }
        Some(raw.to_string())
    }

    fn process_geometry(
        &mut self,
        line: u64,
        centroid_raw: &str,
        boundary_raw: &str,
    ) -> Option<(geo::Point<f64>, geo::Polygon<f64>)> {
        if centroid_raw.is_empty() || boundary_raw.is_empty() {
            self.error(line, "Centroid and Boundary are required.");
            return None;
        }

        let centroid = match parse_point(centroid_raw) {
            Ok(point) => Some(point),
            Err(GeoError::NotAPoint(_)) => {
                self.error(line, "Centroid must be a POINT");
                None
            }
            Err(_) => {
                self.error(line, "Invalid WKT format for Centroid or Boundary");
                None
            }
        };

        let boundary = match parse_polygon(boundary_raw) {
            Ok(polygon) => Some(polygon),
            Err(GeoError::NotAPolygon(_)) => {
                self.error(line, "Boundary must be a POLYGON");
                None
            }
            Err(GeoError::InvalidPolygon(_)) => {
                self.error(line, "Invalid Boundary polygon geometry");
                None
            }
            Err(_) => {
                self.error(line, "Invalid WKT format for Centroid or Boundary");
                None
            }
        };

        Some((centroid?, boundary?))
    }

    fn process_counts(
        &mut self,
        line: u64,
        building_raw: &str,
        visit_raw: &str,
    ) -> Option<(u32, u32)> {
        let parse = |raw: &str| -> Option<i64> {
            if raw.is_empty() {
                Some(0)
            } else {
                raw.parse::<i64>().ok()
            }
        };

        let (Some(building), Some(visit)) = (parse(building_raw), parse(visit_raw)) else {
            self.error(line, "Building count and Expected visit count must be integers");
            return None;
        };
        if building < 0 || visit < 0 {
            self.error(line, "Building count and Expected visit count cannot be negative");
            return None;
        }
        match (u32::try_from(building), u32::try_from(visit)) {
            (Ok(building), Ok(visit)) => Some((building, visit)),
            _ => {
                self.error(line, "Building count and Expected visit count are out of range");
                None
            }
        }
    }

    fn process_status(&mut self, line: u64, raw: &str) -> Option<WorkAreaStatus> {
        if raw.is_empty() {
            return Some(WorkAreaStatus::default());
        }
        match raw.parse() {
            Ok(status) => Some(status),
            Err(_) => {
                self.error(line, "Invalid status value");
                None
            }
        }
    }

    fn process_group(
        &mut self,
        line: u64,
        raw: &str,
        ward: Option<&str>,
    ) -> Option<Option<GroupId>> {
        if raw.is_empty() {
            return Some(None);
        }
        let found = self
            .plan
            .group_by_name(raw)
            .map(|group| (group.id, group.ward.clone()));
        match found {
            None => {
                self.error(line, "Work Area Group name not found");
                None
            }
            Some((group_id, group_ward)) => {
                if ward.is_some_and(|w| w != group_ward) {
                    self.error(line, "Work area ward does not match its group ward");
                    return None;
                }
                Some(Some(group_id))
            }
        }
    }

    fn error(&mut self, line: u64, message: &str) {
        self.errors.push((line, message.to_string()));
    }

    fn report(self, created: usize) -> ImportReport {
        let mut errors: BTreeMap<String, Vec<u64>> = BTreeMap::new();
        for (line, message) in self.errors {
            let lines = errors.entry(message).or_default();
            if lines.last() != Some(&line) {
                lines.push(line);
            }
        }
        ImportReport { created, errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Work Area Group Name,Area Slug,Ward,Centroid,Boundary,Building Count,Expected Visit Count,Status";

    fn square_wkt(x: f64, y: f64, size: f64) -> String {
        format!(
            "\"POLYGON(({x} {y},{x2} {y},{x2} {y2},{x} {y2},{x} {y}))\"",
            x2 = x + size,
            y2 = y + size,
        )
    }

    fn row(slug: &str, ward: &str, x: f64, y: f64) -> String {
        format!(
            ",{slug},{ward},POINT({cx} {cy}),{boundary},50,10,",
            cx = x + 0.005,
            cy = y + 0.005,
            boundary = square_wkt(x, y, 0.01),
        )
    }

    #[test]
    fn test_template_round_trips_through_reader() {
        let template = csv_template().unwrap();
        let mut reader = csv::Reader::from_reader(template.as_bytes());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, REQUIRED_HEADERS);
        assert_eq!(reader.records().count(), 1);
    }

    #[test]
    fn test_import_creates_areas() {
        let mut plan = Plan::new(1);
        let content = format!(
            "{HEADER}\n{}\n{}\n",
            row("area-1", "ward-1", 77.0, 28.0),
            row("area-2", "ward-1", 77.01, 28.0),
        );

        let report = WorkAreaCsvImporter::new(&mut plan).run(&content).unwrap();

        assert!(report.is_ok(), "errors: {:?}", report.errors);
        assert_eq!(report.created, 2);
        assert_eq!(plan.areas.len(), 2);

        let area = plan.area_by_slug("area-1").unwrap();
        assert_eq!(area.ward, "ward-1");
        assert_eq!(area.building_count, 50);
        assert_eq!(area.expected_visit_count, 10);
        assert_eq!(area.status, WorkAreaStatus::NotStarted);
        assert!(area.group.is_none());
    }

    #[test]
    fn test_import_missing_columns() {
        let mut plan = Plan::new(1);
        let content = "Area Slug,Ward\narea-1,ward-1\n";

        let report = WorkAreaCsvImporter::new(&mut plan).run(content).unwrap();

        assert_eq!(report.created, 0);
        assert_eq!(report.errors.len(), 1);
        let (message, lines) = report.errors.iter().next().unwrap();
        assert!(message.starts_with("Missing columns: "));
        assert!(message.contains("Boundary"));
        assert!(message.contains("Centroid"));
        assert_eq!(lines, &vec![1]);
        assert!(plan.areas.is_empty());
    }

    #[test]
    fn test_import_duplicate_slug_in_file() {
        let mut plan = Plan::new(1);
        let content = format!(
            "{HEADER}\n{}\n{}\n",
            row("area-1", "ward-1", 77.0, 28.0),
            row("area-1", "ward-1", 77.01, 28.0),
        );

        let report = WorkAreaCsvImporter::new(&mut plan).run(&content).unwrap();

        assert_eq!(report.created, 0);
        assert_eq!(report.errors["Duplicate Area slug in file"], vec![3]);
        assert!(plan.areas.is_empty());
    }

    #[test]
    fn test_import_existing_slug_in_plan() {
        let mut plan = Plan::new(1);
        let seed = format!("{HEADER}\n{}\n", row("area-1", "ward-1", 77.0, 28.0));
        WorkAreaCsvImporter::new(&mut plan).run(&seed).unwrap();

        let content = format!("{HEADER}\n{}\n", row("area-1", "ward-1", 77.05, 28.0));
        let report = WorkAreaCsvImporter::new(&mut plan).run(&content).unwrap();

        assert_eq!(report.created, 0);
        assert_eq!(report.errors["Area slug already exists for this plan"], vec![2]);
    }

    #[test]
    fn test_import_invalid_geometry() {
        let mut plan = Plan::new(1);
        let content = format!(
            "{HEADER}\n,area-1,ward-1,POINT(nope),{},50,10,\n",
            square_wkt(77.0, 28.0, 0.01)
        );

        let report = WorkAreaCsvImporter::new(&mut plan).run(&content).unwrap();

        assert_eq!(report.created, 0);
        assert_eq!(
            report.errors["Invalid WKT format for Centroid or Boundary"],
            vec![2]
        );
    }

    #[test]
    fn test_import_swapped_geometry_types() {
        let mut plan = Plan::new(1);
        let content = format!(
            "{HEADER}\n,area-1,ward-1,{},POINT(77 28),50,10,\n",
            square_wkt(77.0, 28.0, 0.01)
        );

        let report = WorkAreaCsvImporter::new(&mut plan).run(&content).unwrap();

        assert!(report.errors.contains_key("Centroid must be a POINT"));
        assert!(report.errors.contains_key("Boundary must be a POLYGON"));
    }

    #[test]
    fn test_import_negative_counts() {
        let mut plan = Plan::new(1);
        let content = format!(
            "{HEADER}\n,area-1,ward-1,POINT(77.005 28.005),{},-5,10,\n",
            square_wkt(77.0, 28.0, 0.01)
        );

        let report = WorkAreaCsvImporter::new(&mut plan).run(&content).unwrap();

        assert_eq!(
            report.errors["Building count and Expected visit count cannot be negative"],
            vec![2]
        );
    }

    #[test]
    fn test_import_counts_default_to_zero() {
        let mut plan = Plan::new(1);
        let content = format!(
            "{HEADER}\n,area-1,ward-1,POINT(77.005 28.005),{},,,\n",
            square_wkt(77.0, 28.0, 0.01)
        );

        let report = WorkAreaCsvImporter::new(&mut plan).run(&content).unwrap();

        assert!(report.is_ok(), "errors: {:?}", report.errors);
        let area = plan.area_by_slug("area-1").unwrap();
        assert_eq!(area.building_count, 0);
        assert_eq!(area.expected_visit_count, 0);
    }

    #[test]
    fn test_import_invalid_status() {
        let mut plan = Plan::new(1);
        let content = format!(
            "{HEADER}\n,area-1,ward-1,POINT(77.005 28.005),{},50,10,bogus\n",
            square_wkt(77.0, 28.0, 0.01)
        );

        let report = WorkAreaCsvImporter::new(&mut plan).run(&content).unwrap();

        assert_eq!(report.errors["Invalid status value"], vec![2]);
    }

    #[test]
    fn test_import_with_existing_group() {
        let mut plan = Plan::new(1);
        plan.create_group("ward-1", "north-team");

        let content = format!(
            "{HEADER}\nnorth-team,area-1,ward-1,POINT(77.005 28.005),{},50,10,not_visited\n",
            square_wkt(77.0, 28.0, 0.01)
        );

        let report = WorkAreaCsvImporter::new(&mut plan).run(&content).unwrap();

        assert!(report.is_ok(), "errors: {:?}", report.errors);
        let area = plan.area_by_slug("area-1").unwrap();
        assert_eq!(area.status, WorkAreaStatus::NotVisited);
        let group = plan.group(area.group.unwrap()).unwrap();
        assert_eq!(group.name, "north-team");
    }

    #[test]
    fn test_import_unknown_group() {
        let mut plan = Plan::new(1);
        let content = format!(
            "{HEADER}\nno-such-team,area-1,ward-1,POINT(77.005 28.005),{},50,10,\n",
            square_wkt(77.0, 28.0, 0.01)
        );

        let report = WorkAreaCsvImporter::new(&mut plan).run(&content).unwrap();

        assert_eq!(report.errors["Work Area Group name not found"], vec![2]);
    }

    #[test]
    fn test_import_is_all_or_nothing() {
        let mut plan = Plan::new(1);
        let content = format!(
            "{HEADER}\n{}\n,,ward-1,POINT(77.005 28.005),{},50,10,\n",
            row("area-1", "ward-1", 77.0, 28.0),
            square_wkt(77.0, 28.0, 0.01),
        );

        let report = WorkAreaCsvImporter::new(&mut plan).run(&content).unwrap();

        assert_eq!(report.created, 0);
        assert_eq!(report.errors["Area slug is required."], vec![3]);
        assert!(plan.areas.is_empty());
    }

    #[test]
    fn test_errors_grouped_by_message_across_lines() {
        let mut plan = Plan::new(1);
        let content = format!(
            "{HEADER}\n,,ward-1,POINT(77.005 28.005),{b},50,10,\n,,ward-1,POINT(77.015 28.005),{b},50,10,\n",
            b = square_wkt(77.0, 28.0, 0.01),
        );

        let report = WorkAreaCsvImporter::new(&mut plan).run(&content).unwrap();

        assert_eq!(report.errors["Area slug is required."], vec![2, 3]);
    }
}
