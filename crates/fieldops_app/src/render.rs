//! Plain-text rendering of list view models.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use fieldops_client::{Assignor, User, WorkAssignment};
use fieldops_core::{FilterKey, ListViewModel};

const EMPTY_CELL: &str = "-";
const DAY_FORMAT: &str = "%d-%m-%Y";

/// A row type the table renderer knows how to lay out.
pub trait TableRow {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

impl TableRow for Assignor {
    fn headers() -> &'static [&'static str] {
        &["ID", "Assignor", "Created"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.assignor_id.clone(),
            self.assignor.clone(),
            day(self.created_at),
        ]
    }
}

impl TableRow for User {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Phone", "Device", "Created"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.user_id.clone(),
            self.user_name.clone(),
            text(&self.phone_number),
            text(&self.device_id),
            day(self.created_at),
        ]
    }
}

impl TableRow for WorkAssignment {
    fn headers() -> &'static [&'static str] {
        &[
            "ID", "Date", "Assignor", "Employee", "Client", "Activity", "Site", "Lat/Long",
            "Remarks", "Images", "PM Site",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.assignment_id.clone(),
            day(self.created_at),
            self.assignor_name().unwrap_or(EMPTY_CELL).to_string(),
            text(&self.name),
            text(&self.client_name),
            text(&self.activity),
            text(&self.site_id),
            coordinates(self),
            text(&self.remarks),
            self.gallery_images.len().to_string(),
            text(&self.pm_site_id),
        ]
    }
}

/// Lists the gallery of one assignment, one URI per line.
pub fn render_images(row: &WorkAssignment) -> String {
    let mut out = format!("Images for {}", row.assignment_id);
    if let Some(site) = row.site_id.as_deref().filter(|s| !s.trim().is_empty()) {
        let _ = write!(out, " (site {site})");
    }
    out.push_str(":\n");
    if row.gallery_images.is_empty() {
        out.push_str("No images.\n");
    }
    for (n, uri) in row.gallery_images.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {}", n + 1, uri);
    }
    out
}

/// Renders the visible page: active filters, the table and a paging footer.
pub fn render_page<T: TableRow>(view: &ListViewModel<T>) -> String {
    let mut out = String::new();

    let active: Vec<String> = FilterKey::ALL
        .iter()
        .filter_map(|key| view.filters.get(*key).map(|v| format!("{}={}", key.name(), v)))
        .collect();
    if !active.is_empty() {
        let _ = writeln!(out, "Filters: {}", active.join(", "));
    }

    if view.items.is_empty() {
        out.push_str("No records found.\n");
    } else {
        let rows: Vec<Vec<String>> = view.items.iter().map(T::cells).collect();
        out.push_str(&table(T::headers(), &rows));
    }

    match view.visible_range() {
        Some((first, last)) => {
            let _ = writeln!(
                out,
                "Showing {}-{} of {} (page {} of {})",
                first,
                last,
                view.total_count,
                view.page_index + 1,
                view.page_count
            );
        }
        None => {
            let _ = writeln!(out, "Page {} of {}", view.page_index + 1, view.page_count);
        }
    }
    out
}

fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}

fn text(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(EMPTY_CELL)
        .to_string()
}

fn coordinates(row: &WorkAssignment) -> String {
    match (text(&row.latitude), text(&row.longitude)) {
        (lat, long) if lat == EMPTY_CELL || long == EMPTY_CELL => EMPTY_CELL.to_string(),
        (lat, long) => format!("{lat}, {long}"),
    }
}

fn day(at: Option<DateTime<Utc>>) -> String {
    at.map(|at| at.format(DAY_FORMAT).to_string())
        .unwrap_or_else(|| EMPTY_CELL.to_string())
}
