use chrono::NaiveDate;

/// Filters recognized across the dashboard screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    AssignorId,
    UserId,
    SiteId,
    StartDate,
    EndDate,
}

impl FilterKey {
    pub const ALL: [FilterKey; 5] = [
        FilterKey::AssignorId,
        FilterKey::UserId,
        FilterKey::SiteId,
        FilterKey::StartDate,
        FilterKey::EndDate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterKey::AssignorId => "assignorId",
            FilterKey::UserId => "userId",
            FilterKey::SiteId => "siteId",
            FilterKey::StartDate => "startDate",
            FilterKey::EndDate => "endDate",
        }
    }

    pub fn is_date(self) -> bool {
        matches!(self, FilterKey::StartDate | FilterKey::EndDate)
    }
}

/// Current filter values. Unset and blank values are equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSet {
    assignor_id: Option<String>,
    user_id: Option<String>,
    site_id: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, mostly for tests and one-shot queries.
    pub fn with(mut self, key: FilterKey, value: impl Into<String>) -> Self {
        self.set(key, Some(value.into()));
        self
    }

    pub fn get(&self, key: FilterKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    /// Stores `value` verbatim after trimming; blank strings clear the filter.
    pub fn set(&mut self, key: FilterKey, value: Option<String>) {
        let value = value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        *self.slot_mut(key) = value;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        FilterKey::ALL.iter().all(|key| self.get(*key).is_none())
    }

    fn slot(&self, key: FilterKey) -> &Option<String> {
        match key {
            FilterKey::AssignorId => &self.assignor_id,
            FilterKey::UserId => &self.user_id,
            FilterKey::SiteId => &self.site_id,
            FilterKey::StartDate => &self.start_date,
            FilterKey::EndDate => &self.end_date,
        }
    }

    fn slot_mut(&mut self, key: FilterKey) -> &mut Option<String> {
        match key {
            FilterKey::AssignorId => &mut self.assignor_id,
            FilterKey::UserId => &mut self.user_id,
            FilterKey::SiteId => &mut self.site_id,
            FilterKey::StartDate => &mut self.start_date,
            FilterKey::EndDate => &mut self.end_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized date {0:?}, expected YYYY-MM-DD or DD-MM-YYYY")]
pub struct InvalidDate(pub String);

const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";

/// Normalizes a date filter to the `YYYY-MM-DD` form the backend expects.
pub fn normalize_date(input: &str) -> Result<String, InvalidDate> {
    let trimmed = input.trim();
    [WIRE_DATE_FORMAT, DISPLAY_DATE_FORMAT]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .map(|date| date.format(WIRE_DATE_FORMAT).to_string())
        .ok_or_else(|| InvalidDate(input.to_string()))
}
