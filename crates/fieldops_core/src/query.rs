use std::fmt;

use url::form_urlencoded;

use crate::{FilterKey, FilterSet};

/// Query parameter name the backend uses for the site filter on a given screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SiteIdParam {
    #[default]
    PmSiteId,
    SiteId,
}

impl SiteIdParam {
    pub fn as_str(self) -> &'static str {
        match self {
            SiteIdParam::PmSiteId => "PMSiteId",
            SiteIdParam::SiteId => "siteId",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: u64,
}

impl PageRequest {
    /// `limit` is clamped to at least one row.
    pub fn new(offset: u64, limit: u64) -> Self {
        Self {
            offset,
            limit: limit.max(1),
        }
    }

    pub fn from_page(page_index: u64, page_size: u64) -> Self {
        let limit = page_size.max(1);
        Self::new(page_index.saturating_mul(limit), limit)
    }
}

/// Path plus ordered query parameters for one list request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestDescriptor {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The `offset`/`limit` pair, if both are present and numeric.
    pub fn page(&self) -> Option<PageRequest> {
        let offset = self.param("offset")?.parse().ok()?;
        let limit = self.param("limit")?.parse().ok()?;
        Some(PageRequest::new(offset, limit))
    }

    /// Same request minus `offset` and `limit`, for endpoints that return every row.
    pub fn without_paging(&self) -> RequestDescriptor {
        RequestDescriptor {
            path: self.path.clone(),
            query: self
                .query
                .iter()
                .filter(|(k, _)| k != "offset" && k != "limit")
                .cloned()
                .collect(),
        }
    }

    /// Renders `path?k=v&...` with form-encoded values.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish();
        format!("{}?{}", self.path, encoded)
    }
}

impl fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path_and_query())
    }
}

/// Per-screen request composition. Pure: identical inputs give identical descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBuilder {
    base_path: String,
    site_id_param: SiteIdParam,
}

impl QueryBuilder {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            site_id_param: SiteIdParam::default(),
        }
    }

    pub fn with_site_id_param(mut self, param: SiteIdParam) -> Self {
        self.site_id_param = param;
        self
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Dates must already be `YYYY-MM-DD`; nothing is reformatted here.
    pub fn build(&self, filters: &FilterSet, page: PageRequest) -> RequestDescriptor {
        let mut query = vec![
            ("offset".to_string(), page.offset.to_string()),
            ("limit".to_string(), page.limit.to_string()),
        ];

        let ordered = [
            ("assignedBy", FilterKey::AssignorId),
            (self.site_id_param.as_str(), FilterKey::SiteId),
            ("startDate", FilterKey::StartDate),
            ("endDate", FilterKey::EndDate),
            ("userId", FilterKey::UserId),
        ];
        for (param, key) in ordered {
            if let Some(value) = filters.get(key) {
                query.push((param.to_string(), value.to_string()));
            }
        }

        RequestDescriptor {
            path: self.base_path.clone(),
            query,
        }
    }
}

/// Builds a descriptor with the default (`PMSiteId`) site parameter.
pub fn build(base_path: &str, filters: &FilterSet, page: PageRequest) -> RequestDescriptor {
    QueryBuilder::new(base_path).build(filters, page)
}
