//! Filter state and aggregation result types.

use serde::{Deserialize, Serialize};

use crate::lead::Lead;

/// What the dashboard is currently narrowed to.
///
/// `city` and `segment` are single optional values; `search` is the raw
/// text typed by the user and is matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadFilter {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub segment: Option<String>,
    #[serde(default)]
    pub search: String,
}

impl LeadFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// True when no predicate narrows the list.
    pub fn is_pass_through(&self) -> bool {
        self.city.is_none() && self.segment.is_none() && self.search.is_empty()
    }

    /// Intersection of the city, segment and free-text predicates.
    pub fn matches(&self, lead: &Lead) -> bool {
        self.matches_city(lead) && self.matches_segment(lead) && self.matches_search(lead)
    }

    pub fn matches_city(&self, lead: &Lead) -> bool {
        match &self.city {
            Some(city) => eq_trimmed_ignore_case(lead.city.as_deref(), city),
            None => true,
        }
    }

    pub fn matches_segment(&self, lead: &Lead) -> bool {
        match &self.segment {
            Some(segment) => eq_trimmed_ignore_case(lead.segment.as_deref(), segment),
            None => true,
        }
    }

    /// Substring match against name, phone, email, segment and neighborhood.
    pub fn matches_search(&self, lead: &Lead) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        let contains = |field: Option<&str>| {
            field.is_some_and(|value| value.to_lowercase().contains(&needle))
        };

        contains(lead.name.as_deref())
            || contains(Some(lead.phone.as_str()))
            || contains(lead.email.as_deref())
            || contains(lead.segment.as_deref())
            || contains(lead.neighborhood.as_deref())
    }
}

fn eq_trimmed_ignore_case(value: Option<&str>, expected: &str) -> bool {
    value.is_some_and(|v| v.trim().to_lowercase() == expected.trim().to_lowercase())
}

/// Number of leads carrying one segment name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentCount {
    pub name: String,
    pub count: usize,
}

impl SegmentCount {
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Segment breakdown of one city.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSummary {
    /// Segments sorted alphabetically (pt-BR)
    pub segments: Vec<SegmentCount>,
}

impl SegmentSummary {
    /// The "all segments" entry: sum of every segment count.
    pub fn total(&self) -> usize {
        self.segments.iter().map(|s| s.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Sidebar counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardCounts {
    /// Every loaded lead
    pub total: usize,
    /// Leads per city, in city-list order
    pub per_city: Vec<(String, usize)>,
}
