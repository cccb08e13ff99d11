//! Filtering and aggregation over the in-memory lead list.
//!
//! Every function here is a pure function of its inputs, so the dashboard's
//! derived views can be tested without any view layer.

pub mod collation;
pub mod model;

use std::collections::{BTreeSet, HashMap};

use crate::lead::Lead;
pub use collation::{compare_pt_br, sort_pt_br};
pub use model::{DashboardCounts, LeadFilter, SegmentCount, SegmentSummary};

/// Leads matching `filter`, in their original order.
pub fn filter_leads<'a>(leads: &'a [Lead], filter: &LeadFilter) -> Vec<&'a Lead> {
    leads.iter().filter(|lead| filter.matches(lead)).collect()
}

/// Distinct, trimmed, non-empty city names in pt-BR order.
pub fn distinct_cities(leads: &[Lead]) -> Vec<String> {
    let unique: BTreeSet<&str> = leads.iter().filter_map(Lead::city_key).collect();
    let mut cities: Vec<String> = unique.into_iter().map(str::to_string).collect();
    sort_pt_br(&mut cities);
    cities
}

/// Segment counts for the leads of `city`.
///
/// Leads with a blank segment are left out, so `total()` counts only
/// segmented leads.
pub fn segment_summary(leads: &[Lead], city: &str) -> SegmentSummary {
    let in_city = LeadFilter::new().with_city(city);
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for lead in leads.iter().filter(|lead| in_city.matches_city(lead)) {
        if let Some(segment) = lead.segment_key() {
            *counts.entry(segment).or_insert(0) += 1;
        }
    }

    let mut segments: Vec<SegmentCount> = counts
        .into_iter()
        .map(|(name, count)| SegmentCount::new(name, count))
        .collect();
    segments.sort_by(|a, b| compare_pt_br(&a.name, &b.name));

    SegmentSummary { segments }
}

/// Totals for the sidebar: every lead, then each city in `cities` order.
pub fn dashboard_counts(leads: &[Lead], cities: &[String]) -> DashboardCounts {
    let per_city = cities
        .iter()
        .map(|city| {
            let in_city = LeadFilter::new().with_city(city.as_str());
            let count = leads.iter().filter(|lead| in_city.matches_city(lead)).count();
            (city.clone(), count)
        })
        .collect();

    DashboardCounts {
        total: leads.len(),
        per_city,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Vec<Lead> {
        vec![
            Lead::new("1", "1111")
                .with_city("São Paulo")
                .with_segment("Pet")
                .with_name("A"),
            Lead::new("2", "2222")
                .with_city("São Paulo")
                .with_segment("Food")
                .with_name("B"),
            Lead::new("3", "3333")
                .with_city("Rio")
                .with_segment("Pet")
                .with_name("C"),
        ]
    }

    fn ids(leads: &[&Lead]) -> Vec<String> {
        leads.iter().map(|l| l.id.clone()).collect()
    }

    #[test]
    fn test_pass_through_filter_keeps_everything_in_order() {
        let leads = scenario();
        let filter = LeadFilter::new();
        assert!(filter.is_pass_through());
        assert_eq!(ids(&filter_leads(&leads, &filter)), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_city_filter_is_trimmed_and_case_insensitive() {
        let mut leads = scenario();
        leads[2].city = Some("  são paulo ".to_string());

        let filter = LeadFilter::new().with_city("SÃO PAULO");
        assert_eq!(ids(&filter_leads(&leads, &filter)), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_segment_filter_applies_without_city() {
        let leads = scenario();
        let filter = LeadFilter::new().with_segment("pet");
        assert_eq!(ids(&filter_leads(&leads, &filter)), vec!["1", "3"]);
    }

    #[test]
    fn test_city_and_segment_intersect() {
        let leads = scenario();
        let filter = LeadFilter::new().with_city("São Paulo").with_segment("Pet");
        assert_eq!(ids(&filter_leads(&leads, &filter)), vec!["1"]);
    }

    #[test]
    fn test_search_hits_contain_term_in_a_searchable_field() {
        let leads = vec![
            Lead::new("1", "(81) 3333-0001").with_name("Pet Center"),
            Lead::new("2", "(81) 3333-0002").with_email("CONTATO@PETLOVE.COM"),
            Lead::new("3", "(81) 3333-0003").with_neighborhood("Boa Viagem"),
            Lead::new("4", "(81) 3333-0004").with_segment("Petshop"),
            Lead::new("5", "(81) 3333-0005").with_name("Padaria"),
            Lead::new("6", "(81) 3333-0006").with_website("pet.com"),
        ];

        let filter = LeadFilter::new().with_search("PET");
        let hits = filter_leads(&leads, &filter);
        assert_eq!(ids(&hits), vec!["1", "2", "4"]);

        for lead in hits {
            let fields = [
                lead.name.clone(),
                Some(lead.phone.clone()),
                lead.email.clone(),
                lead.segment.clone(),
                lead.neighborhood.clone(),
            ];
            assert!(
                fields
                    .iter()
                    .flatten()
                    .any(|f| f.to_lowercase().contains("pet"))
            );
        }
    }

    #[test]
    fn test_search_matches_phone_digits() {
        let leads = scenario();
        let filter = LeadFilter::new().with_search("222");
        assert_eq!(ids(&filter_leads(&leads, &filter)), vec!["2"]);
    }

    #[test]
    fn test_segment_summary_for_selected_city() {
        let leads = scenario();
        let summary = segment_summary(&leads, "São Paulo");
        assert_eq!(
            summary.segments,
            vec![SegmentCount::new("Food", 1), SegmentCount::new("Pet", 1)]
        );
        assert_eq!(summary.total(), 2);
    }

    #[test]
    fn test_segment_summary_skips_blank_segments() {
        let mut leads = scenario();
        leads.push(Lead::new("4", "4444").with_city("São Paulo").with_segment("  "));
        leads.push(Lead::new("5", "5555").with_city("São Paulo").with_segment(" Pet "));

        let summary = segment_summary(&leads, "são paulo");
        assert_eq!(
            summary.segments,
            vec![SegmentCount::new("Food", 1), SegmentCount::new("Pet", 2)]
        );
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn test_distinct_cities_are_unique_and_collated() {
        let leads = vec![
            Lead::new("1", "0").with_city("Recife "),
            Lead::new("2", "0").with_city("Águas Claras"),
            Lead::new("3", "0").with_city(" Recife"),
            Lead::new("4", "0").with_city("Belém"),
            Lead::new("5", "0"),
            Lead::new("6", "0").with_city(""),
            Lead::new("7", "0").with_city("Aracaju"),
        ];

        assert_eq!(
            distinct_cities(&leads),
            vec!["Águas Claras", "Aracaju", "Belém", "Recife"]
        );
    }

    #[test]
    fn test_dashboard_counts() {
        let leads = scenario();
        let cities = distinct_cities(&leads);
        let counts = dashboard_counts(&leads, &cities);
        assert_eq!(counts.total, 3);
        assert_eq!(
            counts.per_city,
            vec![("Rio".to_string(), 1), ("São Paulo".to_string(), 2)]
        );
    }
}
