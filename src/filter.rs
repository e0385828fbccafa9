use crate::record::{Dataset, Record};
use serde::Serialize;
use std::collections::BTreeSet;

/// Label of the visit option that keeps every record.
pub const VISIT_ALL: &str = "All";
/// Label of the visit option that keeps records nobody visited.
pub const VISIT_NOT_VISITED: &str = "Not Visited";

/// Cities the user has selected.
pub type CityFilter = BTreeSet<String>;

/// Visit-status choice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "mode", content = "name")]
pub enum VisitFilter {
    #[default]
    All,
    NotVisited,
    /// Records whose "Visited By" text contains this name
    Visitor(String),
}

impl VisitFilter {
    /// Map a selector label to a filter. An empty label means `All`;
    /// anything other than the two fixed labels names a visitor.
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "" => VisitFilter::All,
            VISIT_ALL => VisitFilter::All,
            VISIT_NOT_VISITED => VisitFilter::NotVisited,
            name => VisitFilter::Visitor(name.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            VisitFilter::All => VISIT_ALL,
            VisitFilter::NotVisited => VISIT_NOT_VISITED,
            VisitFilter::Visitor(name) => name,
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            VisitFilter::All => true,
            VisitFilter::NotVisited => !record.is_visited(),
            VisitFilter::Visitor(name) => record
                .visited_by
                .as_deref()
                .is_some_and(|v| v.contains(name.as_str())),
        }
    }
}

/// Options for the visit selector: the two fixed labels followed by every
/// distinct visitor value in the dataset.
pub fn visit_options(dataset: &Dataset) -> Vec<String> {
    let mut options = vec![VISIT_ALL.to_string(), VISIT_NOT_VISITED.to_string()];
    options.extend(dataset.visitors());
    options
}

/// Keep records whose city is selected and that pass the visit filter.
///
/// An empty city selection keeps nothing. Input order is preserved.
pub fn filter(dataset: &Dataset, cities: &CityFilter, visit: &VisitFilter) -> Dataset {
    dataset
        .iter()
        .filter(|r| cities.contains(&r.city) && visit.matches(r))
        .cloned()
        .collect()
}
