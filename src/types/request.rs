#![allow(
    clippy::module_name_repetitions,
    reason = "Request suffix is intentional for clarity"
)]

use bon::Builder;
use serde::Serialize;
use serde_with::{Map, serde_as, skip_serializing_none};

use crate::query::Query;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Parameters of a `findAll` call.
///
/// `filters` is sent as nested bracket parameters, so operators are expressed as nested
/// objects, e.g. `{"payout": {"GREATER_THAN": 1}}`.
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Builder, Default, Serialize)]
#[non_exhaustive]
pub struct FindAllRequest {
    pub filters: Option<Query>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub fields: Vec<String>,
    /// Sort keys in priority order
    #[serde_as(as = "Map<_, _>")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub sort: Vec<(String, SortDirection)>,
    /// Related models to include with each record
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub contain: Vec<String>,
}

/// Parameters of a `Report.getStats` call.
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Builder, Default, Serialize)]
#[non_exhaustive]
pub struct StatsRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub groups: Vec<String>,
    pub filters: Option<Query>,
    #[serde_as(as = "Map<_, _>")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub sort: Vec<(String, SortDirection)>,
    /// First day of the report, `YYYY-MM-DD`
    #[builder(into)]
    pub data_start: Option<String>,
    /// Last day of the report, `YYYY-MM-DD`
    #[builder(into)]
    pub data_end: Option<String>,
    pub totals: Option<bool>,
    pub hour_offset: Option<i32>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::query::ToQuery as _;

    #[test]
    fn default_find_all_request_is_empty() {
        let query = FindAllRequest::default().to_query().expect("object");

        assert!(query.is_empty());
    }

    #[test]
    fn find_all_request_serializes_in_bracket_notation() {
        let request = FindAllRequest::builder()
            .filters(Query::new().with("status", "active"))
            .fields(vec!["id".to_owned(), "name".to_owned()])
            .sort(vec![
                ("name".to_owned(), SortDirection::Asc),
                ("id".to_owned(), SortDirection::Desc),
            ])
            .build();

        assert_eq!(
            request.to_query().expect("object").to_query_string(),
            "filters[status]=active&fields[0]=id&fields[1]=name&sort[name]=asc&sort[id]=desc"
        );
    }

    #[test]
    fn stats_request_skips_unset_fields() {
        let request = StatsRequest::builder()
            .fields(vec!["Stat.clicks".to_owned(), "Stat.conversions".to_owned()])
            .groups(vec!["Stat.offer_id".to_owned()])
            .data_start("2024-01-01")
            .data_end("2024-01-31")
            .totals(true)
            .build();

        let query = request.to_query().expect("object");

        assert_eq!(query.get("filters"), None);
        assert_eq!(query.get("hour_offset"), None);
        assert_eq!(query.get("totals"), Some(&json!(true)));
        assert_eq!(
            query.to_query_string(),
            "fields[0]=Stat.clicks&fields[1]=Stat.conversions&groups[0]=Stat.offer_id\
             &data_start=2024-01-01&data_end=2024-01-31&totals=1"
        );
    }
}
