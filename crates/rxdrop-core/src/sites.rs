use serde::{Deserialize, Serialize};

/// One pharmaceutical disposal site as listed on a search-results page.
///
/// Every field is free-form text copied from the page. Missing values are
/// empty strings rather than `None` so the serialized shape is stable for
/// API consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteRecord {
    pub name: String,
    pub address1: String,
    pub address2: String,
    /// `"City, ST ZIP"` as printed by the source.
    pub city_state_zip: String,
    /// Distance from the searched ZIP, e.g. `"2.3 miles"`.
    pub distance: String,
    /// Map link target; empty unless the page exposed one.
    pub map_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_field_names() {
        let record = SiteRecord {
            name: "ABC Pharmacy".to_string(),
            address1: "123 Main St".to_string(),
            address2: String::new(),
            city_state_zip: "Oklahoma City, OK 73120".to_string(),
            distance: "2.3 miles".to_string(),
            map_url: "http://maps/x".to_string(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["cityStateZip"], "Oklahoma City, OK 73120");
        assert_eq!(value["mapUrl"], "http://maps/x");
        assert_eq!(value["address2"], "");
    }
}
