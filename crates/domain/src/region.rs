use serde::{Deserialize, Serialize};

/// Four-level geographic hierarchy used to scope content visibility.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RegionType {
    State,
    District,
    City,
    Locality,
}

impl RegionType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "State" => Some(RegionType::State),
            "District" => Some(RegionType::District),
            "City" => Some(RegionType::City),
            "Locality" => Some(RegionType::Locality),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RegionType::State => "State",
            RegionType::District => "District",
            RegionType::City => "City",
            RegionType::Locality => "Locality",
        }
    }
}

/// A reference into one of the four region collections. The collection is
/// part of the type, so an id can never be paired with the wrong level.
/// The id itself is not checked against a region directory.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "region_type")]
pub enum RegionRef {
    State { region_id: String },
    District { region_id: String },
    City { region_id: String },
    Locality { region_id: String },
}

impl RegionRef {
    pub fn new(region_type: RegionType, region_id: impl Into<String>) -> Self {
        let region_id = region_id.into();
        match region_type {
            RegionType::State => RegionRef::State { region_id },
            RegionType::District => RegionRef::District { region_id },
            RegionType::City => RegionRef::City { region_id },
            RegionType::Locality => RegionRef::Locality { region_id },
        }
    }

    pub fn region_id(&self) -> &str {
        match self {
            RegionRef::State { region_id }
            | RegionRef::District { region_id }
            | RegionRef::City { region_id }
            | RegionRef::Locality { region_id } => region_id,
        }
    }

    pub fn region_type(&self) -> RegionType {
        match self {
            RegionRef::State { .. } => RegionType::State,
            RegionRef::District { .. } => RegionType::District,
            RegionRef::City { .. } => RegionType::City,
            RegionRef::Locality { .. } => RegionType::Locality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_type_parse_accepts_only_the_four_levels() {
        assert_eq!(RegionType::parse("City"), Some(RegionType::City));
        assert_eq!(RegionType::parse("city"), None);
        assert_eq!(RegionType::parse("Country"), None);
    }

    #[test]
    fn region_ref_round_trips_through_json_with_type_tag() {
        let region = RegionRef::new(RegionType::Locality, "r-17");
        let value = serde_json::to_value(&region).expect("serialize");
        assert_eq!(value["region_type"], "Locality");
        assert_eq!(value["region_id"], "r-17");
        let back: RegionRef = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, region);
    }
}
