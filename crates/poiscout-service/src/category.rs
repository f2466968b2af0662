//! Static POI category catalog and tag-based classification.
//!
//! Classification is an ordered rule table: the first rule whose tag
//! predicate matches decides the category, and list order is the tie-break
//! policy between rules.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::PoiError;

/// Id of the wildcard category that expands to every concrete category.
pub const ALL_CATEGORY_ID: &str = "all";

/// One entry of the fixed category catalog.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    /// Display name in the app's local language (Indonesian).
    pub name: &'static str,
    pub name_en: &'static str,
    pub icon: &'static str,
    /// Overpass tag selector(s) for this category; empty for the wildcard.
    pub query: &'static str,
    pub color: &'static str,
    /// Lower ranks sort first when two results are otherwise tied.
    pub priority: u8,
}

static ALL: Category = Category {
    id: ALL_CATEGORY_ID,
    name: "Semua",
    name_en: "All",
    icon: "apps",
    query: "",
    color: "#6C5CE7",
    priority: 0,
};

static RESTAURANT: Category = Category {
    id: "restaurant",
    name: "Restoran",
    name_en: "Restaurant",
    icon: "restaurant",
    query: r#"["amenity"~"^(restaurant|food_court|fast_food|cafe)$"]"#,
    color: "#FF6B6B",
    priority: 1,
};

static SCHOOL: Category = Category {
    id: "school",
    name: "Sekolah",
    name_en: "School",
    icon: "school",
    query: r#"["amenity"~"^(school|university|college|kindergarten)$"]"#,
    color: "#4ECDC4",
    priority: 2,
};

static HOSPITAL: Category = Category {
    id: "hospital",
    name: "Rumah Sakit",
    name_en: "Hospital",
    icon: "local-hospital",
    query: r#"["amenity"~"^(hospital|clinic|pharmacy|doctors)$"]"#,
    color: "#45B7D1",
    priority: 3,
};

static MOSQUE: Category = Category {
    id: "mosque",
    name: "Masjid",
    name_en: "Mosque",
    icon: "mosque",
    query: r#"["amenity"="place_of_worship"]["religion"="muslim"]"#,
    color: "#96CEB4",
    priority: 4,
};

static ATM: Category = Category {
    id: "atm",
    name: "ATM",
    name_en: "ATM",
    icon: "atm",
    query: r#"["amenity"="atm"]"#,
    color: "#FFEAA7",
    priority: 5,
};

static GAS_STATION: Category = Category {
    id: "gas_station",
    name: "SPBU",
    name_en: "Gas Station",
    icon: "local-gas-station",
    query: r#"["amenity"="fuel"]"#,
    color: "#DDA0DD",
    priority: 6,
};

static SHOPPING: Category = Category {
    id: "shopping",
    name: "Belanja",
    name_en: "Shopping",
    icon: "shopping-cart",
    query: r#"["shop"~"^(supermarket|mall|convenience|department_store)$"]"#,
    color: "#98D8C8",
    priority: 7,
};

static BANK: Category = Category {
    id: "bank",
    name: "Bank",
    name_en: "Bank",
    icon: "account-balance",
    query: r#"["amenity"="bank"]"#,
    color: "#F7DC6F",
    priority: 8,
};

static CATALOG: [&Category; 9] = [
    &ALL,
    &RESTAURANT,
    &SCHOOL,
    &HOSPITAL,
    &MOSQUE,
    &ATM,
    &GAS_STATION,
    &SHOPPING,
    &BANK,
];

/// Tag predicate used by the classification rules.
enum TagMatch {
    /// Tag `key` is present and equal to one of the listed values.
    OneOf(&'static str, &'static [&'static str]),
    /// Tag `key` is present and equal to the value.
    Is(&'static str, &'static str),
    /// Every nested predicate holds.
    AllOf(&'static [TagMatch]),
}

impl TagMatch {
    fn matches(&self, tags: &BTreeMap<String, String>) -> bool {
        match self {
            TagMatch::OneOf(key, values) => tags
                .get(*key)
                .is_some_and(|value| values.iter().any(|v| *v == value.as_str())),
            TagMatch::Is(key, expected) => tags.get(*key).is_some_and(|value| value == *expected),
            TagMatch::AllOf(all) => all.iter().all(|m| m.matches(tags)),
        }
    }
}

struct Rule {
    when: TagMatch,
    then: &'static Category,
}

/// Evaluated top to bottom; first match wins.
static RULES: [Rule; 8] = [
    Rule {
        when: TagMatch::OneOf("amenity", &["restaurant", "food_court", "fast_food", "cafe"]),
        then: &RESTAURANT,
    },
    Rule {
        when: TagMatch::OneOf("amenity", &["school", "university", "college", "kindergarten"]),
        then: &SCHOOL,
    },
    Rule {
        when: TagMatch::OneOf("amenity", &["hospital", "clinic", "pharmacy", "doctors"]),
        then: &HOSPITAL,
    },
    Rule {
        when: TagMatch::AllOf(&[
            TagMatch::Is("amenity", "place_of_worship"),
            TagMatch::Is("religion", "muslim"),
        ]),
        then: &MOSQUE,
    },
    Rule {
        when: TagMatch::Is("amenity", "atm"),
        then: &ATM,
    },
    Rule {
        when: TagMatch::Is("amenity", "fuel"),
        then: &GAS_STATION,
    },
    Rule {
        when: TagMatch::OneOf("shop", &["supermarket", "mall", "convenience", "department_store"]),
        then: &SHOPPING,
    },
    Rule {
        when: TagMatch::Is("amenity", "bank"),
        then: &BANK,
    },
];

/// The full ordered catalog, wildcard first.
#[must_use]
pub fn categories() -> &'static [&'static Category] {
    &CATALOG
}

/// Looks up a catalog entry by its stable id.
#[must_use]
pub fn category_by_id(id: &str) -> Option<&'static Category> {
    CATALOG.iter().copied().find(|c| c.id == id)
}

/// Classifies a raw tag mapping. Never returns the wildcard category.
#[must_use]
pub fn determine_category(tags: &BTreeMap<String, String>) -> Option<&'static Category> {
    RULES
        .iter()
        .find(|rule| rule.when.matches(tags))
        .map(|rule| rule.then)
}

/// The categories a request asks for, after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CategoryFilter {
    /// The wildcard was requested: every concrete category qualifies.
    Any,
    Only(Vec<&'static Category>),
}

impl CategoryFilter {
    /// Resolves requested ids against the catalog.
    ///
    /// An empty request behaves like the wildcard. Unknown ids are rejected.
    pub(crate) fn from_ids<S: AsRef<str>>(ids: &[S]) -> Result<Self, PoiError> {
        if ids.is_empty() || ids.iter().any(|id| id.as_ref() == ALL_CATEGORY_ID) {
            return Ok(CategoryFilter::Any);
        }
        let mut selected: Vec<&'static Category> = Vec::with_capacity(ids.len());
        for id in ids {
            let category = category_by_id(id.as_ref())
                .ok_or_else(|| PoiError::invalid(format!("unknown category \"{}\"", id.as_ref())))?;
            if !selected.contains(&category) {
                selected.push(category);
            }
        }
        Ok(CategoryFilter::Only(selected))
    }

    /// Concrete categories whose selectors go into the backend query.
    pub(crate) fn query_categories(&self) -> Vec<&'static Category> {
        match self {
            CategoryFilter::Any => CATALOG
                .iter()
                .copied()
                .filter(|c| c.id != ALL_CATEGORY_ID)
                .collect(),
            CategoryFilter::Only(selected) => selected.clone(),
        }
    }

    pub(crate) fn admits(&self, category: &Category) -> bool {
        match self {
            CategoryFilter::Any => true,
            CategoryFilter::Only(selected) => selected.iter().any(|c| c.id == category.id),
        }
    }
}
