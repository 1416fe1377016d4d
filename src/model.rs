use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl Activity {
    /// Capacity minus current roster size. Negative when the backend has
    /// overbooked the activity.
    pub fn spots_left(&self) -> i64 {
        i64::from(self.max_participants) - self.participants.len() as i64
    }
}

/// Every activity the backend returned, in the order its keys arrived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<(String, Activity)>,
}

impl Catalog {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Activity)> {
        self.entries.iter().map(|(name, a)| (name.as_str(), a))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&Activity> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, a)| a)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, name: String, activity: Activity) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = activity,
            None => self.entries.push((name, activity)),
        }
    }
}

impl FromIterator<(String, Activity)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, Activity)>>(iter: I) -> Self {
        let mut catalog = Catalog::default();
        for (name, activity) in iter {
            catalog.insert(name, activity);
        }
        catalog
    }
}

// Deserialized by hand so the JSON key order is kept without pulling in an
// ordered map.
impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = Catalog;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping activity names to activities")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Catalog, M::Error> {
                let mut catalog = Catalog::default();
                while let Some((name, activity)) = map.next_entry::<String, Activity>()? {
                    catalog.insert(name, activity);
                }
                Ok(catalog)
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SignupReply {
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ErrorReply {
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod test {
    use super::*;

    const SAMPLE: &str = r#"{
        "Programming Class": {
            "description": "Learn programming fundamentals",
            "schedule": "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
            "max_participants": 20,
            "participants": ["emma@mergington.edu", "sophia@mergington.edu"]
        },
        "Chess Club": {
            "description": "Learn strategies and compete in chess tournaments",
            "schedule": "Fridays, 3:30 PM - 5:00 PM",
            "max_participants": 12,
            "participants": ["michael@mergington.edu"]
        },
        "Art Club": {
            "description": "Paint and draw",
            "schedule": "Wednesdays",
            "max_participants": 10
        }
    }"#;

    #[test]
    fn keeps_backend_key_order() {
        let catalog: Catalog = serde_json::from_str(SAMPLE).unwrap();
        let names: Vec<_> = catalog.names().collect();
        assert_eq!(names, ["Programming Class", "Chess Club", "Art Club"]);
    }

    #[test]
    fn missing_roster_is_empty() {
        let catalog: Catalog = serde_json::from_str(SAMPLE).unwrap();
        let art = catalog.get("Art Club").unwrap();
        assert!(art.participants.is_empty());
        assert_eq!(art.spots_left(), 10);
    }

    #[test]
    fn spots_left_counts_roster() {
        let catalog: Catalog = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(catalog.get("Chess Club").unwrap().spots_left(), 11);
        assert_eq!(catalog.get("Programming Class").unwrap().spots_left(), 18);
    }

    #[test]
    fn overbooked_goes_negative() {
        let a = Activity {
            description: String::new(),
            schedule: String::new(),
            max_participants: 1,
            participants: vec!["a@x".into(), "b@x".into(), "c@x".into()],
        };
        assert_eq!(a.spots_left(), -2);
    }

    #[test]
    fn duplicate_key_keeps_first_slot_last_value() {
        let json = r#"{
            "A": {"description": "one", "schedule": "", "max_participants": 1},
            "B": {"description": "b", "schedule": "", "max_participants": 1},
            "A": {"description": "two", "schedule": "", "max_participants": 1}
        }"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.names().collect::<Vec<_>>(), ["A", "B"]);
        assert_eq!(catalog.get("A").unwrap().description, "two");
    }

    #[test]
    fn empty_object_is_empty_catalog() {
        let catalog: Catalog = serde_json::from_str("{}").unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);

        let catalog: Catalog = serde_json::from_str(SAMPLE).unwrap();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn missing_required_field_fails() {
        let json = r#"{"A": {"schedule": "", "max_participants": 1}}"#;
        assert!(serde_json::from_str::<Catalog>(json).is_err());
    }

    #[test]
    fn error_reply_tolerates_missing_detail() {
        let reply: ErrorReply = serde_json::from_str("{}").unwrap();
        assert_eq!(reply.detail, None);
        let reply: ErrorReply = serde_json::from_str(r#"{"detail":"Already removed"}"#).unwrap();
        assert_eq!(reply.detail.as_deref(), Some("Already removed"));
    }
}
