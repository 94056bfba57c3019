use serde::{Deserialize, Serialize};

/// Name the update and point-query steps filter on.
pub const FILTER_NAME: &str = "Ash";

/// The document every CRUD step moves through the collection.
///
/// Field names are serialized lowercase, so the wire shape is
/// `{name, age, city}` plus the `_id` MongoDB assigns on insert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Trainer {
    pub name: String,
    pub age: i32,
    pub city: String,
}

impl Trainer {
    pub fn new(name: &str, age: i32, city: &str) -> Self {
        Self {
            name: name.to_string(),
            age,
            city: city.to_string(),
        }
    }
}

/// The document each insert round writes on its own.
pub fn seed_single() -> Trainer {
    Trainer::new(FILTER_NAME, 10, "Pallet Town")
}

/// The pair of documents each insert round writes in one batch.
pub fn seed_batch() -> [Trainer; 2] {
    [
        Trainer::new("Misty", 10, "Cerulean City"),
        Trainer::new("Brock", 15, "Pewter City"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, from_document, to_document};

    #[test]
    fn serializes_with_lowercase_keys() {
        let document = to_document(&seed_single()).expect("trainer serializes");
        assert_eq!(
            document,
            doc! { "name": "Ash", "age": 10, "city": "Pallet Town" }
        );
    }

    #[test]
    fn deserializes_ignoring_the_assigned_id() {
        let document = doc! {
            "_id": mongodb::bson::oid::ObjectId::new(),
            "name": "Misty",
            "age": 10,
            "city": "Cerulean City",
        };
        let trainer: Trainer = from_document(document).expect("trainer deserializes");
        assert_eq!(trainer, Trainer::new("Misty", 10, "Cerulean City"));
    }

    #[test]
    fn seed_documents_match_the_fixed_rows() {
        assert_eq!(seed_single(), Trainer::new("Ash", 10, "Pallet Town"));
        assert_eq!(
            seed_batch(),
            [
                Trainer::new("Misty", 10, "Cerulean City"),
                Trainer::new("Brock", 15, "Pewter City"),
            ]
        );
    }

    #[test]
    fn seed_documents_cover_the_filter_name() {
        assert_eq!(seed_single().name, FILTER_NAME);
        assert!(seed_batch().iter().all(|t| t.name != FILTER_NAME));
    }
}
