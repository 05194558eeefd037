/// Cat documents
///
/// Cats live in a schemaless document collection. Every document the tools
/// write has the same three fields:
///
/// ```json
/// { "name": "Whiskers", "age": 3, "features": ["fluffy", "vocal"] }
/// ```
///
/// Names are not unique; mutations by name target the first match.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::seed;

/// Lowest age given to a generated cat
pub const MIN_RANDOM_AGE: i32 = 1;

/// Highest age given to a generated cat
pub const MAX_RANDOM_AGE: i32 = 20;

/// Number of feature tags a generated cat gets
pub const RANDOM_FEATURE_COUNT: usize = 3;

/// A stored cat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cat {
    /// Store-assigned identity, rendered as a hex string
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,

    pub name: String,

    pub age: i32,

    /// Feature tags in insertion order, duplicates allowed
    #[serde(default)]
    pub features: Vec<String>,
}

/// A cat about to be inserted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCat {
    pub name: String,
    pub age: i32,
    pub features: Vec<String>,
}

impl NewCat {
    /// Generates a cat with a random name, an age in `[1, 20]` and three feature words
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            name: seed::first_name(rng).to_string(),
            age: rng.gen_range(MIN_RANDOM_AGE..=MAX_RANDOM_AGE),
            features: (0..RANDOM_FEATURE_COUNT)
                .map(|_| seed::word(rng).to_string())
                .collect(),
        }
    }

    /// Attaches the identity the store assigned
    pub fn with_id(self, id: impl Into<String>) -> Cat {
        Cat {
            id: Some(id.into()),
            name: self.name,
            age: self.age,
            features: self.features,
        }
    }
}
