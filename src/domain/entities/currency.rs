//! Currency reference data.
//!
//! The catalog itself is an external collaborator; the core only needs
//! identity and display fields for lookups.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CurrencyId, Timestamp};

/// A tradable experiment currency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    pub id: CurrencyId,
    /// Short unique symbol, upper case
    pub symbol: String,
    pub name_en: String,
    pub name_he: String,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
}

impl Currency {
    pub fn new(
        symbol: impl Into<String>,
        name_en: impl Into<String>,
        name_he: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            symbol: symbol.into().to_uppercase(),
            name_en: name_en.into(),
            name_he: name_he.into(),
            image_url: None,
            created_at: now,
        }
    }
}
