use super::category::{CategoryId, CategoryRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientRecord {
    pub id: i64,
    pub name: String,
    pub notes: String,
    pub category_id: CategoryId,
}

/// An ingredient fetched together with its category in the same statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientWithCategory {
    pub ingredient: IngredientRecord,
    pub category: CategoryRecord,
}

/// Values for a new ingredient row. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIngredient {
    pub name: String,
    pub notes: String,
    pub category_id: CategoryId,
}

impl NewIngredient {
    pub fn new(name: impl Into<String>, notes: impl Into<String>, category_id: CategoryId) -> Self {
        Self {
            name: name.into(),
            notes: notes.into(),
            category_id,
        }
    }
}

/// Field overwrites applied by an ingredient update.
///
/// `notes: None` leaves the stored notes untouched; `Some(String::new())` clears them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientChanges {
    pub name: String,
    pub notes: Option<String>,
}

impl IngredientChanges {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
