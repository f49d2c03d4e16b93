use super::loaders::IngredientsByCategory;
use crate::model::{CategoryId, CategoryRecord, IngredientRecord, IngredientWithCategory};
use async_graphql::{ComplexObject, Context, ID, SimpleObject, dataloader::DataLoader};

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Category {
    pub id: ID,
    pub name: String,
    #[graphql(skip)]
    pub key: CategoryId,
}

#[ComplexObject]
impl Category {
    /// Ingredients in this category, ordered by id
    async fn ingredients(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Ingredient>> {
        let loader = ctx.data::<DataLoader<IngredientsByCategory>>()?;
        let records = loader
            .load_one(self.key)
            .await
            .map_err(|e| super::to_graphql_error(&e))?
            .unwrap_or_default();

        Ok(records
            .into_iter()
            .map(|record| Ingredient::in_category(record, self.clone()))
            .collect())
    }
}

impl From<CategoryRecord> for Category {
    fn from(c: CategoryRecord) -> Self {
        Self {
            id: ID::from(c.id),
            name: c.name,
            key: c.id,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct Ingredient {
    pub id: ID,
    pub name: String,
    pub notes: String,
    pub category: Category,
}

impl Ingredient {
    /// Builds an ingredient whose category is already known to the caller.
    fn in_category(record: IngredientRecord, category: Category) -> Self {
        Self {
            id: ID::from(record.id),
            name: record.name,
            notes: record.notes,
            category,
        }
    }
}

impl From<IngredientWithCategory> for Ingredient {
    fn from(joined: IngredientWithCategory) -> Self {
        Self::in_category(joined.ingredient, joined.category.into())
    }
}

#[derive(SimpleObject)]
pub struct CreateCategoryPayload {
    pub category: Category,
}

#[derive(SimpleObject)]
pub struct UpdateCategoryPayload {
    pub category: Category,
}

/// Carries the category as it was just before removal.
#[derive(SimpleObject)]
pub struct DeleteCategoryPayload {
    pub category: Option<Category>,
}

// Field names on the ingredient payloads are part of the published schema
// that existing clients select against.
#[derive(SimpleObject)]
pub struct CreateIngredientsPayload {
    #[graphql(name = "ingredients")]
    pub ingredient: Ingredient,
}

#[derive(SimpleObject)]
pub struct UpdateIngredientsPayload {
    #[graphql(name = "Ingredient")]
    pub ingredient: Ingredient,
}

/// Carries the ingredient as it was just before removal.
#[derive(SimpleObject)]
pub struct DeleteIngredientsPayload {
    #[graphql(name = "Ingredient")]
    pub ingredient: Option<Ingredient>,
}
