use std::sync::Arc;

use async_graphql::{
    Context, EmptySubscription, ID, Object, ResultExt, Schema, dataloader::DataLoader,
};

use crate::error::PantryError;
use crate::model::{IngredientChanges, NewIngredient};
use crate::storage::EntityStore;

use super::loaders::IngredientsByCategory;
use super::run_blocking;
use super::types::*;

pub type PantrySchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(store: Arc<dyn EntityStore>) -> PantrySchema {
    let ingredients_loader =
        DataLoader::new(IngredientsByCategory::new(Arc::clone(&store)), tokio::spawn);

    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(store)
        .data(ingredients_loader)
        .finish()
}

/// Runs a store call from a resolver, converting failures into coded GraphQL errors.
async fn with_store<T, F>(ctx: &Context<'_>, op: F) -> async_graphql::Result<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn EntityStore) -> Result<T, PantryError> + Send + 'static,
{
    let store = Arc::clone(ctx.data::<Arc<dyn EntityStore>>()?);
    run_blocking(store, op).await.extend()
}

/// Store ids are integers; anything else can never resolve to a record.
fn parse_id(entity: &'static str, raw: &str) -> Result<i64, PantryError> {
    raw.trim()
        .parse()
        .map_err(|_| PantryError::not_found(entity, raw))
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// List every ingredient together with its category
    async fn all_ingredients(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Ingredient>> {
        let ingredients = with_store(ctx, |store| store.list_ingredients()).await?;
        Ok(ingredients.into_iter().map(Ingredient::from).collect())
    }

    /// Get a single ingredient by ID; fails with NOT_FOUND when it does not exist
    async fn specific(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<Ingredient> {
        let id = parse_id("Ingredient", &id).extend()?;
        let ingredient = with_store(ctx, move |store| store.get_ingredient(id)).await?;
        Ok(ingredient.into())
    }

    /// Get a category by exact name, or null when there is none
    async fn category_by_name(
        &self,
        ctx: &Context<'_>,
        name: String,
    ) -> async_graphql::Result<Option<Category>> {
        let category = with_store(ctx, move |store| store.find_category_by_name(&name)).await?;
        Ok(category.map(Category::from))
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create a new category
    async fn create_category(
        &self,
        ctx: &Context<'_>,
        name: String,
    ) -> async_graphql::Result<CreateCategoryPayload> {
        let category = with_store(ctx, move |store| store.create_category(&name)).await?;
        Ok(CreateCategoryPayload {
            category: category.into(),
        })
    }

    /// Rename an existing category
    async fn update_category(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: String,
    ) -> async_graphql::Result<UpdateCategoryPayload> {
        let id = parse_id("Category", &id).extend()?;
        let category = with_store(ctx, move |store| store.update_category(id, &name)).await?;
        Ok(UpdateCategoryPayload {
            category: category.into(),
        })
    }

    /// Delete a category and every ingredient in it
    async fn delete_category(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<DeleteCategoryPayload> {
        let id = parse_id("Category", &id).extend()?;
        let category = with_store(ctx, move |store| store.delete_category(id)).await?;
        Ok(DeleteCategoryPayload {
            category: Some(category.into()),
        })
    }

    /// Create a new ingredient in an existing category
    async fn create_ingredients(
        &self,
        ctx: &Context<'_>,
        name: String,
        notes: String,
        category_id: i64,
    ) -> async_graphql::Result<CreateIngredientsPayload> {
        let new = NewIngredient::new(name, notes, category_id);
        let ingredient = with_store(ctx, move |store| store.create_ingredient(&new)).await?;
        Ok(CreateIngredientsPayload {
            ingredient: ingredient.into(),
        })
    }

    /// Update an ingredient's name, and its notes when given
    async fn update_ingredients(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: String,
        notes: Option<String>,
    ) -> async_graphql::Result<UpdateIngredientsPayload> {
        let id = parse_id("Ingredient", &id).extend()?;
        let changes = IngredientChanges { name, notes };
        let ingredient =
            with_store(ctx, move |store| store.update_ingredient(id, &changes)).await?;
        Ok(UpdateIngredientsPayload {
            ingredient: ingredient.into(),
        })
    }

    /// Delete an ingredient
    async fn delete_ingredients(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<DeleteIngredientsPayload> {
        let id = parse_id("Ingredient", &id).extend()?;
        let ingredient = with_store(ctx, move |store| store.delete_ingredient(id)).await?;
        Ok(DeleteIngredientsPayload {
            ingredient: Some(ingredient.into()),
        })
    }
}
