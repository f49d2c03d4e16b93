use super::EntityStore;
use super::migrations::apply_migrations;
use crate::{
    error::{PantryError, Result},
    model::{
        CategoryId, CategoryRecord, IngredientChanges, IngredientRecord, IngredientWithCategory,
        NewIngredient,
    },
};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

const SELECT_INGREDIENT_JOINED: &str = "SELECT i.id, i.name, i.notes, i.category_id, c.name \
     FROM ingredient i JOIN category c ON c.id = i.category_id";

/// SQLite-backed [`EntityStore`].
///
/// Holds a single connection behind a mutex; each method keeps the lock for
/// its whole duration and mutations run inside one transaction.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) a database file and applies pending migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let started_at = Instant::now();
        tracing::info!(path = %path.display(), "Opening database");

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let store = Self::bootstrap(conn)?;
        tracing::debug!(
            duration_ms = started_at.elapsed().as_millis() as u64,
            "Database ready"
        );
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::bootstrap(conn)
    }

    fn bootstrap(mut conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        let applied = apply_migrations(&mut conn)?;
        if applied > 0 {
            tracing::info!(applied, "Database schema migrated");
        }
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    // A panic mid-call cannot leave a half-applied write behind: open
    // transactions roll back on drop.
    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<CategoryRecord> {
    Ok(CategoryRecord {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn ingredient_from_row(row: &Row<'_>) -> rusqlite::Result<IngredientRecord> {
    Ok(IngredientRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        notes: row.get(2)?,
        category_id: row.get(3)?,
    })
}

fn joined_from_row(row: &Row<'_>) -> rusqlite::Result<IngredientWithCategory> {
    let ingredient = ingredient_from_row(row)?;
    let category = CategoryRecord {
        id: ingredient.category_id,
        name: row.get(4)?,
    };
    Ok(IngredientWithCategory {
        ingredient,
        category,
    })
}

fn fetch_category(conn: &Connection, id: CategoryId) -> Result<Option<CategoryRecord>> {
    let category = conn
        .query_row(
            "SELECT id, name FROM category WHERE id = ?1",
            params![id],
            category_from_row,
        )
        .optional()?;
    Ok(category)
}

fn fetch_ingredient(conn: &Connection, id: i64) -> Result<Option<IngredientWithCategory>> {
    let sql = format!("{SELECT_INGREDIENT_JOINED} WHERE i.id = ?1");
    let ingredient = conn
        .query_row(&sql, params![id], joined_from_row)
        .optional()?;
    Ok(ingredient)
}

impl EntityStore for SqliteStore {
    fn create_category(&self, name: &str) -> Result<CategoryRecord> {
        tracing::info!(name = %name, "Creating category");

        let conn = self.lock();
        conn.execute("INSERT INTO category (name) VALUES (?1)", params![name])?;
        Ok(CategoryRecord::new(conn.last_insert_rowid(), name))
    }

    fn get_category(&self, id: CategoryId) -> Result<CategoryRecord> {
        let conn = self.lock();
        fetch_category(&conn, id)?.ok_or_else(|| PantryError::not_found("Category", id))
    }

    fn find_category_by_name(&self, name: &str) -> Result<Option<CategoryRecord>> {
        tracing::debug!(name = %name, "Looking up category by name");

        let conn = self.lock();
        let mut stmt =
            conn.prepare("SELECT id, name FROM category WHERE name = ?1 ORDER BY id LIMIT 2")?;
        let mut matches = stmt
            .query_map(params![name], category_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if matches.len() > 1 {
            return Err(PantryError::ambiguous("Category", name));
        }
        Ok(matches.pop())
    }

    fn update_category(&self, id: CategoryId, name: &str) -> Result<CategoryRecord> {
        tracing::info!(id = %id, name = %name, "Updating category");

        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let changed = tx.execute(
            "UPDATE category SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
        if changed == 0 {
            return Err(PantryError::not_found("Category", id));
        }
        let category =
            fetch_category(&tx, id)?.ok_or_else(|| PantryError::not_found("Category", id))?;
        tx.commit()?;
        Ok(category)
    }

    fn delete_category(&self, id: CategoryId) -> Result<CategoryRecord> {
        tracing::info!(id = %id, "Deleting category");

        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let snapshot =
            fetch_category(&tx, id)?.ok_or_else(|| PantryError::not_found("Category", id))?;
        tx.execute("DELETE FROM category WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(snapshot)
    }

    fn create_ingredient(&self, new: &NewIngredient) -> Result<IngredientWithCategory> {
        tracing::info!(
            name = %new.name,
            category_id = %new.category_id,
            "Creating ingredient"
        );

        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let category = fetch_category(&tx, new.category_id)?
            .ok_or_else(|| PantryError::not_found("Category", new.category_id))?;
        tx.execute(
            "INSERT INTO ingredient (name, notes, category_id) VALUES (?1, ?2, ?3)",
            params![new.name, new.notes, new.category_id],
        )?;
        let ingredient = IngredientRecord {
            id: tx.last_insert_rowid(),
            name: new.name.clone(),
            notes: new.notes.clone(),
            category_id: category.id,
        };
        tx.commit()?;
        Ok(IngredientWithCategory {
            ingredient,
            category,
        })
    }

    fn get_ingredient(&self, id: i64) -> Result<IngredientWithCategory> {
        tracing::debug!(id = %id, "Fetching ingredient");

        let conn = self.lock();
        fetch_ingredient(&conn, id)?.ok_or_else(|| PantryError::not_found("Ingredient", id))
    }

    fn list_ingredients(&self) -> Result<Vec<IngredientWithCategory>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!("{SELECT_INGREDIENT_JOINED} ORDER BY i.id"))?;
        let ingredients = stmt
            .query_map([], joined_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!(count = ingredients.len(), "Listed ingredients");
        Ok(ingredients)
    }

    fn update_ingredient(
        &self,
        id: i64,
        changes: &IngredientChanges,
    ) -> Result<IngredientWithCategory> {
        tracing::info!(id = %id, name = %changes.name, "Updating ingredient");

        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let changed = tx.execute(
            "UPDATE ingredient SET name = ?1, notes = COALESCE(?2, notes) WHERE id = ?3",
            params![changes.name, changes.notes, id],
        )?;
        if changed == 0 {
            return Err(PantryError::not_found("Ingredient", id));
        }
        let ingredient =
            fetch_ingredient(&tx, id)?.ok_or_else(|| PantryError::not_found("Ingredient", id))?;
        tx.commit()?;
        Ok(ingredient)
    }

    fn delete_ingredient(&self, id: i64) -> Result<IngredientWithCategory> {
        tracing::info!(id = %id, "Deleting ingredient");

        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let snapshot =
            fetch_ingredient(&tx, id)?.ok_or_else(|| PantryError::not_found("Ingredient", id))?;
        tx.execute("DELETE FROM ingredient WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(snapshot)
    }

    fn ingredients_for_categories(
        &self,
        category_ids: &[CategoryId],
    ) -> Result<HashMap<CategoryId, Vec<IngredientRecord>>> {
        let mut grouped: HashMap<CategoryId, Vec<IngredientRecord>> = category_ids
            .iter()
            .map(|id| (*id, Vec::new()))
            .collect();
        if category_ids.is_empty() {
            return Ok(grouped);
        }

        tracing::debug!(categories = category_ids.len(), "Batch loading ingredients");

        let placeholders = vec!["?"; category_ids.len()].join(", ");
        let sql = format!(
            "SELECT id, name, notes, category_id FROM ingredient \
             WHERE category_id IN ({placeholders}) ORDER BY id"
        );

        let conn = self.lock();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(category_ids.iter()), ingredient_from_row)?;
        for row in rows {
            let ingredient = row?;
            grouped
                .entry(ingredient.category_id)
                .or_default()
                .push(ingredient);
        }
        Ok(grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn test_create_and_find_category_by_name() {
        let store = setup_test_store();

        let dairy = store.create_category("Dairy").unwrap();
        assert_eq!(dairy.name, "Dairy");

        let found = store.find_category_by_name("Dairy").unwrap();
        assert_eq!(found, Some(dairy));
    }

    #[test]
    fn test_find_category_by_name_miss_is_none() {
        let store = setup_test_store();
        store.create_category("Dairy").unwrap();

        assert_eq!(store.find_category_by_name("Produce").unwrap(), None);
        // Lookup is exact, not case-insensitive
        assert_eq!(store.find_category_by_name("dairy").unwrap(), None);
    }

    #[test]
    fn test_find_category_by_duplicate_name_is_ambiguous() {
        let store = setup_test_store();
        store.create_category("Spices").unwrap();
        store.create_category("Spices").unwrap();

        let err = store.find_category_by_name("Spices").unwrap_err();
        assert!(matches!(
            err,
            PantryError::Ambiguous { entity: "Category", ref key } if key == "Spices"
        ));
        assert_eq!(err.code(), "AMBIGUOUS");

        // Renaming one of them resolves the lookup again
        let first = store.create_category("Herbs").unwrap();
        store.create_category("Herbs").unwrap();
        store.update_category(first.id, "Dried herbs").unwrap();
        assert_eq!(
            store.find_category_by_name("Dried herbs").unwrap(),
            Some(CategoryRecord::new(first.id, "Dried herbs"))
        );
        assert!(store.find_category_by_name("Herbs").unwrap().is_some());
    }

    #[test]
    fn test_update_category_renames() {
        let store = setup_test_store();
        let cat = store.create_category("Diary").unwrap();

        let updated = store.update_category(cat.id, "Dairy").unwrap();
        assert_eq!(updated, CategoryRecord::new(cat.id, "Dairy"));
        assert_eq!(store.get_category(cat.id).unwrap().name, "Dairy");
    }

    #[test]
    fn test_update_missing_category_is_not_found() {
        let store = setup_test_store();
        let err = store.update_category(99, "Nope").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_category_returns_snapshot_and_cascades() {
        let store = setup_test_store();
        let cat = store.create_category("Dairy").unwrap();
        let milk = store
            .create_ingredient(&NewIngredient::new("Milk", "fresh", cat.id))
            .unwrap();

        let deleted = store.delete_category(cat.id).unwrap();
        assert_eq!(deleted, cat);

        assert!(store.get_category(cat.id).unwrap_err().is_not_found());
        // Ingredients never outlive their category
        assert!(
            store
                .get_ingredient(milk.ingredient.id)
                .unwrap_err()
                .is_not_found()
        );
        assert!(store.list_ingredients().unwrap().is_empty());
    }

    #[test]
    fn test_delete_missing_category_is_not_found() {
        let store = setup_test_store();
        assert!(store.delete_category(1).unwrap_err().is_not_found());
    }

    #[test]
    fn test_create_ingredient_binds_category() {
        let store = setup_test_store();
        let cat = store.create_category("Dairy").unwrap();

        let milk = store
            .create_ingredient(&NewIngredient::new("Milk", "fresh", cat.id))
            .unwrap();
        assert_eq!(milk.ingredient.name, "Milk");
        assert_eq!(milk.ingredient.notes, "fresh");
        assert_eq!(milk.ingredient.category_id, cat.id);
        assert_eq!(milk.category, cat);

        assert_eq!(store.get_ingredient(milk.ingredient.id).unwrap(), milk);
    }

    #[test]
    fn test_create_ingredient_with_unknown_category_creates_nothing() {
        let store = setup_test_store();

        let err = store
            .create_ingredient(&NewIngredient::new("Milk", "fresh", 404))
            .unwrap_err();
        assert!(matches!(
            err,
            PantryError::NotFound { entity: "Category", ref key } if key == "404"
        ));
        assert!(store.list_ingredients().unwrap().is_empty());
    }

    #[test]
    fn test_update_ingredient_without_notes_keeps_them() {
        let store = setup_test_store();
        let cat = store.create_category("Dairy").unwrap();
        let milk = store
            .create_ingredient(&NewIngredient::new("Milk", "fresh", cat.id))
            .unwrap();

        let updated = store
            .update_ingredient(milk.ingredient.id, &IngredientChanges::rename("Whole milk"))
            .unwrap();
        assert_eq!(updated.ingredient.name, "Whole milk");
        assert_eq!(updated.ingredient.notes, "fresh");
    }

    #[test]
    fn test_update_ingredient_with_empty_notes_clears_them() {
        let store = setup_test_store();
        let cat = store.create_category("Dairy").unwrap();
        let milk = store
            .create_ingredient(&NewIngredient::new("Milk", "fresh", cat.id))
            .unwrap();

        let changes = IngredientChanges::rename("Milk").with_notes("");
        let updated = store
            .update_ingredient(milk.ingredient.id, &changes)
            .unwrap();
        assert_eq!(updated.ingredient.notes, "");
    }

    #[test]
    fn test_update_ingredient_is_idempotent() {
        let store = setup_test_store();
        let cat = store.create_category("Dairy").unwrap();
        let milk = store
            .create_ingredient(&NewIngredient::new("Milk", "fresh", cat.id))
            .unwrap();
        let changes = IngredientChanges::rename("Skim milk").with_notes("low fat");

        let once = store
            .update_ingredient(milk.ingredient.id, &changes)
            .unwrap();
        let twice = store
            .update_ingredient(milk.ingredient.id, &changes)
            .unwrap();
        assert_eq!(once, twice);
        assert_eq!(store.get_ingredient(milk.ingredient.id).unwrap(), once);
    }

    #[test]
    fn test_update_missing_ingredient_is_not_found() {
        let store = setup_test_store();
        let err = store
            .update_ingredient(7, &IngredientChanges::rename("Ghost"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_ingredient_returns_snapshot() {
        let store = setup_test_store();
        let cat = store.create_category("Dairy").unwrap();
        let milk = store
            .create_ingredient(&NewIngredient::new("Milk", "fresh", cat.id))
            .unwrap();

        let deleted = store.delete_ingredient(milk.ingredient.id).unwrap();
        assert_eq!(deleted, milk);
        assert!(
            store
                .get_ingredient(milk.ingredient.id)
                .unwrap_err()
                .is_not_found()
        );
        // Category survives its ingredients
        assert_eq!(store.get_category(cat.id).unwrap(), cat);
        assert!(store.delete_ingredient(milk.ingredient.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_ingredients_is_ordered_and_joined() {
        let store = setup_test_store();
        let dairy = store.create_category("Dairy").unwrap();
        let produce = store.create_category("Produce").unwrap();
        store
            .create_ingredient(&NewIngredient::new("Milk", "", dairy.id))
            .unwrap();
        store
            .create_ingredient(&NewIngredient::new("Kale", "", produce.id))
            .unwrap();
        store
            .create_ingredient(&NewIngredient::new("Butter", "", dairy.id))
            .unwrap();

        let list = store.list_ingredients().unwrap();
        let names: Vec<_> = list.iter().map(|i| i.ingredient.name.as_str()).collect();
        assert_eq!(names, ["Milk", "Kale", "Butter"]);
        assert_eq!(list[1].category, produce);
        assert_eq!(list[2].category, dairy);
    }

    #[test]
    fn test_ingredients_for_categories_groups_by_category() {
        let store = setup_test_store();
        let dairy = store.create_category("Dairy").unwrap();
        let produce = store.create_category("Produce").unwrap();
        let empty = store.create_category("Spices").unwrap();
        store
            .create_ingredient(&NewIngredient::new("Milk", "", dairy.id))
            .unwrap();
        store
            .create_ingredient(&NewIngredient::new("Kale", "", produce.id))
            .unwrap();
        store
            .create_ingredient(&NewIngredient::new("Butter", "", dairy.id))
            .unwrap();

        let grouped = store
            .ingredients_for_categories(&[dairy.id, empty.id])
            .unwrap();
        assert_eq!(grouped.len(), 2);
        let dairy_names: Vec<_> = grouped[&dairy.id].iter().map(|i| i.name.as_str()).collect();
        assert_eq!(dairy_names, ["Milk", "Butter"]);
        assert!(grouped[&empty.id].is_empty());
        assert!(!grouped.contains_key(&produce.id));
    }

    #[test]
    fn test_ingredients_for_no_categories_is_empty() {
        let store = setup_test_store();
        assert!(store.ingredients_for_categories(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_open_file_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("pantry.db");

        let cat_id = {
            let store = SqliteStore::open(&db_path).unwrap();
            store.create_category("Dairy").unwrap().id
        };

        let reopened = SqliteStore::open(&db_path).unwrap();
        assert_eq!(reopened.get_category(cat_id).unwrap().name, "Dairy");
    }
}
