use super::{RecipeSource, StoreError, REQUIRED_TABLES};
use crate::model::{Recipe, TagSet};
use camino::Utf8Path;
use rusqlite::{params_from_iter, Connection, OpenFlags, OptionalExtension, Row};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

const RECIPE_COLUMNS: &str = "r.id, r.name, r.content, r.is_video";

/// Recipe database backed by a read-only SQLite connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Opens the database at `path` read-only and checks its schema.
    pub fn open_read_only(path: &Utf8Path) -> Result<Self, StoreError> {
        if !path.is_file() {
            return Err(StoreError::Missing(path.to_owned()));
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(StoreError::Open)?;
        debug!(path = %path, "Opened recipe database");

        Self::from_connection(conn)
    }

    /// Wraps an already-open connection after checking its schema.
    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        verify_schema(&conn)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    /// Every `(recipe_id, tag)` association, ordered by recipe then tag.
    ///
    /// Rows without a recipe id belong to no recipe and are left out.
    pub fn recipe_tags(&self) -> Result<Vec<(i64, String)>, StoreError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare_cached(
            "SELECT recipe_id, tag FROM RecipeTag \
             WHERE recipe_id IS NOT NULL \
             ORDER BY recipe_id, tag",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn query_recipes<'p>(
        &self,
        sql: &str,
        params: impl IntoIterator<Item = &'p String>,
    ) -> Result<Vec<Recipe>, StoreError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare_cached(sql)?;
        let rows = stmt.query_map(params_from_iter(params), recipe_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

impl RecipeSource for SqliteStore {
    fn query_by_tags_fuzzy(
        &self,
        wanted: &TagSet,
        unwanted: &TagSet,
    ) -> Result<Vec<Recipe>, StoreError> {
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {RECIPE_COLUMNS} FROM Recipe r \
             WHERE r.id IN (SELECT recipe_id FROM RecipeTag WHERE tag IN ({})){} \
             ORDER BY r.id",
            placeholders(1, wanted.len()),
            exclusion_clause(wanted.len() + 1, unwanted.len()),
        );
        self.query_recipes(&sql, wanted.iter().chain(unwanted))
    }

    fn query_by_tags_accurate(
        &self,
        wanted: &TagSet,
        unwanted: &TagSet,
    ) -> Result<Vec<Recipe>, StoreError> {
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {RECIPE_COLUMNS} FROM Recipe r \
             WHERE r.id IN (\
                 SELECT recipe_id FROM RecipeTag WHERE tag IN ({}) \
                 GROUP BY recipe_id HAVING COUNT(DISTINCT tag) = {}\
             ){} \
             ORDER BY r.id",
            placeholders(1, wanted.len()),
            wanted.len(),
            exclusion_clause(wanted.len() + 1, unwanted.len()),
        );
        self.query_recipes(&sql, wanted.iter().chain(unwanted))
    }

    fn query_by_tags_survival(&self, wanted: &TagSet) -> Result<Vec<Recipe>, StoreError> {
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        // Both clauses reuse the same numbered parameters.
        let wanted_params = placeholders(1, wanted.len());
        let sql = format!(
            "SELECT {RECIPE_COLUMNS} FROM Recipe r \
             WHERE r.id IN (SELECT recipe_id FROM RecipeTag WHERE tag IN ({wanted_params})) \
             AND NOT EXISTS (\
                 SELECT 1 FROM RecipeTag t \
                 WHERE t.recipe_id = r.id AND t.tag NOT IN ({wanted_params})\
             ) \
             ORDER BY r.id"
        );
        self.query_recipes(&sql, wanted)
    }

    fn all_recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        self.query_recipes(&format!("SELECT {RECIPE_COLUMNS} FROM Recipe r"), [])
    }

    fn recipe_by_id(&self, id: i64) -> Result<Option<Recipe>, StoreError> {
        let conn = self.connection()?;
        let mut stmt =
            conn.prepare_cached(&format!("SELECT {RECIPE_COLUMNS} FROM Recipe r WHERE r.id = ?1"))?;
        Ok(stmt.query_row([id], recipe_from_row).optional()?)
    }

    fn tags_for(&self, recipe_id: i64) -> Result<Vec<String>, StoreError> {
        let conn = self.connection()?;
        let mut stmt =
            conn.prepare_cached("SELECT tag FROM RecipeTag WHERE recipe_id = ?1 ORDER BY tag")?;
        let rows = stmt.query_map([recipe_id], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn verify_schema(conn: &Connection) -> Result<(), StoreError> {
    for table in REQUIRED_TABLES {
        // A file that is not a database only fails here, on first read.
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(\
                     SELECT 1 FROM sqlite_master \
                     WHERE type = 'table' AND name = ?1 COLLATE NOCASE\
                 )",
                [table],
                |row| row.get(0),
            )
            .map_err(StoreError::Open)?;
        if !exists {
            return Err(StoreError::Schema(table));
        }
    }
    Ok(())
}

fn recipe_from_row(row: &Row<'_>) -> rusqlite::Result<Recipe> {
    Ok(Recipe {
        id: row.get(0)?,
        name: row.get(1)?,
        content: row.get(2)?,
        is_video: row.get::<_, i64>(3)? == 1,
    })
}

/// `?start, ?start+1, ...` for `count` numbered parameters.
fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Drops recipes carrying any of `count` unwanted tags.
///
/// `NOT EXISTS` rather than `NOT IN`: a single `RecipeTag` row with a NULL
/// `recipe_id` would make `NOT IN` unknown for every recipe.
fn exclusion_clause(start: usize, count: usize) -> String {
    if count == 0 {
        return String::new();
    }
    format!(
        " AND NOT EXISTS (\
             SELECT 1 FROM RecipeTag x \
             WHERE x.recipe_id = r.id AND x.tag IN ({})\
         )",
        placeholders(start, count)
    )
}
