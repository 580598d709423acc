//! Test databases built with the same schema as the bundled asset.

use super::{SqliteStore, TagIndex};
use crate::model::{Recipe, TagSet};
use camino::Utf8Path;
use indoc::indoc;
use rusqlite::{params, Connection};

pub(crate) type Fixture = (Recipe, Vec<String>);

const SCHEMA: &str = indoc! {"
    CREATE TABLE Recipe (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        content TEXT NOT NULL,
        is_video INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE RecipeTag (
        recipe_id INTEGER,
        tag TEXT NOT NULL,
        FOREIGN KEY (recipe_id) REFERENCES Recipe (id),
        PRIMARY KEY (recipe_id, tag)
    );
"};

pub(crate) fn tags(tags: &[&str]) -> TagSet {
    tags.iter().map(|t| t.to_string()).collect()
}

fn markdown_recipe(id: i64, name: &str, ingredients: &[&str]) -> Fixture {
    let bullets: Vec<String> = ingredients.iter().map(|i| format!("- {i}")).collect();
    let content = format!("# {name}的做法\n\n## 必备原料和工具\n\n{}\n", bullets.join("\n"));
    (
        Recipe::new(id, name, content, false),
        ingredients.iter().map(|i| i.to_string()).collect(),
    )
}

/// Seven recipes covering overlap, superset, subset and untagged cases.
pub(crate) fn sample_recipes() -> Vec<Fixture> {
    vec![
        markdown_recipe(1, "土豆烧鸡蛋", &["土豆", "鸡蛋"]),
        markdown_recipe(2, "炸土豆", &["土豆"]),
        markdown_recipe(3, "盐焗土豆", &["土豆", "盐"]),
        markdown_recipe(4, "番茄炒蛋", &["番茄", "鸡蛋", "盐"]),
        markdown_recipe(5, "白米饭", &["米"]),
        (
            Recipe::new(6, "可乐鸡翅", "https://www.bilibili.com/video/BV1Ts411m7nM", true),
            vec!["鸡腿".to_string()],
        ),
        markdown_recipe(7, "凉白开", &[]),
    ]
}

pub(crate) fn populate(conn: &Connection, recipes: &[Fixture]) {
    conn.execute_batch(SCHEMA).unwrap();
    for (recipe, recipe_tags) in recipes {
        conn.execute(
            "INSERT INTO Recipe (id, name, content, is_video) VALUES (?1, ?2, ?3, ?4)",
            params![recipe.id, recipe.name, recipe.content, recipe.is_video as i64],
        )
        .unwrap();
        for tag in recipe_tags {
            conn.execute(
                "INSERT OR IGNORE INTO RecipeTag (recipe_id, tag) VALUES (?1, ?2)",
                params![recipe.id, tag],
            )
            .unwrap();
        }
    }
}

pub(crate) fn memory_store(recipes: &[Fixture]) -> SqliteStore {
    let conn = Connection::open_in_memory().unwrap();
    populate(&conn, recipes);
    SqliteStore::from_connection(conn).unwrap()
}

pub(crate) fn write_database(path: &Utf8Path, recipes: &[Fixture]) {
    let conn = Connection::open(path).unwrap();
    populate(&conn, recipes);
}

pub(crate) fn memory_index(recipes: &[Fixture]) -> TagIndex {
    let mut index = TagIndex::new();
    for (recipe, recipe_tags) in recipes {
        index.insert(recipe.clone(), recipe_tags.iter().cloned());
    }
    index
}
