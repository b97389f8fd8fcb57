//! Tag taxonomy queries.
//!
//! Tags describe user preferences and risk factors ("Asthma", "Outdoor
//! Activities", ...) and feed both the registration form and the AI
//! recommendation prompt. The by-id lookup returns the legacy
//! `"name,type,id"` string form that downstream consumers split on commas.

use std::collections::BTreeMap;

use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::AuthError;

/// Default taxonomy inserted on first run, as `(name, type)` pairs.
const DEFAULT_TAGS: &[(&str, &str)] = &[
    ("Allergies", "Health"),
    ("Asthma", "Health"),
    ("Children", "Health"),
    ("Elderly", "Health"),
    ("Heart Condition", "Health"),
    ("Pregnant", "Health"),
    ("Cycling", "Lifestyle"),
    ("Gardening", "Lifestyle"),
    ("Outdoor Activities", "Lifestyle"),
    ("Pet Owner", "Lifestyle"),
    ("Running", "Lifestyle"),
];

/// A tag as surfaced by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    /// Tag id.
    pub tag_id: i64,
    /// Tag name.
    pub tag_name: String,
    /// Tag type ("Health", "Lifestyle", ...).
    pub tag_type: String,
}

/// Seeds the default taxonomy when the tags table is empty.
///
/// # Errors
///
/// Returns [`AuthError::Database`] on query failures.
pub async fn seed_default_tags(db: &dyn Database) -> Result<(), AuthError> {
    let rows = db
        .query_raw_params("SELECT COUNT(*) as cnt FROM tags", &[])
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

    let count: i64 = rows.first().map_or(0, |r| r.to_value("cnt").unwrap_or(0));
    if count > 0 {
        return Ok(());
    }

    log::info!("seeding {} default tags", DEFAULT_TAGS.len());
    for (name, tag_type) in DEFAULT_TAGS {
        db.exec_raw_params(
            "INSERT INTO tags (tag_name, tag_type) VALUES ($1, $2)",
            &[
                DatabaseValue::String((*name).to_string()),
                DatabaseValue::String((*tag_type).to_string()),
            ],
        )
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;
    }

    Ok(())
}

/// Lists every tag, ordered by type then name.
///
/// # Errors
///
/// Returns [`AuthError::Database`] on query failures.
pub async fn all_tags(db: &dyn Database) -> Result<Vec<TagInfo>, AuthError> {
    let rows = db
        .query_raw_params(
            "SELECT tag_id, tag_name, tag_type FROM tags ORDER BY tag_type, tag_name",
            &[],
        )
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

    Ok(rows.iter().map(tag_from_row).collect())
}

/// Groups all tags into a type-keyed map.
///
/// Tags with an empty type land under `"Other"`.
///
/// # Errors
///
/// Returns [`AuthError::Database`] on query failures.
pub async fn tags_by_type(db: &dyn Database) -> Result<BTreeMap<String, Vec<TagInfo>>, AuthError> {
    let mut grouped: BTreeMap<String, Vec<TagInfo>> = BTreeMap::new();

    for tag in all_tags(db).await? {
        let key = if tag.tag_type.is_empty() {
            "Other".to_string()
        } else {
            tag.tag_type.clone()
        };
        grouped.entry(key).or_default().push(tag);
    }

    Ok(grouped)
}

/// Looks up one tag and returns its `"name,type,id"` string form.
///
/// Returns `None` when the id doesn't exist.
///
/// # Errors
///
/// Returns [`AuthError::Database`] on query failures.
pub async fn tag_by_id(db: &dyn Database, tag_id: i64) -> Result<Option<String>, AuthError> {
    let rows = db
        .query_raw_params(
            "SELECT tag_id, tag_name, tag_type FROM tags WHERE tag_id = $1",
            &[DatabaseValue::Int64(tag_id)],
        )
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

    Ok(rows.first().map(|row| {
        let tag = tag_from_row(row);
        format!("{},{},{}", tag.tag_name, tag.tag_type, tag.tag_id)
    }))
}

/// Resolves a list of tag ids to their `"name,type,id"` forms.
///
/// Missing ids are skipped silently; the output order follows the input.
///
/// # Errors
///
/// Returns [`AuthError::Database`] on query failures.
pub async fn tags_by_list(db: &dyn Database, tag_ids: &[i64]) -> Result<Vec<String>, AuthError> {
    let mut tags = Vec::with_capacity(tag_ids.len());
    for &id in tag_ids {
        if let Some(tag) = tag_by_id(db, id).await? {
            tags.push(tag);
        }
    }
    Ok(tags)
}

/// Lists the tags attached to one user.
///
/// # Errors
///
/// Returns [`AuthError::Database`] on query failures.
pub async fn user_tags(db: &dyn Database, user_uuid: &str) -> Result<Vec<TagInfo>, AuthError> {
    let rows = db
        .query_raw_params(
            "SELECT t.tag_id, t.tag_name, t.tag_type
             FROM user_tags ut
             JOIN tags t ON t.tag_id = ut.tag_id
             WHERE ut.user_uuid = $1
             ORDER BY t.tag_type, t.tag_name",
            &[DatabaseValue::String(user_uuid.to_string())],
        )
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

    Ok(rows.iter().map(tag_from_row).collect())
}

fn tag_from_row(row: &switchy_database::Row) -> TagInfo {
    TagInfo {
        tag_id: row.to_value("tag_id").unwrap_or(0),
        tag_name: row.to_value("tag_name").unwrap_or_default(),
        tag_type: row.to_value("tag_type").unwrap_or_default(),
    }
}
