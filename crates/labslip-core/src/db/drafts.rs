//! Case draft database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::CaseDraft;

impl Database {
    /// Insert or replace a case draft. Last write wins.
    pub fn save_case_draft(&self, draft: &CaseDraft) -> DbResult<()> {
        let payload = serde_json::to_string(draft)?;

        self.conn.execute(
            r#"
            INSERT INTO case_drafts (
                draft_id, payload, product_count, submitted, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(draft_id) DO UPDATE SET
                payload = excluded.payload,
                product_count = excluded.product_count,
                submitted = excluded.submitted,
                updated_at = excluded.updated_at
            "#,
            params![
                draft.draft_id,
                payload,
                draft.product_count() as i64,
                draft.submitted,
                draft.created_at,
                draft.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a draft by ID.
    pub fn get_case_draft(&self, draft_id: &str) -> DbResult<Option<CaseDraft>> {
        self.conn
            .query_row(
                "SELECT draft_id, payload FROM case_drafts WHERE draft_id = ?",
                [draft_id],
                |row| {
                    Ok(DraftRow {
                        draft_id: row.get(0)?,
                        payload: row.get(1)?,
                    })
                },
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Most recently updated draft that has not been submitted.
    pub fn latest_case_draft(&self) -> DbResult<Option<CaseDraft>> {
        self.conn
            .query_row(
                r#"
                SELECT draft_id, payload FROM case_drafts
                WHERE submitted = 0
                ORDER BY updated_at DESC, rowid DESC
                LIMIT 1
                "#,
                [],
                |row| {
                    Ok(DraftRow {
                        draft_id: row.get(0)?,
                        payload: row.get(1)?,
                    })
                },
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List unsubmitted drafts, newest first.
    pub fn list_case_drafts(&self) -> DbResult<Vec<CaseDraft>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT draft_id, payload FROM case_drafts
            WHERE submitted = 0
            ORDER BY updated_at DESC, rowid DESC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(DraftRow {
                draft_id: row.get(0)?,
                payload: row.get(1)?,
            })
        })?;

        let mut drafts = Vec::new();
        for row in rows {
            drafts.push(row?.try_into()?);
        }
        Ok(drafts)
    }

    /// Delete a draft.
    pub fn delete_case_draft(&self, draft_id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM case_drafts WHERE draft_id = ?", [draft_id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct DraftRow {
    draft_id: String,
    payload: String,
}

impl TryFrom<DraftRow> for CaseDraft {
    type Error = DbError;

    fn try_from(row: DraftRow) -> Result<Self, Self::Error> {
        let draft: CaseDraft = serde_json::from_str(&row.payload)?;
        if draft.draft_id != row.draft_id {
            return Err(DbError::Corrupt(format!(
                "draft {} stored under key {}",
                draft.draft_id, row.draft_id
            )));
        }
        Ok(draft)
    }
}
