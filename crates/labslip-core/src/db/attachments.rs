//! Deferred attachment stash.
//!
//! Files picked before the case exists are kept here until the slip they
//! belong to has a server id.

use rusqlite::params;
use sha2::{Digest, Sha256};

use super::{Database, DbResult};

/// A file waiting to be uploaded to a slip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAttachment {
    pub attachment_id: String,
    /// Slip client id
    pub slip_id: String,
    pub file_name: String,
    pub content_type: String,
    /// Hex SHA-256 of content
    pub digest: String,
    pub content: Vec<u8>,
    pub created_at: String,
}

impl PendingAttachment {
    pub fn new(slip_id: String, file_name: String, content_type: String, content: Vec<u8>) -> Self {
        let digest = hex::encode(Sha256::digest(&content));
        Self {
            attachment_id: uuid::Uuid::new_v4().to_string(),
            slip_id,
            file_name,
            content_type,
            digest,
            content,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl Database {
    /// Stash an attachment. Returns false when the same content is already
    /// stashed for the slip.
    pub fn stash_attachment(&self, attachment: &PendingAttachment) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            INSERT OR IGNORE INTO pending_attachments (
                attachment_id, slip_id, file_name, content_type, digest, content, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                attachment.attachment_id,
                attachment.slip_id,
                attachment.file_name,
                attachment.content_type,
                attachment.digest,
                attachment.content,
                attachment.created_at,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Attachments waiting for a slip, oldest first.
    pub fn pending_attachments_for_slip(&self, slip_id: &str) -> DbResult<Vec<PendingAttachment>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT attachment_id, slip_id, file_name, content_type, digest, content, created_at
            FROM pending_attachments
            WHERE slip_id = ?
            ORDER BY created_at, rowid
            "#,
        )?;

        let rows = stmt.query_map([slip_id], |row| {
            Ok(PendingAttachment {
                attachment_id: row.get(0)?,
                slip_id: row.get(1)?,
                file_name: row.get(2)?,
                content_type: row.get(3)?,
                digest: row.get(4)?,
                content: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;

        let mut attachments = Vec::new();
        for row in rows {
            attachments.push(row?);
        }
        Ok(attachments)
    }

    /// Count stashed attachments across all slips.
    pub fn pending_attachment_count(&self) -> DbResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pending_attachments", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Remove an attachment once uploaded.
    pub fn remove_attachment(&self, attachment_id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM pending_attachments WHERE attachment_id = ?",
            [attachment_id],
        )?;
        Ok(rows_affected > 0)
    }
}
