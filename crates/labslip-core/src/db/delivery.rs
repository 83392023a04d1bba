//! Delivery dates reported by the backend.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};

impl Database {
    /// Record the delivery date of a submitted slip.
    pub fn record_delivery_date(
        &self,
        slip_server_id: i64,
        slip_id: &str,
        draft_id: &str,
        delivery_date: &str,
    ) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO delivery_dates (slip_server_id, slip_id, draft_id, delivery_date, recorded_at)
            VALUES (?1, ?2, ?3, ?4, datetime('now'))
            "#,
            params![slip_server_id, slip_id, draft_id, delivery_date],
        )?;
        Ok(())
    }

    /// Delivery date for a submitted slip.
    pub fn get_delivery_date(&self, slip_server_id: i64) -> DbResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT delivery_date FROM delivery_dates WHERE slip_server_id = ?",
                [slip_server_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Delivery dates of a draft as (slip server id, date).
    pub fn delivery_dates_for_draft(&self, draft_id: &str) -> DbResult<Vec<(i64, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT slip_server_id, delivery_date FROM delivery_dates WHERE draft_id = ? ORDER BY slip_server_id",
        )?;
        let rows = stmt.query_map([draft_id], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut dates = Vec::new();
        for row in rows {
            dates.push(row?);
        }
        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_get() {
        let db = Database::open_in_memory().unwrap();
        db.record_delivery_date(501, "slip-a", "draft-1", "2026-11-02")
            .unwrap();
        db.record_delivery_date(502, "slip-b", "draft-1", "2026-11-05")
            .unwrap();

        assert_eq!(db.get_delivery_date(501).unwrap(), Some("2026-11-02".into()));
        assert_eq!(db.get_delivery_date(999).unwrap(), None);

        let dates = db.delivery_dates_for_draft("draft-1").unwrap();
        assert_eq!(dates, vec![(501, "2026-11-02".into()), (502, "2026-11-05".into())]);
    }

    #[test]
    fn test_record_replaces() {
        let db = Database::open_in_memory().unwrap();
        db.record_delivery_date(501, "slip-a", "draft-1", "2026-11-02")
            .unwrap();
        db.record_delivery_date(501, "slip-a", "draft-1", "2026-11-09")
            .unwrap();
        assert_eq!(db.get_delivery_date(501).unwrap(), Some("2026-11-09".into()));
    }
}
