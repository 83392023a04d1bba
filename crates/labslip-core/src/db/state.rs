//! Key/value local state (session info, fetched catalog).

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::{Catalog, Session};

const SESSION_KEY: &str = "session";
const CATALOG_KEY: &str = "catalog";

impl Database {
    /// Get a local state value.
    pub fn get_state(&self, key: &str) -> DbResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM local_state WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Set a local state value.
    pub fn set_state(&self, key: &str, value: &str) -> DbResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO local_state (key, value, updated_at) VALUES (?, ?, datetime('now'))",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a local state value.
    pub fn remove_state(&self, key: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM local_state WHERE key = ?", [key])?;
        Ok(rows_affected > 0)
    }

    /// Stored session, if the host signed in.
    pub fn get_session(&self) -> DbResult<Option<Session>> {
        self.get_state(SESSION_KEY)?
            .map(|json| serde_json::from_str::<Session>(&json))
            .transpose()
            .map_err(Into::into)
    }

    pub fn save_session(&self, session: &Session) -> DbResult<()> {
        self.set_state(SESSION_KEY, &serde_json::to_string(session)?)
    }

    pub fn clear_session(&self) -> DbResult<bool> {
        self.remove_state(SESSION_KEY)
    }

    /// Last fetched lookup catalog.
    pub fn get_cached_catalog(&self) -> DbResult<Option<Catalog>> {
        self.get_state(CATALOG_KEY)?
            .map(|json| serde_json::from_str::<Catalog>(&json))
            .transpose()
            .map_err(Into::into)
    }

    pub fn cache_catalog(&self, catalog: &Catalog) -> DbResult<()> {
        self.set_state(CATALOG_KEY, &serde_json::to_string(catalog)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Grade;

    #[test]
    fn test_state_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_state("missing").unwrap(), None);

        db.set_state("theme", "dark").unwrap();
        db.set_state("theme", "light").unwrap();
        assert_eq!(db.get_state("theme").unwrap(), Some("light".into()));

        assert!(db.remove_state("theme").unwrap());
        assert_eq!(db.get_state("theme").unwrap(), None);
    }

    #[test]
    fn test_session() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_session().unwrap().is_none());

        let session = Session {
            user_id: Some(7),
            display_name: Some("Dr. Smith".into()),
            location_id: Some(3),
            api_token: Some("token".into()),
        };
        db.save_session(&session).unwrap();
        assert_eq!(db.get_session().unwrap(), Some(session));

        assert!(db.clear_session().unwrap());
        assert!(db.get_session().unwrap().is_none());
    }

    #[test]
    fn test_cached_catalog() {
        let db = Database::open_in_memory().unwrap();
        let catalog = Catalog {
            grades: vec![Grade { id: 1, name: "Economy".into() }],
            ..Catalog::default()
        };
        db.cache_catalog(&catalog).unwrap();
        assert_eq!(db.get_cached_catalog().unwrap(), Some(catalog));
    }
}
