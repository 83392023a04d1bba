//! Per-product teeth and extraction selections.

use std::collections::BTreeSet;

use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::{Database, DbError, DbResult};
use crate::models::{Arch, ExtractionSelection, Product};

/// Teeth and extractions recorded for one arch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArchSelection {
    #[serde(default)]
    pub teeth: BTreeSet<u8>,
    #[serde(default)]
    pub extractions: ExtractionSelection,
}

impl ArchSelection {
    pub fn is_empty(&self) -> bool {
        self.teeth.is_empty() && self.extractions.is_empty()
    }
}

/// Selections for one product, keyed by its stable client id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSelections {
    pub product_id: String,
    pub catalog_id: i64,
    pub draft_id: String,
    pub maxillary: ArchSelection,
    pub mandibular: ArchSelection,
}

impl ProductSelections {
    /// Snapshot a product's selections.
    pub fn from_product(draft_id: &str, product: &Product) -> Self {
        let snapshot = |arch: Arch| {
            let config = product.configuration(arch);
            ArchSelection {
                teeth: config.teeth.clone(),
                extractions: config.extractions.clone(),
            }
        };
        Self {
            product_id: product.client_id.clone(),
            catalog_id: product.catalog_id,
            draft_id: draft_id.to_string(),
            maxillary: snapshot(Arch::Maxillary),
            mandibular: snapshot(Arch::Mandibular),
        }
    }

    pub fn arch(&self, arch: Arch) -> &ArchSelection {
        match arch {
            Arch::Maxillary => &self.maxillary,
            Arch::Mandibular => &self.mandibular,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.maxillary.is_empty() && self.mandibular.is_empty()
    }
}

impl Database {
    /// Insert or replace a product's selections.
    pub fn save_product_selections(&self, selections: &ProductSelections) -> DbResult<()> {
        let maxillary = serde_json::to_string(&selections.maxillary)?;
        let mandibular = serde_json::to_string(&selections.mandibular)?;

        self.conn.execute(
            r#"
            INSERT INTO product_selections (
                product_id, catalog_id, draft_id, maxillary, mandibular, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(product_id) DO UPDATE SET
                catalog_id = excluded.catalog_id,
                draft_id = excluded.draft_id,
                maxillary = excluded.maxillary,
                mandibular = excluded.mandibular,
                updated_at = excluded.updated_at
            "#,
            params![
                selections.product_id,
                selections.catalog_id,
                selections.draft_id,
                maxillary,
                mandibular,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get selections by product client id.
    pub fn get_product_selections(&self, product_id: &str) -> DbResult<Option<ProductSelections>> {
        self.conn
            .query_row(
                r#"
                SELECT product_id, catalog_id, draft_id, maxillary, mandibular
                FROM product_selections
                WHERE product_id = ?
                "#,
                [product_id],
                SelectionRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Most recent non-empty selections recorded for a catalog product in a
    /// draft. Rows owned by a product in `skip` are never returned.
    pub fn latest_selections_for_catalog(
        &self,
        draft_id: &str,
        catalog_id: i64,
        skip: &[&str],
    ) -> DbResult<Option<ProductSelections>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT product_id, catalog_id, draft_id, maxillary, mandibular
            FROM product_selections
            WHERE draft_id = ?1 AND catalog_id = ?2
            ORDER BY updated_at DESC, rowid DESC
            "#,
        )?;

        let rows = stmt.query_map(params![draft_id, catalog_id], SelectionRow::from_row)?;
        for row in rows {
            let selections: ProductSelections = row?.try_into()?;
            if !selections.is_empty() && !skip.contains(&selections.product_id.as_str()) {
                return Ok(Some(selections));
            }
        }
        Ok(None)
    }

    /// Delete all selections stored for a draft.
    pub fn delete_selections_for_draft(&self, draft_id: &str) -> DbResult<usize> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM product_selections WHERE draft_id = ?", [draft_id])?;
        Ok(rows_affected)
    }

    /// Delete the draft's selection rows whose product is not in `keep`.
    pub fn prune_selections(&self, draft_id: &str, keep: &[&str]) -> DbResult<usize> {
        let mut stmt = self
            .conn
            .prepare("SELECT product_id FROM product_selections WHERE draft_id = ?")?;
        let stale: Vec<String> = stmt
            .query_map([draft_id], |row| row.get::<_, String>(0))?
            .filter(|id| id.as_ref().map_or(true, |id| !keep.contains(&id.as_str())))
            .collect::<Result<_, _>>()?;

        let mut removed = 0;
        for product_id in &stale {
            if self.delete_product_selections(product_id)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Delete selections of one product.
    pub fn delete_product_selections(&self, product_id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM product_selections WHERE product_id = ?", [product_id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct SelectionRow {
    product_id: String,
    catalog_id: i64,
    draft_id: String,
    maxillary: String,
    mandibular: String,
}

impl SelectionRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            product_id: row.get(0)?,
            catalog_id: row.get(1)?,
            draft_id: row.get(2)?,
            maxillary: row.get(3)?,
            mandibular: row.get(4)?,
        })
    }
}

impl TryFrom<SelectionRow> for ProductSelections {
    type Error = DbError;

    fn try_from(row: SelectionRow) -> Result<Self, Self::Error> {
        Ok(ProductSelections {
            product_id: row.product_id,
            catalog_id: row.catalog_id,
            draft_id: row.draft_id,
            maxillary: serde_json::from_str(&row.maxillary)?,
            mandibular: serde_json::from_str(&row.mandibular)?,
        })
    }
}
