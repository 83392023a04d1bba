//! SQLite schema definition.

/// Complete database schema for the local case cache.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Case Drafts (case design cache - one row per in-progress case)
-- ============================================================================

CREATE TABLE IF NOT EXISTS case_drafts (
    draft_id TEXT PRIMARY KEY,
    payload TEXT NOT NULL,                       -- JSON CaseDraft
    product_count INTEGER NOT NULL DEFAULT 0,
    submitted INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_drafts_updated ON case_drafts(updated_at);

-- ============================================================================
-- Product Selections (teeth + extractions, keyed by stable product id)
-- ============================================================================

CREATE TABLE IF NOT EXISTS product_selections (
    product_id TEXT PRIMARY KEY,                 -- Product client UUID
    catalog_id INTEGER NOT NULL,
    draft_id TEXT NOT NULL,
    maxillary TEXT NOT NULL DEFAULT '{}',        -- JSON ArchSelection
    mandibular TEXT NOT NULL DEFAULT '{}',       -- JSON ArchSelection
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_selections_catalog ON product_selections(catalog_id);
CREATE INDEX IF NOT EXISTS idx_selections_draft ON product_selections(draft_id);

-- ============================================================================
-- Pending Attachments (uploaded once the slip has a server id)
-- ============================================================================

CREATE TABLE IF NOT EXISTS pending_attachments (
    attachment_id TEXT PRIMARY KEY,
    slip_id TEXT NOT NULL,                       -- Slip client UUID
    file_name TEXT NOT NULL,
    content_type TEXT NOT NULL,
    digest TEXT NOT NULL,                        -- SHA-256 of content
    content BLOB NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE (slip_id, digest)
);

CREATE INDEX IF NOT EXISTS idx_attachments_slip ON pending_attachments(slip_id);

-- ============================================================================
-- Delivery Dates (reported by the backend after submission)
-- ============================================================================

CREATE TABLE IF NOT EXISTS delivery_dates (
    slip_server_id INTEGER PRIMARY KEY,
    slip_id TEXT NOT NULL,                       -- Slip client UUID
    draft_id TEXT NOT NULL,
    delivery_date TEXT NOT NULL,
    recorded_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Local State (session info, fetched catalog)
-- ============================================================================

CREATE TABLE IF NOT EXISTS local_state (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
