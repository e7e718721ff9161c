//! Catalog schema.

/// Bumped whenever a table or column changes shape.
pub const SCHEMA_VERSION: i64 = 1;

pub const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS categories (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT UNIQUE NOT NULL,
    label           TEXT NOT NULL DEFAULT '',
    total_products  INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
    updated_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
);

CREATE TABLE IF NOT EXISTS products (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    name             TEXT UNIQUE NOT NULL,
    category_id      INTEGER REFERENCES categories(id),
    category_name    TEXT,
    label            TEXT,
    link             TEXT,
    version_command  TEXT,
    aliases          TEXT NOT NULL DEFAULT '[]',
    tags             TEXT NOT NULL DEFAULT '[]',
    content_hash     TEXT,
    created_at       TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
    updated_at       TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
);

CREATE TABLE IF NOT EXISTS cycles (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id           INTEGER NOT NULL REFERENCES products(id),
    cycle                TEXT NOT NULL,
    cycle_label          TEXT,
    codename             TEXT,
    release_date         TEXT,
    eol                  TEXT,
    eol_boolean          INTEGER,
    lts                  INTEGER NOT NULL DEFAULT 0,
    lts_from             TEXT,
    support              TEXT,
    support_boolean      INTEGER,
    is_maintained        INTEGER NOT NULL DEFAULT 0,
    latest_version       TEXT,
    latest_release_date  TEXT,
    latest_link          TEXT,
    content_hash         TEXT NOT NULL,
    created_at           TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
    updated_at           TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
    UNIQUE(product_id, cycle)
);

CREATE TABLE IF NOT EXISTS identifiers (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id        INTEGER NOT NULL REFERENCES products(id),
    identifier_type   TEXT NOT NULL,
    identifier_value  TEXT NOT NULL,
    created_at        TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
    updated_at        TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
    UNIQUE(product_id, identifier_type, identifier_value)
);

CREATE TABLE IF NOT EXISTS sync_metadata (
    id                 INTEGER PRIMARY KEY CHECK (id = 1),
    last_full_sync     TEXT,
    last_update_check  TEXT,
    categories_synced  TEXT,
    products_count     INTEGER NOT NULL DEFAULT 0,
    cycles_count       INTEGER NOT NULL DEFAULT 0,
    identifiers_count  INTEGER NOT NULL DEFAULT 0
);

INSERT OR IGNORE INTO sync_metadata (id) VALUES (1);

CREATE INDEX IF NOT EXISTS idx_products_category ON products(category_name);
CREATE INDEX IF NOT EXISTS idx_cycles_product ON cycles(product_id);
CREATE INDEX IF NOT EXISTS idx_cycles_eol ON cycles(eol);
CREATE INDEX IF NOT EXISTS idx_cycles_eol_bool ON cycles(eol_boolean);
CREATE INDEX IF NOT EXISTS idx_identifiers_product ON identifiers(product_id);
CREATE INDEX IF NOT EXISTS idx_identifiers_type_value ON identifiers(identifier_type, identifier_value);
";

/// Column list shared by every query that materializes a [`crate::model::Product`].
pub const PRODUCT_COLUMNS: &str = "p.id, p.name, p.category_name, p.label, p.link, \
     p.version_command, p.aliases, p.tags, p.content_hash";

/// Column list shared by every query that materializes a [`crate::model::Cycle`].
pub const CYCLE_COLUMNS: &str = "c.cycle, c.cycle_label, c.codename, c.release_date, \
     c.eol, c.eol_boolean, c.lts, c.lts_from, c.support, c.support_boolean, c.is_maintained, \
     c.latest_version, c.latest_release_date, c.latest_link";
