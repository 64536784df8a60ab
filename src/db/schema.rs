//! Database schema and migrations for orgdrive.
//!
//! Migrations are applied sequentially when the database is opened; the
//! schema_version table tracks which have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: Users table - one row per identity-provider principal
    r#"
CREATE TABLE users (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    token_identifier  TEXT NOT NULL UNIQUE,   -- opaque caller identity
    name              TEXT NOT NULL DEFAULT '',
    image             TEXT NOT NULL DEFAULT '',
    created_at        TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_users_token_identifier ON users(token_identifier);
"#,
    // v2: Org memberships - the (org, role) pairs embedded in a user.
    // UNIQUE(user_id, org_id) backs the membership upsert policy.
    r#"
CREATE TABLE org_memberships (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    org_id      TEXT NOT NULL,
    role        TEXT NOT NULL DEFAULT 'member',  -- 'member' or 'admin'
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(user_id, org_id)
);

CREATE INDEX idx_org_memberships_user_id ON org_memberships(user_id);
"#,
    // v3: File metadata, org-scoped, soft-deletable
    r#"
CREATE TABLE files (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    name           TEXT NOT NULL,
    blob_ref       TEXT NOT NULL,              -- opaque blob storage reference
    org_id         TEXT NOT NULL,
    kind           TEXT NOT NULL,
    should_delete  INTEGER NOT NULL DEFAULT 0,
    deleted_at     TEXT,                       -- set on soft delete, cleared on restore
    created_at     TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_files_org_id ON files(org_id);
CREATE INDEX idx_files_should_delete ON files(should_delete);
"#,
    // v4: Favorites - at most one per (user, org, file) triple.
    // The UNIQUE index guards the toggle's insert path against races.
    r#"
CREATE TABLE favorites (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    org_id      TEXT NOT NULL,
    file_id     INTEGER NOT NULL REFERENCES files(id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(user_id, org_id, file_id)
);

CREATE INDEX idx_favorites_user_id_org_id ON favorites(user_id, org_id);
"#,
    // v5: One-time upload tokens backing generated upload URLs
    r#"
CREATE TABLE upload_tokens (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    token             TEXT NOT NULL UNIQUE,
    token_identifier  TEXT NOT NULL,           -- identity the token was issued to
    expires_at        TEXT NOT NULL,
    created_at        TEXT NOT NULL DEFAULT (datetime('now')),
    used_at           TEXT
);

CREATE INDEX idx_upload_tokens_token ON upload_tokens(token);
"#,
];
