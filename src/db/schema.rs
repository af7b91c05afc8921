//! Database schema and migrations for bhub.
//!
//! Migrations are applied sequentially when the database is first opened
//! or upgraded; the schema_version table tracks progress.

/// Database migrations (SQLite dialect).
#[cfg(feature = "sqlite")]
pub const MIGRATIONS: &[&str] = &[
    // v1: Users table for admin-panel accounts
    r#"
CREATE TABLE users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    password      TEXT NOT NULL,           -- Argon2 hash
    display_name  TEXT NOT NULL,
    role          TEXT NOT NULL DEFAULT 'member',  -- 'member', 'admin'
    created_at    TEXT NOT NULL DEFAULT (datetime('now')),
    last_login    TEXT,
    is_active     INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX idx_users_username ON users(username);
CREATE INDEX idx_users_role ON users(role);
"#,
    // v2: Refresh tokens for session management
    r#"
CREATE TABLE refresh_tokens (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    token       TEXT NOT NULL UNIQUE,
    expires_at  TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    revoked_at  TEXT
);

CREATE INDEX idx_refresh_tokens_user_id ON refresh_tokens(user_id);
CREATE INDEX idx_refresh_tokens_token ON refresh_tokens(token);
"#,
    // v3: Feeds and categories
    r#"
CREATE TABLE feeds (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    url           TEXT NOT NULL UNIQUE,
    title         TEXT NOT NULL,
    description   TEXT,
    site_url      TEXT,
    country       TEXT,
    is_active     INTEGER NOT NULL DEFAULT 1,
    last_sync_at  TEXT,
    error_count   INTEGER NOT NULL DEFAULT 0,
    last_error    TEXT,
    created_at    TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at    TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_feeds_is_active ON feeds(is_active);

CREATE TABLE categories (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    slug        TEXT NOT NULL UNIQUE,
    color       TEXT,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
    // v4: Articles with ordered author links
    r#"
CREATE TABLE articles (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    feed_id       INTEGER NOT NULL REFERENCES feeds(id) ON DELETE CASCADE,
    category_id   INTEGER REFERENCES categories(id) ON DELETE SET NULL,
    guid          TEXT NOT NULL,
    title         TEXT NOT NULL,
    abstract      TEXT,
    original_url  TEXT,
    published_at  TEXT,
    created_at    TEXT NOT NULL DEFAULT (datetime('now')),
    highlighted   INTEGER NOT NULL DEFAULT 0,
    is_archived   INTEGER NOT NULL DEFAULT 0,
    view_count    INTEGER NOT NULL DEFAULT 0,
    embedding     TEXT,                     -- JSON array of f32
    UNIQUE(feed_id, guid)
);

CREATE INDEX idx_articles_feed_id ON articles(feed_id);
CREATE INDEX idx_articles_category_id ON articles(category_id);
CREATE INDEX idx_articles_created_at ON articles(created_at);
CREATE INDEX idx_articles_original_url ON articles(original_url);
CREATE INDEX idx_articles_highlighted ON articles(highlighted);
CREATE INDEX idx_articles_is_archived ON articles(is_archived);

CREATE TABLE authors (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL UNIQUE
);

CREATE TABLE article_authors (
    article_id  INTEGER NOT NULL REFERENCES articles(id) ON DELETE CASCADE,
    author_id   INTEGER NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
    position    INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (article_id, author_id)
);

CREATE INDEX idx_article_authors_author_id ON article_authors(author_id);
"#,
    // v5: Banner ads
    r#"
CREATE TABLE banners (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    title        TEXT NOT NULL,
    image_url    TEXT NOT NULL,
    target_url   TEXT,
    position     TEXT NOT NULL,
    starts_at    TEXT NOT NULL,
    ends_at      TEXT NOT NULL,
    priority     INTEGER NOT NULL DEFAULT 0,
    click_count  INTEGER NOT NULL DEFAULT 0,
    is_active    INTEGER NOT NULL DEFAULT 1,
    created_at   TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_banners_position ON banners(position);
CREATE INDEX idx_banners_is_active ON banners(is_active);
"#,
];

/// Database migrations (PostgreSQL dialect).
#[cfg(feature = "postgres")]
pub const MIGRATIONS: &[&str] = &[
    // v1: Users table for admin-panel accounts
    r#"
CREATE TABLE users (
    id            BIGSERIAL PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    password      TEXT NOT NULL,
    display_name  TEXT NOT NULL,
    role          TEXT NOT NULL DEFAULT 'member',
    created_at    TEXT NOT NULL DEFAULT TO_CHAR(NOW() AT TIME ZONE 'UTC', 'YYYY-MM-DD HH24:MI:SS'),
    last_login    TEXT,
    is_active     BOOLEAN NOT NULL DEFAULT TRUE
);

CREATE INDEX idx_users_username ON users(username);
CREATE INDEX idx_users_role ON users(role);
"#,
    // v2: Refresh tokens for session management
    r#"
CREATE TABLE refresh_tokens (
    id          BIGSERIAL PRIMARY KEY,
    user_id     BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    token       TEXT NOT NULL UNIQUE,
    expires_at  TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT TO_CHAR(NOW() AT TIME ZONE 'UTC', 'YYYY-MM-DD HH24:MI:SS'),
    revoked_at  TEXT
);

CREATE INDEX idx_refresh_tokens_user_id ON refresh_tokens(user_id);
CREATE INDEX idx_refresh_tokens_token ON refresh_tokens(token);
"#,
    // v3: Feeds and categories
    r#"
CREATE TABLE feeds (
    id            BIGSERIAL PRIMARY KEY,
    url           TEXT NOT NULL UNIQUE,
    title         TEXT NOT NULL,
    description   TEXT,
    site_url      TEXT,
    country       TEXT,
    is_active     BOOLEAN NOT NULL DEFAULT TRUE,
    last_sync_at  TEXT,
    error_count   INTEGER NOT NULL DEFAULT 0,
    last_error    TEXT,
    created_at    TEXT NOT NULL DEFAULT TO_CHAR(NOW() AT TIME ZONE 'UTC', 'YYYY-MM-DD HH24:MI:SS'),
    updated_at    TEXT NOT NULL DEFAULT TO_CHAR(NOW() AT TIME ZONE 'UTC', 'YYYY-MM-DD HH24:MI:SS')
);

CREATE INDEX idx_feeds_is_active ON feeds(is_active);

CREATE TABLE categories (
    id          BIGSERIAL PRIMARY KEY,
    name        TEXT NOT NULL,
    slug        TEXT NOT NULL UNIQUE,
    color       TEXT,
    created_at  TEXT NOT NULL DEFAULT TO_CHAR(NOW() AT TIME ZONE 'UTC', 'YYYY-MM-DD HH24:MI:SS')
);
"#,
    // v4: Articles with ordered author links
    r#"
CREATE TABLE articles (
    id            BIGSERIAL PRIMARY KEY,
    feed_id       BIGINT NOT NULL REFERENCES feeds(id) ON DELETE CASCADE,
    category_id   BIGINT REFERENCES categories(id) ON DELETE SET NULL,
    guid          TEXT NOT NULL,
    title         TEXT NOT NULL,
    abstract      TEXT,
    original_url  TEXT,
    published_at  TEXT,
    created_at    TEXT NOT NULL DEFAULT TO_CHAR(NOW() AT TIME ZONE 'UTC', 'YYYY-MM-DD HH24:MI:SS'),
    highlighted   BOOLEAN NOT NULL DEFAULT FALSE,
    is_archived   BOOLEAN NOT NULL DEFAULT FALSE,
    view_count    BIGINT NOT NULL DEFAULT 0,
    embedding     TEXT,
    UNIQUE(feed_id, guid)
);

CREATE INDEX idx_articles_feed_id ON articles(feed_id);
CREATE INDEX idx_articles_category_id ON articles(category_id);
CREATE INDEX idx_articles_created_at ON articles(created_at);
CREATE INDEX idx_articles_original_url ON articles(original_url);
CREATE INDEX idx_articles_highlighted ON articles(highlighted);
CREATE INDEX idx_articles_is_archived ON articles(is_archived);

CREATE TABLE authors (
    id    BIGSERIAL PRIMARY KEY,
    name  TEXT NOT NULL UNIQUE
);

CREATE TABLE article_authors (
    article_id  BIGINT NOT NULL REFERENCES articles(id) ON DELETE CASCADE,
    author_id   BIGINT NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
    position    INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (article_id, author_id)
);

CREATE INDEX idx_article_authors_author_id ON article_authors(author_id);
"#,
    // v5: Banner ads
    r#"
CREATE TABLE banners (
    id           BIGSERIAL PRIMARY KEY,
    title        TEXT NOT NULL,
    image_url    TEXT NOT NULL,
    target_url   TEXT,
    position     TEXT NOT NULL,
    starts_at    TEXT NOT NULL,
    ends_at      TEXT NOT NULL,
    priority     INTEGER NOT NULL DEFAULT 0,
    click_count  BIGINT NOT NULL DEFAULT 0,
    is_active    BOOLEAN NOT NULL DEFAULT TRUE,
    created_at   TEXT NOT NULL DEFAULT TO_CHAR(NOW() AT TIME ZONE 'UTC', 'YYYY-MM-DD HH24:MI:SS')
);

CREATE INDEX idx_banners_position ON banners(position);
CREATE INDEX idx_banners_is_active ON banners(is_active);
"#,
];
