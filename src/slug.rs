//! Unique, URL-safe product slugs.

use rand::Rng;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entities::product;

/// Length of the random token appended to disambiguate colliding slugs.
pub const TOKEN_LEN: usize = 6;

/// Base used when a title normalizes to nothing (e.g. all punctuation).
pub const FALLBACK_BASE: &str = "product";

// Lowercase alphabet so slugs stay lowercase end to end.
const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Normalize a title into its slug base: lowercase ASCII alphanumerics joined
/// by single `-` separators, no leading or trailing separator.
///
/// Whitespace, hyphens and underscores become separators; every other
/// non-alphanumeric character is dropped outright, so `"Men's"` turns into
/// `"mens"` rather than `"men-s"`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_separator = true;
        }
    }
    if slug.is_empty() {
        FALLBACK_BASE.to_string()
    } else {
        slug
    }
}

/// Append a fresh random token to a slug base.
pub fn disambiguate(base: &str) -> String {
    let mut rng = rand::thread_rng();
    let token: String = (0..TOKEN_LEN)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect();
    format!("{}-{}", base, token)
}

/// Derive a slug for `title` that no stored product currently uses.
///
/// Read-only: callers persist the result themselves. The unique index on
/// `products.slug` stays authoritative under concurrent creation; this probe
/// is the fast path that avoids burning write attempts.
pub async fn unique_slug<C: ConnectionTrait>(db: &C, title: &str) -> Result<String, DbErr> {
    let base = slugify(title);
    if !slug_in_use(db, &base).await? {
        return Ok(base);
    }
    loop {
        let candidate = disambiguate(&base);
        if !slug_in_use(db, &candidate).await? {
            return Ok(candidate);
        }
    }
}

async fn slug_in_use<C: ConnectionTrait>(db: &C, slug: &str) -> Result<bool, DbErr> {
    let hits = product::Entity::find()
        .filter(product::Column::Slug.eq(slug))
        .count(db)
        .await?;
    Ok(hits > 0)
}
