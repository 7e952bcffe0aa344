//! Translation of a [`ListingQueryFilter`] into SQL predicates.
//!
//! Every supplied field adds one `AND` clause with bound parameters; absent
//! fields add nothing, so the empty filter matches every row.

use sqlx::{Postgres, QueryBuilder};

use crate::application::repos::ListingQueryFilter;

pub(crate) const LISTING_COLUMNS: &str = "l.id, l.title, l.description, l.price_cents, \
     l.currency, l.image_url, l.category, l.condition, l.location, l.owner_id, l.owner_name, \
     l.created_at, l.updated_at";

pub(crate) const LISTING_ORDER: &str = " ORDER BY l.created_at DESC, l.id DESC";

/// Append the filter's predicates to a query that already ends in a `WHERE`
/// clause.
pub fn push_listing_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ListingQueryFilter) {
    if let Some(category) = filter.category.as_ref() {
        qb.push(" AND l.category = ");
        qb.push_bind(category.clone());
    }

    if let Some(min) = filter.min_price {
        qb.push(" AND l.price_cents >= ");
        qb.push_bind(min.cents());
    }

    if let Some(max) = filter.max_price {
        qb.push(" AND l.price_cents <= ");
        qb.push_bind(max.cents());
    }

    if let Some(condition) = filter.condition {
        qb.push(" AND l.condition = ");
        qb.push_bind(condition);
    }

    if let Some(search) = filter.search.as_ref() {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (l.title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR l.description ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
pub(crate) fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

pub(crate) fn listing_select() -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT ");
    qb.push(LISTING_COLUMNS);
    qb.push(" FROM listings l WHERE 1=1");
    qb
}
