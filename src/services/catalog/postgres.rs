use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::AppResult,
    models::Product,
    services::{catalog::ProductCatalog, query_builder::CatalogFilter},
};

const PRODUCT_COLUMNS: &str = "id, title, price, clothing_class, product_type, gender, color, \
     image_url, product_url, brand, average_rating";

/// Catalog backed by the `products` table
#[derive(Clone)]
pub struct PgCatalog {
    db_pool: PgPool,
}

impl PgCatalog {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

/// Escapes LIKE wildcards so user text is matched literally
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Appends the WHERE clause for `filter` to `builder`
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &CatalogFilter) {
    builder.push(" WHERE (");
    if filter.class_terms.is_empty() {
        builder.push("FALSE");
    }
    for (i, term) in filter.class_terms.iter().enumerate() {
        if i > 0 {
            builder.push(" OR ");
        }
        builder.push("clothing_class ILIKE ");
        builder.push_bind(like_pattern(term));
    }
    builder.push(")");

    if let Some(product_type) = &filter.product_type {
        builder.push(" AND product_type ILIKE ");
        builder.push_bind(like_pattern(product_type));
    }

    if let Some(genders) = &filter.genders {
        builder.push(" AND gender = ANY(");
        builder.push_bind(genders.clone());
        builder.push(")");
    }
}

#[async_trait::async_trait]
impl ProductCatalog for PgCatalog {
    async fn find_products(&self, filter: &CatalogFilter, limit: usize) -> AppResult<Vec<Product>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM products", PRODUCT_COLUMNS));
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY average_rating DESC, id LIMIT ");
        builder.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));

        let products = builder
            .build_query_as::<Product>()
            .fetch_all(&self.db_pool)
            .await?;

        tracing::debug!(
            strictness = %filter.strictness,
            results = products.len(),
            catalog = "postgres",
            "Catalog query completed"
        );

        Ok(products)
    }

    async fn product_types(&self, filter: &CatalogFilter) -> AppResult<Vec<String>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT DISTINCT product_type FROM products");
        push_filter(&mut builder, filter);
        builder.push(" AND product_type IS NOT NULL AND product_type <> '' ORDER BY product_type");

        let types = builder
            .build_query_scalar::<String>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(types)
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
