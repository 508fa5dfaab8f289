use deadpool_postgres::Pool;

use crate::db::{error::Result, types::Product};

/// Fields of a listing that the caller has already validated
#[derive(Debug, Clone, Default)]
pub struct ProductInsert<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub category: Option<&'a str>,
    pub quantity: Option<f64>,
    pub unit: Option<&'a str>,
    pub price_per_unit: Option<f64>,
    pub image_url: Option<&'a str>,
    pub location: Option<&'a str>,
}

pub async fn create(pool: &Pool, seller_id: i32, product: ProductInsert<'_>) -> Result<Product> {
    let conn = pool.get().await?;
    let row = conn
        .query_one(
            "INSERT INTO products
                (seller_id, name, description, category, quantity, unit,
                 price_per_unit, image_url, location)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
            &[
                &seller_id,
                &product.name,
                &product.description,
                &product.category,
                &product.quantity,
                &product.unit,
                &product.price_per_unit,
                &product.image_url,
                &product.location,
            ],
        )
        .await?;
    Ok(Product::from(&row))
}

pub async fn list_by_seller(pool: &Pool, seller_id: i32) -> Result<Vec<Product>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT * FROM products WHERE seller_id = $1 ORDER BY created_at DESC, id DESC",
            &[&seller_id],
        )
        .await?;
    Ok(rows.iter().map(Product::from).collect())
}

/// Listing count and Σ price × quantity; listings missing either value add nothing
pub async fn totals_for_seller(pool: &Pool, seller_id: i32) -> Result<(i64, f64)> {
    let conn = pool.get().await?;
    let row = conn
        .query_one(
            "SELECT COUNT(*),
                    COALESCE(SUM(price_per_unit * quantity), 0)::DOUBLE PRECISION
             FROM products WHERE seller_id = $1",
            &[&seller_id],
        )
        .await?;
    Ok((row.get(0), row.get(1)))
}
