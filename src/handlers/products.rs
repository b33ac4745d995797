use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::handlers::pagination::{fetch_page, page_offset, PageQuery};
use crate::models::product::Product;
use crate::schema::{categories, products, suppliers};

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    #[serde(rename = "ProductID")]
    pub id: i32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "CategoryID")]
    pub category_id: Option<i32>,
    #[serde(rename = "SupplierID")]
    pub supplier_id: Option<i32>,
    /// Decimal price as a string, e.g. "9.99"
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "Stock")]
    pub stock: i32,
    #[serde(rename = "CategoryName")]
    pub category_name: Option<String>,
    #[serde(rename = "SupplierName")]
    pub supplier_name: Option<String>,
}

impl ProductResponse {
    fn from_row((product, category_name, supplier_name): (Product, Option<String>, Option<String>)) -> Self {
        ProductResponse {
            id: product.id,
            name: product.name,
            category_id: product.category_id,
            supplier_id: product.supplier_id,
            price: product.price.to_string(),
            stock: product.stock,
            category_name,
            supplier_name,
        }
    }
}

/// GET /api/products
///
/// Paginated product list joined with category and supplier names. The page
/// fetch and the total count run concurrently on two pooled connections.
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "Paginated product list"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "store"
)]
pub async fn list_products(
    pool: web::Data<DbPool>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let (page, page_size) = query.resolve();
    let offset = page_offset(page, page_size);

    let rows_pool = pool.get_ref().clone();
    let count_pool = pool.get_ref().clone();

    let result = fetch_page(
        page,
        page_size,
        move || {
            let mut conn = rows_pool.get()?;
            let rows = products::table
                .left_join(categories::table)
                .left_join(suppliers::table)
                .select((
                    Product::as_select(),
                    categories::name.nullable(),
                    suppliers::name.nullable(),
                ))
                .order(products::id.asc())
                .limit(page_size)
                .offset(offset)
                .load::<(Product, Option<String>, Option<String>)>(&mut conn)?;
            Ok(rows.into_iter().map(ProductResponse::from_row).collect())
        },
        move || {
            let mut conn = count_pool.get()?;
            Ok(products::table.count().get_result(&mut conn)?)
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(result))
}
