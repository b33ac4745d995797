use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::handlers::pagination::{fetch_page, page_offset, PageQuery};
use crate::models::category::Category;
use crate::schema::categories;

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    #[serde(rename = "CategoryID")]
    pub id: i32,
    #[serde(rename = "CategoryName")]
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        CategoryResponse {
            id: c.id,
            name: c.name,
        }
    }
}

/// GET /api/categories
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Paginated category list"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "store"
)]
pub async fn list_categories(
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
            let rows = categories::table
                .select(Category::as_select())
                .order(categories::id.asc())
                .limit(page_size)
                .offset(offset)
                .load::<Category>(&mut conn)?;
            Ok(rows.into_iter().map(CategoryResponse::from).collect())
        },
        move || {
            let mut conn = count_pool.get()?;
            Ok(categories::table.count().get_result(&mut conn)?)
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(result))
}
