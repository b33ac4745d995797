use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::handlers::pagination::{fetch_page, page_offset, PageQuery};
use crate::models::customer::Customer;
use crate::schema::customers;

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerResponse {
    #[serde(rename = "CustomerID")]
    pub id: i32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: Option<String>,
    #[serde(rename = "Phone")]
    pub phone: Option<String>,
    #[serde(rename = "Address")]
    pub address: Option<String>,
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        CustomerResponse {
            id: c.id,
            name: c.name,
            email: c.email,
            phone: c.phone,
            address: c.address,
        }
    }
}

/// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    responses(
        (status = 200, description = "Paginated customer list"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "store"
)]
pub async fn list_customers(
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
            let rows = customers::table
                .select(Customer::as_select())
                .order(customers::id.asc())
                .limit(page_size)
                .offset(offset)
                .load::<Customer>(&mut conn)?;
            Ok(rows.into_iter().map(CustomerResponse::from).collect())
        },
        move || {
            let mut conn = count_pool.get()?;
            Ok(customers::table.count().get_result(&mut conn)?)
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(result))
}
