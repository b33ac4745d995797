use actix_web::{web, HttpResponse};
use bigdecimal::{BigDecimal, ToPrimitive};
use diesel::dsl::sum;
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::schema::{customers, orders, products};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_products: i64,
    pub total_orders: i64,
    pub total_customers: i64,
    pub total_revenue: f64,
}

/// GET /api/stats
///
/// Dashboard aggregates. The four queries run concurrently, each on its own
/// pooled connection.
#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Aggregate store statistics", body = StatsResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "store"
)]
pub async fn get_stats(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let p1 = pool.get_ref().clone();
    let p2 = pool.get_ref().clone();
    let p3 = pool.get_ref().clone();
    let p4 = pool.get_ref().clone();

    let (total_products, total_orders, total_customers, revenue) = tokio::try_join!(
        web::block(move || {
            let mut conn = p1.get()?;
            Ok::<i64, AppError>(products::table.count().get_result(&mut conn)?)
        }),
        web::block(move || {
            let mut conn = p2.get()?;
            Ok::<i64, AppError>(orders::table.count().get_result(&mut conn)?)
        }),
        web::block(move || {
            let mut conn = p3.get()?;
            Ok::<i64, AppError>(customers::table.count().get_result(&mut conn)?)
        }),
        web::block(move || {
            let mut conn = p4.get()?;
            let revenue: Option<BigDecimal> = orders::table
                .select(sum(orders::total_amount))
                .first(&mut conn)?;
            Ok::<BigDecimal, AppError>(revenue.unwrap_or_else(|| BigDecimal::from(0)))
        }),
    )?;

    Ok(HttpResponse::Ok().json(StatsResponse {
        total_products: total_products?,
        total_orders: total_orders?,
        total_customers: total_customers?,
        total_revenue: revenue?.to_f64().unwrap_or(0.0),
    }))
}
