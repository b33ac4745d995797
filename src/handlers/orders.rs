use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::handlers::pagination::{fetch_page, page_offset, PageQuery};
use crate::models::order::{NewOrder, Order};
use crate::models::order_item::NewOrderItem;
use crate::schema::{customers, order_items, orders};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    #[serde(rename = "ProductID")]
    pub product_id: i32,
    #[serde(rename = "Quantity")]
    pub quantity: i32,
    #[serde(rename = "Price")]
    pub price: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    #[serde(rename = "CustomerID")]
    pub customer_id: i32,
    #[serde(rename = "OrderDate")]
    pub order_date: NaiveDate,
    #[serde(rename = "TotalAmount")]
    pub total_amount: f64,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub message: String,
    #[serde(rename = "OrderID")]
    pub order_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    #[serde(rename = "OrderID")]
    pub id: i64,
    #[serde(rename = "CustomerID")]
    pub customer_id: i32,
    /// ISO date, e.g. "2024-03-05"
    #[serde(rename = "OrderDate")]
    pub order_date: NaiveDate,
    #[serde(rename = "TotalAmount")]
    pub total_amount: String,
    #[serde(rename = "CustomerName")]
    pub customer_name: Option<String>,
}

impl OrderResponse {
    fn from_row((order, customer_name): (Order, Option<String>)) -> Self {
        OrderResponse {
            id: order.id,
            customer_id: order.customer_id,
            order_date: order.order_date,
            total_amount: order.total_amount.to_string(),
            customer_name,
        }
    }
}

fn to_decimal(value: f64, field: &str) -> Result<BigDecimal, AppError> {
    BigDecimal::try_from(value)
        .map_err(|e| AppError::Internal(format!("Invalid {} '{}': {}", field, value, e)))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/orders
///
/// Paginated order list joined with the customer name.
#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Paginated order list"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "store"
)]
pub async fn list_orders(
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
            let rows = orders::table
                .left_join(customers::table)
                .select((Order::as_select(), customers::name.nullable()))
                .order(orders::id.asc())
                .limit(page_size)
                .offset(offset)
                .load::<(Order, Option<String>)>(&mut conn)?;
            Ok(rows.into_iter().map(OrderResponse::from_row).collect())
        },
        move || {
            let mut conn = count_pool.get()?;
            Ok(orders::table.count().get_result(&mut conn)?)
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(result))
}

/// POST /api/orders
///
/// Creates the order header and one item row per input item inside a single
/// database transaction. Items are inserted in input order and the first
/// failure aborts the whole sequence; the generated order id is only
/// reported after commit, so a partial order is never observable.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order created", body = CreateOrderResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "store"
)]
pub async fn create_order(
    pool: web::Data<DbPool>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let pool = pool.get_ref().clone();

    let order_id = web::block(move || {
        let new_order = NewOrder {
            customer_id: body.customer_id,
            order_date: body.order_date,
            total_amount: to_decimal(body.total_amount, "TotalAmount")?,
        };
        let items = body
            .items
            .iter()
            .map(|item| {
                Ok((item.product_id, item.quantity, to_decimal(item.price, "Price")?))
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        let mut conn = pool.get()?;

        conn.transaction::<_, AppError, _>(|conn| {
            let order_id: i64 = diesel::insert_into(orders::table)
                .values(&new_order)
                .returning(orders::id)
                .get_result(conn)?;

            for (product_id, quantity, price) in items {
                diesel::insert_into(order_items::table)
                    .values(&NewOrderItem {
                        order_id,
                        product_id,
                        quantity,
                        price,
                    })
                    .execute(conn)?;
            }

            Ok(order_id)
        })
    })
    .await??;

    Ok(HttpResponse::Ok().json(CreateOrderResponse {
        message: "Order created successfully".to_string(),
        order_id,
    }))
}
