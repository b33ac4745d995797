use bigdecimal::BigDecimal;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::products;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub category_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub price: BigDecimal,
    pub stock: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProduct {
    pub name: String,
    pub category_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub price: BigDecimal,
    pub stock: i32,
}
