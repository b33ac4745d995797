use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::suppliers;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = suppliers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Supplier {
    pub id: i32,
    pub name: String,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = suppliers)]
pub struct NewSupplier {
    pub name: String,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
}
