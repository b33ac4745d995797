pub mod categories;
pub mod customers;
pub mod files;
pub mod load;
pub mod orders;
pub mod pagination;
pub mod products;
pub mod stats;
