pub mod challan;
pub mod customer;
pub mod product;
pub mod quote;
pub mod stock;
