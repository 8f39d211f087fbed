pub mod auth;
pub mod cart;
pub mod categories;
pub mod images;
pub mod orders;
pub mod products;
pub mod users;
