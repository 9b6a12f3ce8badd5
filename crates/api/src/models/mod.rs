//! Domain models for the Prime Drip backend.

pub mod cart;
pub mod category;
pub mod product;
pub mod user;

pub use cart::{Cart, CartLine, CartOwner, CartWithItems};
pub use category::Category;
pub use product::{Product, ProductAudience, ProductTag};
pub use user::{Role, User};
