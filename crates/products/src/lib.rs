//! Product catalog domain module (event-sourced).
//!
//! The catalog owns each product's base sale price. Price lists read it but
//! never change it.

pub mod product;

pub use product::{
    ActivateProduct, ArchiveProduct, BasePriceChanged, ChangeBasePrice, CreateProduct, Product,
    ProductActivated, ProductArchived, ProductCommand, ProductCreated, ProductEvent, ProductId,
    ProductStatus,
};
