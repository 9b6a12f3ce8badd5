//! Product model and merchandising enums.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use prime_drip_core::{CategoryId, ProductId};

/// A catalog product.
///
/// `active` gates customer-facing visibility: inactive products only show up
/// in the privileged "all" listing.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i64,
    pub brand: String,
    pub image_url: String,
    pub active: bool,
    pub category_id: CategoryId,
    pub tag: Option<ProductTag>,
    pub is_featured: bool,
    pub audience: Option<ProductAudience>,
    pub created_at: DateTime<Utc>,
}

/// Merchandising tag shown on product cards.
///
/// Tags travel on the wire (and are stored) under their display values;
/// unknown values are rejected at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductTag {
    #[serde(rename = "Agotado")]
    SoldOut,
    #[serde(rename = "Nuevo")]
    New,
    #[serde(rename = "Oferta")]
    Sale,
    #[serde(rename = "Destacado")]
    Featured,
    #[serde(rename = "Últimas unidades")]
    LastUnits,
}

impl ProductTag {
    /// Display value stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SoldOut => "Agotado",
            Self::New => "Nuevo",
            Self::Sale => "Oferta",
            Self::Featured => "Destacado",
            Self::LastUnits => "Últimas unidades",
        }
    }

    /// Parse a stored display value back into a tag.
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "Agotado" => Some(Self::SoldOut),
            "Nuevo" => Some(Self::New),
            "Oferta" => Some(Self::Sale),
            "Destacado" => Some(Self::Featured),
            "Últimas unidades" => Some(Self::LastUnits),
            _ => None,
        }
    }
}

/// Target audience for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductAudience {
    #[serde(rename = "Hombre")]
    Men,
    #[serde(rename = "Mujer")]
    Women,
    #[serde(rename = "Niño")]
    Kids,
    #[serde(rename = "Unisex")]
    Unisex,
}

impl ProductAudience {
    /// Display value stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Men => "Hombre",
            Self::Women => "Mujer",
            Self::Kids => "Niño",
            Self::Unisex => "Unisex",
        }
    }

    /// Parse a stored display value back into an audience.
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "Hombre" => Some(Self::Men),
            "Mujer" => Some(Self::Women),
            "Niño" => Some(Self::Kids),
            "Unisex" => Some(Self::Unisex),
            _ => None,
        }
    }
}
