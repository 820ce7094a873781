//! Landing-page offer: four product codes and a discounted price.
//!
//! Prices are kept in integer cents. The discounted price is computed in
//! hundredths of a cent (`base_cents × (100 − discount)`) and rounded half-up
//! to whole cents, which gives the decimal answer for every discount in range:
//! `8.95 × 0.90 = 8.055` displays as `"8.06"`.

use std::fmt;
use std::ops::RangeInclusive;

use rand::Rng;
use serde::Serialize;
use thiserror::Error;

/// Undiscounted price of a bag, in cents.
pub const BASE_PRICE_CENTS: u32 = 895;

/// Number of product codes drawn per offer.
pub const PRODUCT_COUNT: usize = 4;

/// Valid product numbers.
pub const PRODUCT_RANGE: RangeInclusive<u8> = 1..=12;

/// Valid discount percentages.
pub const DISCOUNT_RANGE: RangeInclusive<u8> = 5..=15;

/// Errors produced when constructing offer parts from raw numbers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OfferError {
    #[error("product number {0} is outside 1..=12")]
    ProductOutOfRange(u8),

    #[error("discount {0}% is outside 5..=15")]
    DiscountOutOfRange(u8),
}

/// A product number in `1..=12`, displayed zero-padded to two digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct ProductCode(u8);

impl ProductCode {
    pub fn new(n: u8) -> Result<Self, OfferError> {
        if PRODUCT_RANGE.contains(&n) {
            Ok(Self(n))
        } else {
            Err(OfferError::ProductOutOfRange(n))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl From<ProductCode> for String {
    fn from(code: ProductCode) -> Self {
        code.to_string()
    }
}

/// A discount percentage in `5..=15`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Discount(u8);

impl Discount {
    pub fn new(percent: u8) -> Result<Self, OfferError> {
        if DISCOUNT_RANGE.contains(&percent) {
            Ok(Self(percent))
        } else {
            Err(OfferError::DiscountOutOfRange(percent))
        }
    }

    pub fn percent(self) -> u8 {
        self.0
    }
}

/// A price in whole cents, displayed as `d.cc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct Price {
    cents: u32,
}

impl Price {
    pub fn from_cents(cents: u32) -> Self {
        Self { cents }
    }

    pub fn cents(self) -> u32 {
        self.cents
    }

    /// Apply `discount` to `self`, rounding half-up to the nearest cent.
    pub fn discounted(self, discount: Discount) -> Self {
        let hundredths = self.cents * u32::from(100 - discount.percent());
        Self::from_cents((hundredths + 50) / 100)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl From<Price> for String {
    fn from(price: Price) -> Self {
        price.to_string()
    }
}

/// Everything the landing page shows about today's deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Offer {
    pub products: [ProductCode; PRODUCT_COUNT],
    pub discount: Discount,
    pub price: Price,
}

impl Offer {
    /// Build an offer from already-validated parts, pricing it off [`BASE_PRICE_CENTS`].
    pub fn new(products: [ProductCode; PRODUCT_COUNT], discount: Discount) -> Self {
        Self {
            products,
            discount,
            price: Price::from_cents(BASE_PRICE_CENTS).discounted(discount),
        }
    }

    /// Draw a fresh offer: each product independently from [`PRODUCT_RANGE`]
    /// (repeats allowed) and one discount from [`DISCOUNT_RANGE`].
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let products = std::array::from_fn(|_| ProductCode(rng.random_range(PRODUCT_RANGE)));
        let discount = Discount(rng.random_range(DISCOUNT_RANGE));
        Self::new(products, discount)
    }
}
