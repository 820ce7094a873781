//! Domain types and errors shared across `tc3-rewards` crates.
//!
//! Nothing in here knows about HTTP or sessions: the offer arithmetic and the
//! user identity model are plain data so they can be tested in isolation.

pub mod error;
pub mod offer;
pub mod user;

pub use error::AppError;
pub use offer::{Discount, Offer, OfferError, Price, ProductCode};
pub use user::{TokenSet, UserContext, UserInfo};
