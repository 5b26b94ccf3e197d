//! Core types and traits for the tinylink URL shortener.
//!
//! This crate holds the pieces every other crate agrees on: the short code
//! and its format, the persisted [`ShortLink`], the mapping store contract
//! and the [`Shortener`] contract exposed to transports.

pub mod clock;
pub mod error;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, ShortenerError, StorageError, ValidationError};
pub use repository::{ReadRepository, Repository, ShortLink};
pub use shortcode::{Alphabet, CodeFormat, ShortCode};
pub use shortener::Shortener;
