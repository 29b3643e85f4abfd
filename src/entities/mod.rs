//! Stored records of the transport business
//!
//! Each entity lives in its own module with a `model` (record, status
//! lifecycle and request DTOs), `handlers` and a route `descriptor`.

#[macro_use]
pub mod macros;

pub mod booking;
pub mod document;
pub mod purchase_order;
pub mod quotation;
pub mod sales_order;
pub mod transaction;
pub mod user;
pub mod vehicle;

use regex::Regex;
use std::sync::LazyLock;

pub use booking::{Booking, BookingStatus};
pub use document::{Document, DocumentKind, DocumentStatus};
pub use purchase_order::{PurchaseOrder, PurchaseOrderStatus};
pub use quotation::{Quotation, QuotationStatus};
pub use sales_order::{SalesOrder, SalesOrderStatus};
pub use transaction::{FinancialTransaction, TransactionDirection, TransactionStatus};
pub use user::{User, UserProfile, UserStatus};
pub use vehicle::{Vehicle, VehicleStatus, VehicleType};

/// Currency used when a request does not name one
pub const DEFAULT_CURRENCY: &str = "INR";

pub(crate) static CURRENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid currency regex"));
