//! Human-readable document numbers (`BK-20260114-3FA9C2`)

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const BOOKING: &str = "BK";
pub const QUOTATION: &str = "QT";
pub const SALES_ORDER: &str = "SO";
pub const PURCHASE_ORDER: &str = "PO";
pub const TRANSACTION: &str = "TX";

/// `<PREFIX>-<YYYYMMDD>-<first 6 hex digits of the id, upper-case>`
pub fn generate(prefix: &str, id: &Uuid, at: DateTime<Utc>) -> String {
    let hex = id.simple().to_string();
    format!(
        "{}-{}-{}",
        prefix,
        at.format("%Y%m%d"),
        hex[..6].to_ascii_uppercase()
    )
}
