//! Per-role summaries

use crate::core::auth::{AuthPolicy, Role};
use crate::core::{CurrentUser, DataService, Entity, Lifecycle, LezitResult};
use crate::entities::{
    Booking, BookingStatus, PurchaseOrderStatus, QuotationStatus, TransactionDirection,
    TransactionStatus, UserStatus,
};
use crate::storage::Stores;
use serde::Serialize;
use std::collections::BTreeMap;

const RECENT_BOOKINGS: usize = 5;

/// Count per status, with every status present
pub type StatusCounts = BTreeMap<&'static str, usize>;

fn count_statuses<S: Lifecycle>(statuses: impl IntoIterator<Item = S>) -> StatusCounts {
    let mut counts: StatusCounts = S::all().iter().map(|s| (s.as_str(), 0)).collect();
    for status in statuses {
        *counts.entry(status.as_str()).or_default() += 1;
    }
    counts
}

fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn is_active_trip(status: BookingStatus) -> bool {
    matches!(
        status,
        BookingStatus::Confirmed | BookingStatus::Assigned | BookingStatus::InTransit
    )
}

#[derive(Debug, Serialize)]
pub struct CustomerDashboard {
    pub total_bookings: usize,
    pub bookings_by_status: StatusCounts,
    pub active_bookings: usize,
    pub pending_quotations: usize,
    pub amount_paid: f64,
    pub recent_bookings: Vec<Booking>,
}

#[derive(Debug, Serialize)]
pub struct VendorDashboard {
    pub vehicles_by_status: StatusCounts,
    pub total_vehicles: usize,
    pub driver_count: usize,
    pub bookings_by_status: StatusCounts,
    pub purchase_orders_by_status: StatusCounts,
    pub total_earned: f64,
    pub pending_payouts: f64,
}

#[derive(Debug, Serialize)]
pub struct DriverDashboard {
    pub current_trip: Option<Booking>,
    pub completed_trips: usize,
    pub upcoming_assignments: Vec<Booking>,
}

#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub users_by_role: BTreeMap<&'static str, usize>,
    pub suspended_users: usize,
    pub bookings_by_status: StatusCounts,
    pub vehicles_by_status: StatusCounts,
    pub sales_orders_by_status: StatusCounts,
    pub open_quotations: usize,
    pub revenue: f64,
    pub refunded: f64,
    pub payouts: f64,
    pub gross_margin: f64,
}

pub struct DashboardService {
    stores: Stores,
}

impl DashboardService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn customer(&self, user: &CurrentUser) -> LezitResult<CustomerDashboard> {
        user.require(&AuthPolicy::role(Role::Customer))?;
        let key = user.id.to_string();

        let mut bookings = self.stores.bookings.search("customer_id", &key).await?;
        let quotations = self.stores.quotations.search("customer_id", &key).await?;
        let payments = self.stores.transactions.search("counterparty_id", &key).await?;

        bookings.sort_by_key(|b| std::cmp::Reverse(b.created_at()));
        let amount_paid: f64 = payments
            .iter()
            .filter(|t| {
                t.direction == TransactionDirection::Incoming
                    && t.status == TransactionStatus::Completed
            })
            .map(|t| t.amount)
            .sum();

        Ok(CustomerDashboard {
            total_bookings: bookings.len(),
            bookings_by_status: count_statuses(bookings.iter().map(|b| b.status)),
            active_bookings: bookings.iter().filter(|b| is_active_trip(b.status)).count(),
            pending_quotations: quotations
                .iter()
                .filter(|q| q.status == QuotationStatus::Sent)
                .count(),
            amount_paid: round_money(amount_paid),
            recent_bookings: bookings.into_iter().take(RECENT_BOOKINGS).collect(),
        })
    }

    pub async fn vendor(&self, user: &CurrentUser) -> LezitResult<VendorDashboard> {
        user.require(&AuthPolicy::role(Role::Vendor))?;
        let key = user.id.to_string();

        let vehicles = self.stores.vehicles.search("vendor_id", &key).await?;
        let drivers = self.stores.users.search("vendor_id", &key).await?;
        let bookings = self.stores.bookings.search("vendor_id", &key).await?;
        let purchases = self.stores.purchase_orders.search("vendor_id", &key).await?;
        let payouts = self.stores.transactions.search("counterparty_id", &key).await?;

        let total_earned: f64 = payouts
            .iter()
            .filter(|t| {
                t.direction == TransactionDirection::Outgoing
                    && t.status == TransactionStatus::Completed
            })
            .map(|t| t.amount)
            .sum();
        let committed: f64 = purchases
            .iter()
            .filter(|po| {
                matches!(
                    po.status,
                    PurchaseOrderStatus::Accepted | PurchaseOrderStatus::Completed
                )
            })
            .map(|po| po.amount)
            .sum();

        Ok(VendorDashboard {
            vehicles_by_status: count_statuses(vehicles.iter().map(|v| v.status)),
            total_vehicles: vehicles.len(),
            driver_count: drivers.iter().filter(|d| d.role == Role::Driver).count(),
            bookings_by_status: count_statuses(bookings.iter().map(|b| b.status)),
            purchase_orders_by_status: count_statuses(purchases.iter().map(|po| po.status)),
            total_earned: round_money(total_earned),
            pending_payouts: round_money((committed - total_earned).max(0.0)),
        })
    }

    pub async fn driver(&self, user: &CurrentUser) -> LezitResult<DriverDashboard> {
        user.require(&AuthPolicy::role(Role::Driver))?;

        let mut trips = self
            .stores
            .bookings
            .search("driver_id", &user.id.to_string())
            .await?;
        trips.sort_by_key(|b| b.pickup_date);

        let current_trip = trips
            .iter()
            .find(|b| b.status == BookingStatus::InTransit)
            .or_else(|| trips.iter().find(|b| b.status == BookingStatus::Assigned))
            .cloned();
        let completed_trips = trips
            .iter()
            .filter(|b| matches!(b.status, BookingStatus::Delivered | BookingStatus::Completed))
            .count();
        let current_id = current_trip.as_ref().map(|b| b.id);
        let upcoming_assignments = trips
            .into_iter()
            .filter(|b| b.status == BookingStatus::Assigned && Some(b.id) != current_id)
            .collect();

        Ok(DriverDashboard {
            current_trip,
            completed_trips,
            upcoming_assignments,
        })
    }

    pub async fn admin(&self, user: &CurrentUser) -> LezitResult<AdminStats> {
        user.require(&AuthPolicy::AdminOnly)?;

        let users = self.stores.users.list().await?;
        let bookings = self.stores.bookings.list().await?;
        let vehicles = self.stores.vehicles.list().await?;
        let quotations = self.stores.quotations.list().await?;
        let sales_orders = self.stores.sales_orders.list().await?;
        let transactions = self.stores.transactions.list().await?;

        let mut users_by_role: BTreeMap<&'static str, usize> =
            Role::ALL.iter().map(|r| (r.as_str(), 0)).collect();
        for u in &users {
            *users_by_role.entry(u.role.as_str()).or_default() += 1;
        }

        let total = |direction: TransactionDirection, status: TransactionStatus| -> f64 {
            transactions
                .iter()
                .filter(|t| t.direction == direction && t.status == status)
                .map(|t| t.amount)
                .sum()
        };
        // refunded payments have already left the completed set
        let revenue = total(TransactionDirection::Incoming, TransactionStatus::Completed);
        let refunded = total(TransactionDirection::Incoming, TransactionStatus::Refunded);
        let payouts = total(TransactionDirection::Outgoing, TransactionStatus::Completed);

        Ok(AdminStats {
            users_by_role,
            suspended_users: users
                .iter()
                .filter(|u| u.status == UserStatus::Suspended)
                .count(),
            bookings_by_status: count_statuses(bookings.iter().map(|b| b.status)),
            vehicles_by_status: count_statuses(vehicles.iter().map(|v| v.status)),
            sales_orders_by_status: count_statuses(sales_orders.iter().map(|o| o.status)),
            open_quotations: quotations
                .iter()
                .filter(|q| matches!(q.status, QuotationStatus::Draft | QuotationStatus::Sent))
                .count(),
            revenue: round_money(revenue),
            refunded: round_money(refunded),
            payouts: round_money(payouts),
            gross_margin: round_money(revenue - payouts),
        })
    }
}
