//! Commercial workflow: quotations, sales and purchase orders, payments and documents
//!
//! Every mutating step holds the workflow lock from its first read to its last
//! write, so concurrent requests see each step as a whole.

use super::{AMOUNT_EPSILON, WorkflowLock, chronological, ensure_booking_visible};
use crate::core::auth::{AuthPolicy, Role};
use crate::core::reference;
use crate::core::{CurrentUser, DataService, Entity, LezitError, LezitResult, PaginatedResponse, QueryParams};
use crate::entities::booking::{Booking, BookingStatus};
use crate::entities::document::{Document, DocumentKind, DocumentStatus, UploadDocumentRequest};
use crate::entities::purchase_order::{
    CreatePurchaseOrderRequest, PurchaseOrder, PurchaseOrderStatus,
};
use crate::entities::quotation::{CreateQuotationRequest, Quotation, QuotationStatus};
use crate::entities::sales_order::{SalesOrder, SalesOrderStatus};
use crate::entities::transaction::{
    FinancialTransaction, RecordTransactionRequest, TransactionDirection, TransactionStatus,
};
use crate::entities::user::UserStatus;
use crate::entities::DEFAULT_CURRENCY;
use crate::storage::Stores;
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

pub struct OrderService {
    stores: Stores,
    lock: WorkflowLock,
}

fn currency_or_default(currency: Option<String>, fallback: &str) -> String {
    currency.unwrap_or_else(|| fallback.to_string())
}

impl OrderService {
    pub fn new(stores: Stores, lock: WorkflowLock) -> Self {
        Self { stores, lock }
    }

    // ---------------------------------------------------------------------
    // Quotations
    // ---------------------------------------------------------------------

    /// Draft a price for a booking that is still open to offers
    pub async fn create_quotation(
        &self,
        user: &CurrentUser,
        booking_id: Uuid,
        request: CreateQuotationRequest,
    ) -> LezitResult<Quotation> {
        user.require(&AuthPolicy::AdminOnly)?;
        request.validate()?;
        if let Some(valid_until) = request.valid_until
            && valid_until < Utc::now()
        {
            return Err(LezitError::invalid_field("valid_until", "must be in the future"));
        }

        let _guard = self.lock.lock().await;
        let booking = self.stores.bookings.fetch(&booking_id).await?;
        if !matches!(booking.status, BookingStatus::Pending | BookingStatus::Quoted) {
            return Err(LezitError::conflict(format!(
                "booking is {}, quotations need a pending or quoted booking",
                booking.status
            )));
        }

        let mut quotation = Quotation::new(
            QuotationStatus::Draft,
            String::new(),
            booking.id,
            booking.customer_id,
            request.amount,
            currency_or_default(request.currency, DEFAULT_CURRENCY),
            request.valid_until,
            request.notes,
        );
        quotation.reference =
            reference::generate(reference::QUOTATION, &quotation.id, quotation.created_at);
        let quotation = self.stores.quotations.create(quotation).await?;

        tracing::info!(quotation_id = %quotation.id, booking_id = %booking.id, "quotation drafted");
        Ok(quotation)
    }

    /// Offer a draft to the customer
    pub async fn send_quotation(&self, user: &CurrentUser, id: Uuid) -> LezitResult<Quotation> {
        user.require(&AuthPolicy::AdminOnly)?;

        let _guard = self.lock.lock().await;
        let mut quotation = self.stores.quotations.fetch(&id).await?;
        let mut booking = self.stores.bookings.fetch(&quotation.booking_id).await?;
        quotation.transition_to(QuotationStatus::Sent)?;
        if booking.status == BookingStatus::Pending {
            booking.transition_to(BookingStatus::Quoted)?;
            self.stores.bookings.save(booking).await?;
        } else if booking.status != BookingStatus::Quoted {
            return Err(LezitError::conflict(format!(
                "booking is {}, quotations can no longer be sent",
                booking.status
            )));
        }

        let quotation = self.stores.quotations.save(quotation).await?;
        tracing::info!(quotation_id = %quotation.id, "quotation sent");
        Ok(quotation)
    }

    /// Customer accepts: the booking is confirmed and a sales order raised
    pub async fn accept_quotation(&self, user: &CurrentUser, id: Uuid) -> LezitResult<SalesOrder> {
        user.require(&AuthPolicy::role(Role::Customer))?;

        let _guard = self.lock.lock().await;
        let mut quotation = self.own_quotation(user, id).await?;

        if quotation.status == QuotationStatus::Sent && quotation.is_lapsed(Utc::now()) {
            quotation.transition_to(QuotationStatus::Expired)?;
            self.stores.quotations.save(quotation).await?;
            return Err(LezitError::conflict("quotation has expired"));
        }

        let mut booking = self.stores.bookings.fetch(&quotation.booking_id).await?;
        quotation.transition_to(QuotationStatus::Accepted)?;
        booking.transition_to(BookingStatus::Confirmed)?;

        for mut other in self
            .stores
            .quotations
            .search("booking_id", &booking.id.to_string())
            .await?
        {
            if other.id != quotation.id
                && matches!(other.status, QuotationStatus::Draft | QuotationStatus::Sent)
            {
                other.transition_to(QuotationStatus::Expired)?;
                self.stores.quotations.save(other).await?;
            }
        }

        let mut order = SalesOrder::new(
            SalesOrderStatus::Open,
            String::new(),
            booking.id,
            quotation.id,
            booking.customer_id,
            quotation.amount,
            quotation.currency.clone(),
        );
        order.reference = reference::generate(reference::SALES_ORDER, &order.id, order.created_at);

        let quotation = self.stores.quotations.save(quotation).await?;
        self.stores.bookings.save(booking).await?;
        let order = self.stores.sales_orders.create(order).await?;
        self.stores
            .documents
            .create(Document::generated(
                order.booking_id,
                DocumentKind::SalesOrder,
                &order.reference,
                order.id,
            ))
            .await?;

        tracing::info!(
            quotation_id = %quotation.id,
            sales_order_id = %order.id,
            "quotation accepted"
        );
        Ok(order)
    }

    pub async fn reject_quotation(&self, user: &CurrentUser, id: Uuid) -> LezitResult<Quotation> {
        user.require(&AuthPolicy::role(Role::Customer))?;

        let _guard = self.lock.lock().await;
        let mut quotation = self.own_quotation(user, id).await?;
        quotation.transition_to(QuotationStatus::Rejected)?;
        let quotation = self.stores.quotations.save(quotation).await?;

        let still_offered = self
            .stores
            .quotations
            .search("booking_id", &quotation.booking_id.to_string())
            .await?
            .iter()
            .any(|q| q.status == QuotationStatus::Sent);
        let mut booking = self.stores.bookings.fetch(&quotation.booking_id).await?;
        if booking.status == BookingStatus::Quoted && !still_offered {
            booking.transition_to(BookingStatus::Pending)?;
            self.stores.bookings.save(booking).await?;
        }

        tracing::info!(quotation_id = %quotation.id, "quotation rejected");
        Ok(quotation)
    }

    pub async fn list_quotations(
        &self,
        user: &CurrentUser,
        query: &QueryParams,
    ) -> LezitResult<PaginatedResponse<Quotation>> {
        let quotations = match user.role {
            Role::Admin => self.stores.quotations.list().await?,
            Role::Customer => {
                self.stores
                    .quotations
                    .search("customer_id", &user.id.to_string())
                    .await?
            }
            _ => return Err(LezitError::forbidden("quotations are visible to customers and admins")),
        };
        Ok(query.apply(quotations)?)
    }

    pub async fn get_quotation(&self, user: &CurrentUser, id: Uuid) -> LezitResult<Quotation> {
        let quotation = self.stores.quotations.fetch(&id).await?;
        if user.is_admin() || quotation.customer_id == user.id {
            Ok(quotation)
        } else {
            Err(LezitError::forbidden("quotation belongs to another customer"))
        }
    }

    async fn own_quotation(&self, user: &CurrentUser, id: Uuid) -> LezitResult<Quotation> {
        let quotation = self.stores.quotations.fetch(&id).await?;
        if quotation.customer_id != user.id {
            return Err(LezitError::forbidden("quotation belongs to another customer"));
        }
        Ok(quotation)
    }

    // ---------------------------------------------------------------------
    // Sales orders
    // ---------------------------------------------------------------------

    /// Hand the job to a vendor
    pub async fn create_purchase_order(
        &self,
        user: &CurrentUser,
        sales_order_id: Uuid,
        request: CreatePurchaseOrderRequest,
    ) -> LezitResult<PurchaseOrder> {
        user.require(&AuthPolicy::AdminOnly)?;
        request.validate()?;

        let _guard = self.lock.lock().await;
        let order = self.stores.sales_orders.fetch(&sales_order_id).await?;
        if !matches!(order.status, SalesOrderStatus::Open | SalesOrderStatus::Invoiced) {
            return Err(LezitError::conflict(format!(
                "sales order is {}, purchase orders need an open or invoiced order",
                order.status
            )));
        }

        let vendor = self.stores.users.fetch(&request.vendor_id).await?;
        if vendor.role != Role::Vendor {
            return Err(LezitError::invalid_field("vendor_id", "not a vendor account"));
        }
        if vendor.status != UserStatus::Active {
            return Err(LezitError::conflict("vendor account is suspended"));
        }

        let already_placed = self
            .stores
            .purchase_orders
            .search("sales_order_id", &order.id.to_string())
            .await?
            .iter()
            .any(|po| po.status.is_live() || po.status == PurchaseOrderStatus::Completed);
        if already_placed {
            return Err(LezitError::conflict(
                "sales order already has an active purchase order",
            ));
        }

        let mut booking = self.stores.bookings.fetch(&order.booking_id).await?;
        let mut purchase = PurchaseOrder::new(
            PurchaseOrderStatus::Issued,
            String::new(),
            order.id,
            booking.id,
            vendor.id,
            request.amount,
            currency_or_default(request.currency, &order.currency),
        );
        purchase.reference =
            reference::generate(reference::PURCHASE_ORDER, &purchase.id, purchase.created_at);

        booking.vendor_id = Some(vendor.id);
        booking.touch();
        self.stores.bookings.save(booking).await?;
        let purchase = self.stores.purchase_orders.create(purchase).await?;
        self.stores
            .documents
            .create(Document::generated(
                purchase.booking_id,
                DocumentKind::PurchaseOrder,
                &purchase.reference,
                purchase.id,
            ))
            .await?;

        tracing::info!(
            purchase_order_id = %purchase.id,
            vendor_id = %vendor.id,
            "purchase order issued"
        );
        Ok(purchase)
    }

    pub async fn invoice_sales_order(&self, user: &CurrentUser, id: Uuid) -> LezitResult<SalesOrder> {
        user.require(&AuthPolicy::AdminOnly)?;

        let _guard = self.lock.lock().await;
        let order = self.stores.sales_orders.fetch(&id).await?;
        self.invoice(order).await
    }

    pub async fn list_sales_orders(
        &self,
        user: &CurrentUser,
        query: &QueryParams,
    ) -> LezitResult<PaginatedResponse<SalesOrder>> {
        let orders = match user.role {
            Role::Admin => self.stores.sales_orders.list().await?,
            Role::Customer => {
                self.stores
                    .sales_orders
                    .search("customer_id", &user.id.to_string())
                    .await?
            }
            _ => return Err(LezitError::forbidden("sales orders are visible to customers and admins")),
        };
        Ok(query.apply(orders)?)
    }

    pub async fn get_sales_order(&self, user: &CurrentUser, id: Uuid) -> LezitResult<SalesOrder> {
        let order = self.stores.sales_orders.fetch(&id).await?;
        if user.is_admin() || order.customer_id == user.id {
            Ok(order)
        } else {
            Err(LezitError::forbidden("sales order belongs to another customer"))
        }
    }

    async fn invoice(&self, mut order: SalesOrder) -> LezitResult<SalesOrder> {
        order.transition_to(SalesOrderStatus::Invoiced)?;
        let order = self.stores.sales_orders.save(order).await?;
        self.stores
            .documents
            .create(Document::generated(
                order.booking_id,
                DocumentKind::Invoice,
                &order.reference,
                order.id,
            ))
            .await?;
        tracing::info!(sales_order_id = %order.id, "sales order invoiced");
        Ok(order)
    }

    // ---------------------------------------------------------------------
    // Purchase orders
    // ---------------------------------------------------------------------

    pub async fn accept_purchase_order(
        &self,
        user: &CurrentUser,
        id: Uuid,
    ) -> LezitResult<PurchaseOrder> {
        user.require(&AuthPolicy::role(Role::Vendor))?;

        let _guard = self.lock.lock().await;
        let mut purchase = self.own_purchase_order(user, id).await?;
        purchase.transition_to(PurchaseOrderStatus::Accepted)?;

        let mut booking = self.stores.bookings.fetch(&purchase.booking_id).await?;
        if booking.vendor_id != Some(purchase.vendor_id) {
            booking.vendor_id = Some(purchase.vendor_id);
            booking.touch();
            self.stores.bookings.save(booking).await?;
        }

        let purchase = self.stores.purchase_orders.save(purchase).await?;
        tracing::info!(purchase_order_id = %purchase.id, "purchase order accepted");
        Ok(purchase)
    }

    pub async fn reject_purchase_order(
        &self,
        user: &CurrentUser,
        id: Uuid,
    ) -> LezitResult<PurchaseOrder> {
        user.require(&AuthPolicy::role(Role::Vendor))?;

        let _guard = self.lock.lock().await;
        let mut purchase = self.own_purchase_order(user, id).await?;
        purchase.transition_to(PurchaseOrderStatus::Rejected)?;

        let mut booking = self.stores.bookings.fetch(&purchase.booking_id).await?;
        if booking.vendor_id == Some(purchase.vendor_id) {
            booking.vendor_id = None;
            booking.touch();
            self.stores.bookings.save(booking).await?;
        }

        let purchase = self.stores.purchase_orders.save(purchase).await?;
        tracing::info!(purchase_order_id = %purchase.id, "purchase order rejected");
        Ok(purchase)
    }

    pub async fn complete_purchase_order(
        &self,
        user: &CurrentUser,
        id: Uuid,
    ) -> LezitResult<PurchaseOrder> {
        user.require(&AuthPolicy::AdminOnly)?;

        let _guard = self.lock.lock().await;
        let mut purchase = self.stores.purchase_orders.fetch(&id).await?;
        let booking = self.stores.bookings.fetch(&purchase.booking_id).await?;
        if !matches!(booking.status, BookingStatus::Delivered | BookingStatus::Completed) {
            return Err(LezitError::conflict(format!(
                "booking is {}, the trip must be delivered first",
                booking.status
            )));
        }
        purchase.transition_to(PurchaseOrderStatus::Completed)?;
        let purchase = self.stores.purchase_orders.save(purchase).await?;
        tracing::info!(purchase_order_id = %purchase.id, "purchase order completed");
        Ok(purchase)
    }

    pub async fn list_purchase_orders(
        &self,
        user: &CurrentUser,
        query: &QueryParams,
    ) -> LezitResult<PaginatedResponse<PurchaseOrder>> {
        let orders = match user.role {
            Role::Admin => self.stores.purchase_orders.list().await?,
            Role::Vendor => {
                self.stores
                    .purchase_orders
                    .search("vendor_id", &user.id.to_string())
                    .await?
            }
            _ => return Err(LezitError::forbidden("purchase orders are visible to vendors and admins")),
        };
        Ok(query.apply(orders)?)
    }

    pub async fn get_purchase_order(
        &self,
        user: &CurrentUser,
        id: Uuid,
    ) -> LezitResult<PurchaseOrder> {
        let purchase = self.stores.purchase_orders.fetch(&id).await?;
        if user.is_admin() || purchase.vendor_id == user.id {
            Ok(purchase)
        } else {
            Err(LezitError::forbidden("purchase order belongs to another vendor"))
        }
    }

    async fn own_purchase_order(&self, user: &CurrentUser, id: Uuid) -> LezitResult<PurchaseOrder> {
        let purchase = self.stores.purchase_orders.fetch(&id).await?;
        if purchase.vendor_id != user.id {
            return Err(LezitError::forbidden("purchase order belongs to another vendor"));
        }
        Ok(purchase)
    }

    // ---------------------------------------------------------------------
    // Transactions
    // ---------------------------------------------------------------------

    /// Record a customer payment or a vendor payout, pending settlement
    pub async fn record_transaction(
        &self,
        user: &CurrentUser,
        request: RecordTransactionRequest,
    ) -> LezitResult<FinancialTransaction> {
        user.require(&AuthPolicy::AdminOnly)?;
        request.validate()?;

        let _guard = self.lock.lock().await;
        let (booking_id, counterparty_id, fallback_currency) = match request.direction {
            TransactionDirection::Incoming => {
                let id = request.sales_order_id.ok_or_else(|| {
                    LezitError::invalid_field("sales_order_id", "required for incoming payments")
                })?;
                let order = self.stores.sales_orders.fetch(&id).await?;
                if order.status == SalesOrderStatus::Cancelled {
                    return Err(LezitError::conflict("sales order is cancelled"));
                }
                (order.booking_id, order.customer_id, order.currency)
            }
            TransactionDirection::Outgoing => {
                let id = request.purchase_order_id.ok_or_else(|| {
                    LezitError::invalid_field("purchase_order_id", "required for outgoing payments")
                })?;
                let purchase = self.stores.purchase_orders.fetch(&id).await?;
                if !matches!(
                    purchase.status,
                    PurchaseOrderStatus::Accepted | PurchaseOrderStatus::Completed
                ) {
                    return Err(LezitError::conflict(format!(
                        "purchase order is {}, payouts need an accepted order",
                        purchase.status
                    )));
                }
                (purchase.booking_id, purchase.vendor_id, purchase.currency)
            }
        };

        let mut transaction = FinancialTransaction::new(
            TransactionStatus::Pending,
            String::new(),
            booking_id,
            request.direction,
            counterparty_id,
            request
                .sales_order_id
                .filter(|_| request.direction == TransactionDirection::Incoming),
            request
                .purchase_order_id
                .filter(|_| request.direction == TransactionDirection::Outgoing),
            request.amount,
            currency_or_default(request.currency, &fallback_currency),
            request.method.trim().to_string(),
            request.note,
        );
        transaction.reference =
            reference::generate(reference::TRANSACTION, &transaction.id, transaction.created_at);
        let transaction = self.stores.transactions.create(transaction).await?;

        tracing::info!(
            transaction_id = %transaction.id,
            direction = ?transaction.direction,
            amount = transaction.amount,
            "transaction recorded"
        );
        Ok(transaction)
    }

    /// Settle a pending transaction; a fully paid sales order becomes paid
    pub async fn complete_transaction(
        &self,
        user: &CurrentUser,
        id: Uuid,
    ) -> LezitResult<FinancialTransaction> {
        user.require(&AuthPolicy::AdminOnly)?;

        let _guard = self.lock.lock().await;
        let mut transaction = self.stores.transactions.fetch(&id).await?;
        transaction.transition_to(TransactionStatus::Completed)?;
        let transaction = self.stores.transactions.save(transaction).await?;

        if transaction.direction == TransactionDirection::Incoming
            && let Some(order_id) = transaction.sales_order_id
        {
            self.settle_sales_order(order_id, &transaction).await?;
        }

        tracing::info!(transaction_id = %transaction.id, "transaction completed");
        Ok(transaction)
    }

    pub async fn fail_transaction(
        &self,
        user: &CurrentUser,
        id: Uuid,
    ) -> LezitResult<FinancialTransaction> {
        self.move_transaction(user, id, TransactionStatus::Failed).await
    }

    pub async fn refund_transaction(
        &self,
        user: &CurrentUser,
        id: Uuid,
    ) -> LezitResult<FinancialTransaction> {
        self.move_transaction(user, id, TransactionStatus::Refunded).await
    }

    pub async fn list_transactions(
        &self,
        user: &CurrentUser,
        query: &QueryParams,
    ) -> LezitResult<PaginatedResponse<FinancialTransaction>> {
        let direction = match user.role {
            Role::Admin => None,
            Role::Customer => Some(TransactionDirection::Incoming),
            Role::Vendor => Some(TransactionDirection::Outgoing),
            Role::Driver => {
                return Err(LezitError::forbidden("transactions are not visible to drivers"));
            }
        };
        let transactions = match direction {
            None => self.stores.transactions.list().await?,
            Some(direction) => self
                .stores
                .transactions
                .search("counterparty_id", &user.id.to_string())
                .await?
                .into_iter()
                .filter(|t| t.direction == direction)
                .collect(),
        };
        Ok(query.apply(transactions)?)
    }

    async fn move_transaction(
        &self,
        user: &CurrentUser,
        id: Uuid,
        next: TransactionStatus,
    ) -> LezitResult<FinancialTransaction> {
        user.require(&AuthPolicy::AdminOnly)?;

        let _guard = self.lock.lock().await;
        let mut transaction = self.stores.transactions.fetch(&id).await?;
        transaction.transition_to(next)?;
        let transaction = self.stores.transactions.save(transaction).await?;
        tracing::info!(transaction_id = %transaction.id, status = %transaction.status, "transaction updated");
        Ok(transaction)
    }

    async fn settle_sales_order(
        &self,
        order_id: Uuid,
        trigger: &FinancialTransaction,
    ) -> LezitResult<()> {
        let mut order = self.stores.sales_orders.fetch(&order_id).await?;
        if !matches!(order.status, SalesOrderStatus::Open | SalesOrderStatus::Invoiced) {
            return Ok(());
        }

        let received: f64 = self
            .stores
            .transactions
            .search("sales_order_id", &order.id.to_string())
            .await?
            .iter()
            .filter(|t| {
                t.direction == TransactionDirection::Incoming
                    && t.status == TransactionStatus::Completed
            })
            .map(|t| t.amount)
            .sum();
        if received + AMOUNT_EPSILON < order.amount {
            return Ok(());
        }

        if order.status == SalesOrderStatus::Open {
            order = self.invoice(order).await?;
        }
        order.transition_to(SalesOrderStatus::Paid)?;
        let order = self.stores.sales_orders.save(order).await?;
        self.stores
            .documents
            .create(Document::generated(
                order.booking_id,
                DocumentKind::Receipt,
                &trigger.reference,
                trigger.id,
            ))
            .await?;

        tracing::info!(sales_order_id = %order.id, received, "sales order paid");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Documents
    // ---------------------------------------------------------------------

    pub async fn upload_document(
        &self,
        user: &CurrentUser,
        booking_id: Uuid,
        request: UploadDocumentRequest,
    ) -> LezitResult<Document> {
        request.validate()?;
        let booking = self.visible_booking(user, booking_id).await?;
        if user.role == Role::Driver && request.kind != DocumentKind::ProofOfDelivery {
            return Err(LezitError::forbidden(
                "drivers may only upload proof of delivery",
            ));
        }

        let document = Document::new(
            DocumentStatus::Active,
            booking.id,
            request.kind,
            request.file_name.trim().to_string(),
            request.url,
            user.id,
            request.related_id,
        );
        let document = self.stores.documents.create(document).await?;
        tracing::info!(document_id = %document.id, kind = %document.kind, "document uploaded");
        Ok(document)
    }

    /// Active documents of a booking, oldest first
    pub async fn list_documents(
        &self,
        user: &CurrentUser,
        booking_id: Uuid,
    ) -> LezitResult<Vec<Document>> {
        let booking = self.visible_booking(user, booking_id).await?;
        let documents = self
            .stores
            .documents
            .search("booking_id", &booking.id.to_string())
            .await?
            .into_iter()
            .filter(|d| d.status == DocumentStatus::Active)
            .collect();
        Ok(chronological(documents))
    }

    pub async fn archive_document(&self, user: &CurrentUser, id: Uuid) -> LezitResult<Document> {
        let _guard = self.lock.lock().await;
        let mut document = self.stores.documents.fetch(&id).await?;
        if !user.is_admin() && document.uploaded_by != user.id {
            return Err(LezitError::forbidden(
                "only the uploader or an admin can remove a document",
            ));
        }
        document.transition_to(DocumentStatus::Archived)?;
        let document = self.stores.documents.save(document).await?;
        tracing::info!(document_id = %document.id, "document archived");
        Ok(document)
    }

    async fn visible_booking(&self, user: &CurrentUser, id: Uuid) -> LezitResult<Booking> {
        let booking = self.stores.bookings.fetch(&id).await?;
        ensure_booking_visible(user, &booking)?;
        Ok(booking)
    }
}
