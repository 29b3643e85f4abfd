//! Files attached to a booking

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Quotation,
    SalesOrder,
    PurchaseOrder,
    Invoice,
    Receipt,
    ProofOfDelivery,
    Other,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Quotation => "quotation",
            DocumentKind::SalesOrder => "sales_order",
            DocumentKind::PurchaseOrder => "purchase_order",
            DocumentKind::Invoice => "invoice",
            DocumentKind::Receipt => "receipt",
            DocumentKind::ProofOfDelivery => "proof_of_delivery",
            DocumentKind::Other => "other",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

crate::lifecycle!(
    DocumentStatus, "document" {
        Active => "active": [Archived],
        Archived => "archived": [],
    }
);

crate::impl_entity!(
    /// Metadata of a file stored elsewhere
    Document,
    "document",
    "documents",
    DocumentStatus,
    {
        booking_id: Uuid,
        kind: DocumentKind,
        file_name: String,
        url: String,
        /// User id, or nil for generated documents
        uploaded_by: Uuid,
        /// Quotation / order / transaction the document belongs to
        #[serde(default)]
        related_id: Option<Uuid>,
    }
);

impl Document {
    /// A document produced by the order workflow itself
    pub fn generated(booking_id: Uuid, kind: DocumentKind, reference: &str, related_id: Uuid) -> Self {
        Document::new(
            DocumentStatus::Active,
            booking_id,
            kind,
            format!("{}.pdf", reference),
            format!("/files/{}/{}.pdf", kind, reference),
            Uuid::nil(),
            Some(related_id),
        )
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UploadDocumentRequest {
    pub kind: DocumentKind,
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    #[validate(url)]
    pub url: String,
    pub related_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_document() {
        let booking_id = Uuid::new_v4();
        let related = Uuid::new_v4();
        let doc = Document::generated(booking_id, DocumentKind::SalesOrder, "SO-20260101-ABCDEF", related);
        assert_eq!(doc.file_name, "SO-20260101-ABCDEF.pdf");
        assert_eq!(doc.url, "/files/sales_order/SO-20260101-ABCDEF.pdf");
        assert!(doc.uploaded_by.is_nil());
        assert_eq!(doc.related_id, Some(related));
        assert_eq!(doc.status, DocumentStatus::Active);
    }

    #[test]
    fn test_upload_requires_url() {
        let request = UploadDocumentRequest {
            kind: DocumentKind::ProofOfDelivery,
            file_name: "pod.jpg".into(),
            url: "not a url".into(),
            related_id: None,
        };
        assert!(request.validate().is_err());
    }
}
