//! Macros for reducing boilerplate when defining entities
//!
//! These macros generate the repetitive trait implementations needed for
//! each stored record and each status lifecycle.

/// Declare a status enum together with its transition table
///
/// Each variant lists the statuses it may move to; an empty list makes the
/// status terminal.
///
/// # Example
///
/// ```rust,ignore
/// lifecycle!(
///     /// Status of a quotation
///     QuotationStatus, "quotation" {
///         Draft => "draft": [Sent, Expired],
///         Sent => "sent": [Accepted, Rejected, Expired],
///         Accepted => "accepted": [],
///         Rejected => "rejected": [],
///         Expired => "expired": [],
///     }
/// );
/// ```
#[macro_export]
macro_rules! lifecycle {
    (
        $(#[$meta:meta])*
        $name:ident, $entity:literal {
            $( $variant:ident => $label:literal : [ $( $next:ident ),* $(,)? ] ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize,
        )]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $crate::core::workflow::Lifecycle for $name {
            const ENTITY: &'static str = $entity;

            fn all() -> &'static [Self] {
                &[ $( $name::$variant ),+ ]
            }

            fn allowed_next(&self) -> &'static [Self] {
                match self {
                    $( $name::$variant => &[ $( $name::$next ),* ], )+
                }
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::workflow::Lifecycle::as_str(self))
            }
        }
    };
}

/// Create a stored record with automatic [`Entity`](crate::core::entity::Entity)
/// implementation
///
/// Injects `id`, `created_at`, `updated_at` and a typed `status`, and
/// generates `new()` plus `touch()`.
///
/// # Example
///
/// ```rust,ignore
/// impl_entity!(
///     Vehicle,
///     "vehicle",
///     "vehicles",
///     VehicleStatus,
///     {
///         vendor_id: Uuid,
///         registration_number: String,
///         #[serde(default)]
///         driver_id: Option<Uuid>,
///     }
/// );
/// ```
#[macro_export]
macro_rules! impl_entity {
    (
        $(#[$meta:meta])*
        $type:ident,
        $singular:expr,
        $plural:expr,
        $status:ty,
        {
            $( $(#[$field_meta:meta])* $field:ident : $field_type:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Unique identifier
            pub id: ::uuid::Uuid,

            /// When this record was created
            pub created_at: ::chrono::DateTime<::chrono::Utc>,

            /// When this record was last updated
            pub updated_at: ::chrono::DateTime<::chrono::Utc>,

            /// Current lifecycle status
            pub status: $status,
            $(
                $(#[$field_meta])*
                pub $field : $field_type,
            )*
        }

        impl $crate::core::entity::Entity for $type {
            type Status = $status;

            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn created_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.created_at
            }

            fn updated_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.updated_at
            }

            fn status(&self) -> $status {
                self.status
            }

            fn set_status(&mut self, status: $status) {
                self.status = status;
                self.touch();
            }
        }

        impl $type {
            /// Create a new record with a fresh id and timestamps
            #[allow(clippy::too_many_arguments)]
            pub fn new(status: $status, $( $field: $field_type ),*) -> Self {
                let now = ::chrono::Utc::now();
                Self {
                    id: ::uuid::Uuid::new_v4(),
                    created_at: now,
                    updated_at: now,
                    status,
                    $( $field ),*
                }
            }

            /// Update the updated_at timestamp to now
            pub fn touch(&mut self) {
                self.updated_at = ::chrono::Utc::now();
            }
        }
    };
}
