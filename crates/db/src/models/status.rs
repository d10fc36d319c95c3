//! Status helper enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` / `*_results` database table.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Hold reservation lifecycle status.
    HoldStatus {
        Active = 1,
        Used = 2,
        Expired = 3,
        Cancelled = 4,
    }
}

define_status_enum! {
    /// Order settlement status.
    OrderStatus {
        Pending = 1,
        Paid = 2,
        Cancelled = 3,
    }
}

define_status_enum! {
    /// Terminal payment outcome carried by a webhook.
    WebhookResult {
        Success = 1,
        Failure = 2,
    }
}

impl HoldStatus {
    /// Lowercase wire/seed name.
    pub fn name(self) -> &'static str {
        match self {
            HoldStatus::Active => "active",
            HoldStatus::Used => "used",
            HoldStatus::Expired => "expired",
            HoldStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(HoldStatus::Active),
            2 => Some(HoldStatus::Used),
            3 => Some(HoldStatus::Expired),
            4 => Some(HoldStatus::Cancelled),
            _ => None,
        }
    }
}

impl OrderStatus {
    /// Lowercase wire/seed name.
    pub fn name(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(OrderStatus::Pending),
            2 => Some(OrderStatus::Paid),
            3 => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

impl WebhookResult {
    /// Lowercase wire/seed name.
    pub fn name(self) -> &'static str {
        match self {
            WebhookResult::Success => "success",
            WebhookResult::Failure => "failure",
        }
    }

    /// Parse the gateway's `status` field.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "success" => Some(WebhookResult::Success),
            "failure" => Some(WebhookResult::Failure),
            _ => None,
        }
    }
}
