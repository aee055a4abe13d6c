mod user;
mod property;
mod customer;
mod employee;
mod contract;
mod down_payment;
mod expense;

pub use user::User;
pub use property::{Property, PropertyImage, PropertyStatus, PropertyType};
pub use customer::Customer;
pub use employee::Employee;
pub use contract::{Contract, ContractDetails, ContractKind};
pub use down_payment::{DownPayment, DownPaymentDetails, PaymentStatus};
pub use expense::{Expense, ExpenseCategory};

/// Raised when a status/type column holds text that no variant maps to.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declares an enum stored as lower-case text in the database.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Exact match, as written by `as_str`.
            fn from_stored(value: &str) -> Option<Self> {
                match value {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Lenient match for typed input: surrounding space and case are ignored.
            pub fn parse(value: &str) -> Result<Self, $crate::models::UnknownVariant> {
                Self::from_stored(&value.trim().to_ascii_lowercase()).ok_or_else(|| {
                    $crate::models::UnknownVariant {
                        kind: $kind,
                        value: value.to_string(),
                    }
                })
            }
        }

        /// Column values are read back strictly.
        impl TryFrom<String> for $name {
            type Error = $crate::models::UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::from_stored(&value).ok_or($crate::models::UnknownVariant { kind: $kind, value })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(self.as_str())
            }
        }
    };
}

pub(crate) use text_enum;
