//! Label enums for billing model, lifecycle status and allocation unit.
//!
//! Each enum is stored in the database as its display label (e.g. `"T&M"`,
//! `"On Hold"`) and serialized to JSON the same way, so the wire format and
//! the column contents are identical.

use crate::error::CoreError;

macro_rules! define_label_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($what:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The label stored in the database and sent over the wire.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $label => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Unknown {}: '{}'. Valid values: {}",
                        $what,
                        other,
                        [$($label),+].join(", ")
                    ))),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

define_label_enum! {
    /// How a project is billed, which also decides how its cost accrues.
    BillingType ("billing type") {
        /// Cost accrues per hour at each employee's hourly rate.
        TimeAndMaterials => "T&M",
        FixedBid => "Fixed Bid",
        FixedValue => "Fixed Value",
    }
}

define_label_enum! {
    /// Project lifecycle status. Transitions are unconstrained.
    ProjectStatus ("project status") {
        Pipeline => "Pipeline",
        Active => "Active",
        Completed => "Completed",
        OnHold => "On Hold",
    }
}

define_label_enum! {
    /// Employment status.
    EmployeeStatus ("employee status") {
        Active => "Active",
        Inactive => "Inactive",
    }
}

define_label_enum! {
    /// Unit of an allocation value.
    AllocationUnit ("allocation unit") {
        /// Percentage of monthly capacity (fixed-type projects).
        Percentage => "percentage",
        /// Total estimated hours for the engagement (T&M projects).
        Hours => "hours",
    }
}

impl BillingType {
    /// Fixed Bid and Fixed Value both pro-rate monthly salary over time.
    pub fn is_fixed(self) -> bool {
        matches!(self, BillingType::FixedBid | BillingType::FixedValue)
    }

    /// The unit allocation values on this kind of project are measured in.
    pub fn default_allocation_unit(self) -> AllocationUnit {
        if self.is_fixed() {
            AllocationUnit::Percentage
        } else {
            AllocationUnit::Hours
        }
    }
}
