use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle stage of a movement.
///
/// This enum is closed: the aggregation cross-tab and the view predicates
/// match on it exhaustively, so adding a variant forces those sites to be
/// updated at compile time.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MovementStatus {
    InStock,
    Rejected,
    Shipped,
    Returned,
}

/// Named lens selecting which status subset a table view displays.
///
/// `Performance` and `Billing` reuse the unrestricted set; they only drive
/// extra displayed columns downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViewType {
    Dashboard,
    Entries,
    Exits,
    Performance,
    Billing,
}

/// Which date attribute a date-range filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    InvoiceDate,
    UnloadingDate,
}

impl DateField {
    /// The record's value at this field. Dates are zero-padded ISO-like
    /// strings, so callers may compare them lexicographically.
    pub fn value_of<'a>(&self, movement: &'a Movement) -> &'a str {
        match self {
            DateField::InvoiceDate => &movement.invoice_date,
            DateField::UnloadingDate => &movement.unloading_date,
        }
    }
}

/// Status predicate for table views. The HTTP layer maps the absent or
/// `"all"` query value to `All`; the engine never sees the sentinel string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(MovementStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: MovementStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => status == *wanted,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            MovementStatus::from_str(s).map(StatusFilter::Only)
        }
    }
}

/// A single shipment/inventory record.
///
/// Field groups follow the record's lifecycle: the entry leg is filled at
/// creation, the exit, performance and billing legs as the movement
/// progresses. All date/time fields are zero-padded textual values
/// (`YYYY-MM-DD` / `HH:MM`) compared lexicographically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Movement {
    /// Assigned at creation, immutable thereafter.
    pub id: Uuid,
    pub status: MovementStatus,

    // Entry leg
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub invoice_number: String,
    /// Tonnes. Never negative; bad input coerces to zero at the boundary.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub weight: Decimal,
    /// Currency amount. Never negative; bad input coerces to zero.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub value: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub invoice_date: String,
    #[serde(default)]
    pub unloading_date: String,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub plate: String,
    #[serde(default)]
    pub container: String,
    #[serde(default)]
    pub destination: String,

    // Exit leg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier_billing_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier_billing_cte: Option<String>,

    // Performance leg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<String>,

    // Billing leg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker_cte: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker_issue_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier_cte: Option<String>,
}

impl Movement {
    /// Build a record from a normalized input with a caller-supplied id.
    /// Used by the store for both creation (fresh id) and wholesale update
    /// (existing id).
    pub fn from_input(id: Uuid, input: MovementInput) -> Self {
        let input = input.normalized();
        Self {
            id,
            status: input.status,
            month: input.month,
            access_key: input.access_key,
            invoice_number: input.invoice_number,
            weight: input.weight,
            value: input.value,
            description: input.description,
            invoice_date: input.invoice_date,
            unloading_date: input.unloading_date,
            supplier: input.supplier,
            plate: input.plate,
            container: input.container,
            destination: input.destination,
            carrier_billing_date: input.carrier_billing_date,
            carrier_billing_cte: input.carrier_billing_cte,
            arrival_time: input.arrival_time,
            entry_time: input.entry_time,
            exit_time: input.exit_time,
            issue_date: input.issue_date,
            broker_cte: input.broker_cte,
            broker_issue_date: input.broker_issue_date,
            carrier_cte: input.carrier_cte,
        }
    }
}

/// Payload accepted by create/update. Identical to [`Movement`] minus the
/// id, which the store owns.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct MovementInput {
    #[serde(default = "default_status")]
    pub status: MovementStatus,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub month: String,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub access_key: String,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub invoice_number: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub weight: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub value: Decimal,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub invoice_date: String,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub unloading_date: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub supplier: String,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub plate: String,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub container: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub destination: String,

    #[serde(default)]
    pub carrier_billing_date: Option<String>,
    #[serde(default)]
    pub carrier_billing_cte: Option<String>,
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub entry_time: Option<String>,
    #[serde(default)]
    pub exit_time: Option<String>,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub broker_cte: Option<String>,
    #[serde(default)]
    pub broker_issue_date: Option<String>,
    #[serde(default)]
    pub carrier_cte: Option<String>,
}

fn default_status() -> MovementStatus {
    MovementStatus::InStock
}

impl Default for MovementStatus {
    fn default() -> Self {
        default_status()
    }
}

impl MovementInput {
    /// Boundary normalization: trims free-text fields and clamps negative
    /// numerics to zero, so the filter and aggregation engines can assume
    /// well-typed input and never raise.
    pub fn normalized(mut self) -> Self {
        self.month = self.month.trim().to_string();
        self.access_key = self.access_key.trim().to_string();
        self.invoice_number = self.invoice_number.trim().to_string();
        self.description = self.description.trim().to_string();
        self.invoice_date = self.invoice_date.trim().to_string();
        self.unloading_date = self.unloading_date.trim().to_string();
        self.supplier = self.supplier.trim().to_string();
        self.plate = self.plate.trim().to_string();
        self.container = self.container.trim().to_string();
        self.destination = self.destination.trim().to_string();
        self.weight = clamp_non_negative(self.weight);
        self.value = clamp_non_negative(self.value);
        self
    }
}

fn clamp_non_negative(value: Decimal) -> Decimal {
    if value.is_sign_negative() {
        Decimal::ZERO
    } else {
        value
    }
}

/// Deserializes a decimal leniently: numbers, numeric strings, missing
/// values and outright garbage are all accepted; anything that does not
/// parse to a non-negative decimal becomes zero. Parse failures never
/// propagate into the aggregation engine.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().map(coerce_decimal).unwrap_or(Decimal::ZERO))
}

fn coerce_decimal(value: &serde_json::Value) -> Decimal {
    let parsed = match value {
        serde_json::Value::Number(n) => {
            let repr = n.to_string();
            Decimal::from_str(&repr)
                .or_else(|_| Decimal::from_scientific(&repr))
                .ok()
        }
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .ok()
        }
        _ => None,
    };

    match parsed {
        Some(d) if !d.is_sign_negative() => d,
        _ => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn status_round_trips_through_strings() {
        for s in [
            MovementStatus::InStock,
            MovementStatus::Rejected,
            MovementStatus::Shipped,
            MovementStatus::Returned,
        ] {
            let parsed = MovementStatus::from_str(&s.to_string()).unwrap();
            assert_eq!(parsed, s);
        }
    }

    #[test]
    fn status_filter_accepts_the_all_sentinel() {
        assert_eq!(StatusFilter::from_str("all").unwrap(), StatusFilter::All);
        assert_eq!(StatusFilter::from_str("ALL").unwrap(), StatusFilter::All);
        assert_eq!(
            StatusFilter::from_str("shipped").unwrap(),
            StatusFilter::Only(MovementStatus::Shipped)
        );
        assert!(StatusFilter::from_str("bogus").is_err());
    }

    #[test]
    fn weight_accepts_numbers_and_numeric_strings() {
        let input: MovementInput =
            serde_json::from_value(serde_json::json!({ "weight": 2.5, "value": "120.75" }))
                .unwrap();
        assert_eq!(input.weight, dec!(2.5));
        assert_eq!(input.value, dec!(120.75));
    }

    #[test]
    fn garbage_numerics_coerce_to_zero() {
        let input: MovementInput = serde_json::from_value(serde_json::json!({
            "weight": "twelve tonnes",
            "value": null
        }))
        .unwrap();
        assert_eq!(input.weight, Decimal::ZERO);
        assert_eq!(input.value, Decimal::ZERO);
    }

    #[test]
    fn negative_numerics_clamp_to_zero() {
        let input: MovementInput =
            serde_json::from_value(serde_json::json!({ "weight": -3, "value": "-1.5" })).unwrap();
        assert_eq!(input.weight, Decimal::ZERO);
        assert_eq!(input.value, Decimal::ZERO);

        let programmatic = MovementInput {
            weight: dec!(-7),
            ..Default::default()
        }
        .normalized();
        assert_eq!(programmatic.weight, Decimal::ZERO);
    }

    #[test]
    fn normalization_trims_text_fields() {
        let input = MovementInput {
            supplier: "  Acme Grains  ".into(),
            destination: " Santos Port ".into(),
            ..Default::default()
        }
        .normalized();
        assert_eq!(input.supplier, "Acme Grains");
        assert_eq!(input.destination, "Santos Port");
    }

    #[test]
    fn movement_serializes_without_empty_optional_legs() {
        let movement = Movement::from_input(Uuid::new_v4(), MovementInput::default());
        let json = serde_json::to_value(&movement).unwrap();
        assert!(json.get("arrival_time").is_none());
        assert!(json.get("broker_cte").is_none());
        assert_eq!(json["status"], "in_stock");
    }
}
