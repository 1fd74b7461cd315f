//! Current-versus-reference change computation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::money;
use crate::{AggregatorError, CalendarDay};

/// Difference between a current reading and a historical reference.
///
/// Fields keep full precision; rounding to two places happens only when the
/// value is serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeResult {
    #[serde(serialize_with = "money::serialize")]
    pub current_value: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub reference_value: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub absolute_change: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub percent_change: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<CalendarDay>,
}

impl ChangeResult {
    /// Computes `current - reference` and its percentage of `reference`.
    ///
    /// A missing or zero value on either side is `IncompleteData`.
    pub fn compute(
        current: Option<Decimal>,
        reference: Option<Decimal>,
    ) -> Result<Self, AggregatorError> {
        let current = current
            .filter(|value| !value.is_zero())
            .ok_or_else(|| AggregatorError::incomplete_data("current value is missing or zero"))?;
        let reference = reference.filter(|value| !value.is_zero()).ok_or_else(|| {
            AggregatorError::incomplete_data("reference value is missing or zero")
        })?;

        let absolute_change = current - reference;
        let percent_change = absolute_change
            .checked_div(reference)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(|| AggregatorError::incomplete_data("percent change overflowed"))?;

        Ok(Self {
            current_value: current,
            reference_value: reference,
            absolute_change,
            percent_change,
            reference_date: None,
        })
    }

    pub fn with_reference_date(mut self, date: CalendarDay) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn percent_change_display(&self) -> Decimal {
        money::round_display(self.percent_change)
    }

    pub fn absolute_change_display(&self) -> Decimal {
        money::round_display(self.absolute_change)
    }
}
