use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Kind of subscription a skier can hold
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeSubscription {
    Annual,
    Semestrial,
    Monthly,
}

impl TypeSubscription {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeSubscription::Annual => "ANNUAL",
            TypeSubscription::Semestrial => "SEMESTRIAL",
            TypeSubscription::Monthly => "MONTHLY",
        }
    }
}

impl fmt::Display for TypeSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeSubscription {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ANNUAL" => Ok(TypeSubscription::Annual),
            "SEMESTRIAL" => Ok(TypeSubscription::Semestrial),
            "MONTHLY" => Ok(TypeSubscription::Monthly),
            _ => Err(Error::InvalidSubscriptionType(s.to_string())),
        }
    }
}

/// Subscription held by a skier
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub start_date: NaiveDate,
    /// Last day covered by the subscription
    ///
    /// This is computed from `start_date` and `type_sub` when the skier is saved. Any value set
    /// by the caller beforehand is overwritten.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub type_sub: TypeSubscription,
}

impl Subscription {
    pub fn new(start_date: NaiveDate, type_sub: TypeSubscription) -> Self {
        Self {
            start_date,
            end_date: None,
            type_sub,
        }
    }

    /// Fill in the end date according to the given durations
    pub fn compute_end_date(&mut self, durations: &SubscriptionDurations) -> Result<(), Error> {
        self.end_date = Some(durations.end_date(self.start_date, self.type_sub)?);
        Ok(())
    }
}

/// Number of months each subscription type lasts
///
/// Types without an entry cannot be used to create a subscription.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct SubscriptionDurations {
    months: BTreeMap<TypeSubscription, u32>,
}

impl SubscriptionDurations {
    pub fn new(months: impl IntoIterator<Item = (TypeSubscription, u32)>) -> Self {
        Self {
            months: months.into_iter().collect(),
        }
    }

    pub fn months(&self, type_sub: TypeSubscription) -> Option<u32> {
        self.months.get(&type_sub).copied()
    }

    /// End date of a subscription of type `type_sub` starting on `start_date`
    ///
    /// Adding months clamps to the last day of the target month, so a monthly subscription
    /// starting on January 31st ends on the last day of February.
    pub fn end_date(
        &self,
        start_date: NaiveDate,
        type_sub: TypeSubscription,
    ) -> Result<NaiveDate, Error> {
        let months = self
            .months(type_sub)
            .ok_or_else(|| Error::InvalidSubscriptionType(type_sub.to_string()))?;

        start_date
            .checked_add_months(Months::new(months))
            .ok_or(Error::EndDateOutOfRange { start_date, months })
    }
}

impl Default for SubscriptionDurations {
    fn default() -> Self {
        Self::new([
            (TypeSubscription::Annual, 12),
            (TypeSubscription::Semestrial, 6),
            (TypeSubscription::Monthly, 1),
        ])
    }
}

impl TryFrom<BTreeMap<String, u32>> for SubscriptionDurations {
    type Error = Error;

    fn try_from(raw: BTreeMap<String, u32>) -> Result<Self, Self::Error> {
        let months = raw
            .into_iter()
            .map(|(name, months)| Ok((name.parse::<TypeSubscription>()?, months)))
            .collect::<Result<BTreeMap<_, _>, Error>>()?;

        Ok(Self { months })
    }
}

impl From<SubscriptionDurations> for BTreeMap<String, u32> {
    fn from(durations: SubscriptionDurations) -> Self {
        durations
            .months
            .into_iter()
            .map(|(type_sub, months)| (type_sub.to_string(), months))
            .collect()
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The subscription type is unknown or has no configured duration
    #[error("invalid subscription type: {0}")]
    InvalidSubscriptionType(String),

    #[error("end date out of range: {start_date} plus {months} month(s)")]
    EndDateOutOfRange { start_date: NaiveDate, months: u32 },
}
