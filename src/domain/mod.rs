use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod subscription;

pub use subscription::{Subscription, SubscriptionDurations, TypeSubscription};

/// Identifier of a [`Skier`], assigned by the store
pub type SkierId = u64;
/// Identifier of a [`Piste`], assigned by the store
pub type PisteId = u64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skier {
    /// Unique identifier for the `Skier`
    ///
    /// This is `None` until the skier has been saved for the first time.
    #[serde(default)]
    pub skier_id: Option<SkierId>,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub city: String,
    /// Current subscription, if any
    #[serde(default)]
    pub subscription: Option<Subscription>,
    /// Pistes the skier is assigned to
    #[serde(default)]
    pub pistes: Vec<Piste>,
    #[serde(default)]
    pub registrations: Vec<Registration>,
}

impl Skier {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
        city: impl Into<String>,
    ) -> Self {
        Self {
            skier_id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth,
            city: city.into(),
            subscription: None,
            pistes: Vec::default(),
            registrations: Vec::default(),
        }
    }

    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.subscription = Some(subscription);
        self
    }

    pub fn has_subscription_type(&self, type_sub: TypeSubscription) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(|subscription| subscription.type_sub == type_sub)
    }

    /// Assign the skier to a piste
    ///
    /// Returns `false` if the skier was already assigned to it.
    pub fn assign_piste(&mut self, piste: Piste) -> bool {
        if self
            .pistes
            .iter()
            .any(|assigned| assigned.piste_id == piste.piste_id)
        {
            return false;
        }
        self.pistes.push(piste);
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Color {
    Green,
    Blue,
    Red,
    Black,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piste {
    #[serde(default)]
    pub piste_id: Option<PisteId>,
    pub name: String,
    pub color: Color,
    /// Length in meters
    pub length: u32,
    /// Slope in percent
    pub slope: u32,
}

/// Weekly registration of a skier
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub registration_id: Option<u64>,
    pub num_week: u32,
}
