use std::{borrow::Cow, sync::Arc};

use tower::ServiceExt;

use crate::{
    domain::{PisteId, Skier, SkierId, SubscriptionDurations, TypeSubscription},
    ports::{piste::PistePort, skier::SkierPort},
};

pub mod add_skier;
pub mod assign_skier_to_piste;
pub mod remove_skier;
pub mod retrieve_all_skiers;
pub mod retrieve_skier;
pub mod retrieve_skiers_by_subscription_type;

use add_skier::AddSkierRequest;
use assign_skier_to_piste::AssignSkierToPisteRequest;
use remove_skier::RemoveSkierRequest;
use retrieve_all_skiers::RetrieveAllSkiersRequest;
use retrieve_skier::RetrieveSkierRequest;
use retrieve_skiers_by_subscription_type::RetrieveSkiersBySubscriptionTypeRequest;

/// Skier management operations
///
/// Each operation is a [`tower::Service`] over its own request type. The inherent methods are
/// shortcuts that run a single request to completion.
pub struct SkierService<S, P> {
    skiers: Arc<S>,
    pistes: Arc<P>,
    durations: Arc<SubscriptionDurations>,
}

impl<S, P> SkierService<S, P> {
    pub fn new(skiers: Arc<S>, pistes: Arc<P>, durations: SubscriptionDurations) -> Self {
        Self {
            skiers,
            pistes,
            durations: Arc::new(durations),
        }
    }
}

impl<S, P> Clone for SkierService<S, P> {
    fn clone(&self) -> Self {
        Self {
            skiers: self.skiers.clone(),
            pistes: self.pistes.clone(),
            durations: self.durations.clone(),
        }
    }
}

impl<S, P> SkierService<S, P>
where
    S: SkierPort + 'static,
    P: PistePort + 'static,
{
    pub async fn retrieve_all_skiers(&self) -> Result<Vec<Skier>, Error> {
        self.clone().oneshot(RetrieveAllSkiersRequest).await
    }

    pub async fn retrieve_skier(&self, skier_id: SkierId) -> Result<Skier, Error> {
        self.clone()
            .oneshot(RetrieveSkierRequest { skier_id })
            .await
    }

    pub async fn retrieve_skiers_by_subscription_type(
        &self,
        type_sub: TypeSubscription,
    ) -> Result<Vec<Skier>, Error> {
        self.clone()
            .oneshot(RetrieveSkiersBySubscriptionTypeRequest { type_sub })
            .await
    }

    pub async fn add_skier(&self, skier: Skier) -> Result<Skier, Error> {
        self.clone().oneshot(AddSkierRequest { skier }).await
    }

    pub async fn remove_skier(&self, skier_id: SkierId) -> Result<(), Error> {
        self.clone().oneshot(RemoveSkierRequest { skier_id }).await
    }

    pub async fn assign_skier_to_piste(
        &self,
        skier_id: SkierId,
        piste_id: PisteId,
    ) -> Result<Skier, Error> {
        self.clone()
            .oneshot(AssignSkierToPisteRequest { skier_id, piste_id })
            .await
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("skier port error: {0:?}")]
    Skier(#[from] crate::ports::skier::Error),
    #[error("piste port error: {0:?}")]
    Piste(#[from] crate::ports::piste::Error),
    #[error("subscription error: {0}")]
    Subscription(#[from] crate::domain::subscription::Error),

    #[error("invalid state: {0}")]
    InvalidState(Cow<'static, str>),
}
