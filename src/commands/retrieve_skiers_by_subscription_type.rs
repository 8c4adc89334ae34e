use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{Skier, TypeSubscription},
    ports::{piste::PistePort, skier::SkierPort},
};
use tower::Service;

use super::{Error, SkierService};

/// List the skiers holding a subscription of the given type
pub struct RetrieveSkiersBySubscriptionTypeRequest {
    pub type_sub: TypeSubscription,
}

impl<S, P> Service<RetrieveSkiersBySubscriptionTypeRequest> for SkierService<S, P>
where
    S: SkierPort + 'static,
    P: PistePort + 'static,
{
    type Response = Vec<Skier>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: RetrieveSkiersBySubscriptionTypeRequest) -> Self::Future {
        let skiers = self.skiers.clone();
        Box::pin(async move {
            let skiers = skiers.find_by_subscription_type(req.type_sub).await?;
            tracing::debug!(
                type_sub = %req.type_sub,
                count = skiers.len(),
                "retrieved skiers by subscription type"
            );

            Ok(skiers)
        })
    }
}
