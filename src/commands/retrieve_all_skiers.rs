use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::Skier,
    ports::{piste::PistePort, skier::SkierPort},
};
use tower::Service;

use super::{Error, SkierService};

/// List every skier, in store order
pub struct RetrieveAllSkiersRequest;

impl<S, P> Service<RetrieveAllSkiersRequest> for SkierService<S, P>
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

    fn call(&mut self, _req: RetrieveAllSkiersRequest) -> Self::Future {
        let skiers = self.skiers.clone();
        Box::pin(async move {
            let skiers = skiers.find_all().await?;
            tracing::debug!(count = skiers.len(), "retrieved all skiers");

            Ok(skiers)
        })
    }
}
