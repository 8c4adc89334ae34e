use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::SkierId,
    ports::{piste::PistePort, skier::SkierPort},
};
use tower::Service;

use super::{Error, SkierService};

pub struct RemoveSkierRequest {
    pub skier_id: SkierId,
}

impl<S, P> Service<RemoveSkierRequest> for SkierService<S, P>
where
    S: SkierPort + 'static,
    P: PistePort + 'static,
{
    type Response = ();
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: RemoveSkierRequest) -> Self::Future {
        let skiers = self.skiers.clone();
        Box::pin(async move {
            skiers.delete_by_id(req.skier_id).await?;
            tracing::info!(skier_id = req.skier_id, "skier removed");

            Ok(())
        })
    }
}
