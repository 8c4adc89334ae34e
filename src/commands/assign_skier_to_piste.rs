use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{PisteId, Skier, SkierId},
    ports::{piste::PistePort, skier::SkierPort},
};
use tower::Service;

use super::{Error, SkierService};

pub struct AssignSkierToPisteRequest {
    pub skier_id: SkierId,
    pub piste_id: PisteId,
}

impl<S, P> Service<AssignSkierToPisteRequest> for SkierService<S, P>
where
    S: SkierPort + 'static,
    P: PistePort + 'static,
{
    type Response = Skier;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: AssignSkierToPisteRequest) -> Self::Future {
        let skiers = self.skiers.clone();
        let pistes = self.pistes.clone();
        Box::pin(async move {
            // Fetch necessary data
            let mut skier = skiers.find_by_id(req.skier_id).await?;
            let piste = pistes.find_by_id(req.piste_id).await?;

            if !skier.assign_piste(piste) {
                tracing::debug!(
                    skier_id = req.skier_id,
                    piste_id = req.piste_id,
                    "skier already assigned to piste"
                );
                return Ok(skier);
            }

            let saved = skiers.save(skier).await?;
            tracing::info!(
                skier_id = req.skier_id,
                piste_id = req.piste_id,
                "skier assigned to piste"
            );

            Ok(saved)
        })
    }
}
