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

/// Insert or update a skier
///
/// If the skier carries a subscription, its end date is computed from its start date and type
/// before saving.
pub struct AddSkierRequest {
    pub skier: Skier,
}

impl<S, P> Service<AddSkierRequest> for SkierService<S, P>
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

    fn call(&mut self, req: AddSkierRequest) -> Self::Future {
        let skiers = self.skiers.clone();
        let durations = self.durations.clone();
        Box::pin(async move {
            let mut skier = req.skier;
            if let Some(subscription) = skier.subscription.as_mut() {
                subscription.compute_end_date(&durations)?;
            }

            let saved = skiers.save(skier).await?;
            let skier_id = saved.skier_id.ok_or(Error::InvalidState(
                "store returned a skier without identifier".into(),
            ))?;
            tracing::info!(
                skier_id,
                end_date = ?saved.subscription.as_ref().and_then(|s| s.end_date),
                "skier saved"
            );

            Ok(saved)
        })
    }
}
