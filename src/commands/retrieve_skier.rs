use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{Skier, SkierId},
    ports::{piste::PistePort, skier::SkierPort},
};
use tower::Service;

use super::{Error, SkierService};

pub struct RetrieveSkierRequest {
    pub skier_id: SkierId,
}

impl<S, P> Service<RetrieveSkierRequest> for SkierService<S, P>
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

    fn call(&mut self, req: RetrieveSkierRequest) -> Self::Future {
        let skiers = self.skiers.clone();
        Box::pin(async move { Ok(skiers.find_by_id(req.skier_id).await?) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        commands::test_support::{jane_smith, service, with_id},
        ports::skier::{self, MockSkierPort},
    };
    use mockall::predicate::*;
    use speculoos::prelude::*;

    #[tokio::test]
    async fn test_call() {
        let mut skiers = MockSkierPort::new();
        skiers
            .expect_find_by_id()
            .with(eq(2))
            .times(1)
            .returning(|skier_id| Ok(with_id(jane_smith(), skier_id)));
        let domain = service(skiers);

        let res = domain.retrieve_skier(2).await;

        assert_that!(res)
            .is_ok()
            .is_equal_to(with_id(jane_smith(), 2));
    }

    #[tokio::test]
    async fn test_not_found() {
        let mut skiers = MockSkierPort::new();
        skiers
            .expect_find_by_id()
            .returning(|skier_id| Err(skier::Error::SkierDoesNotExist(skier_id)));
        let domain = service(skiers);

        let res = domain.retrieve_skier(3).await;

        assert_that!(res).is_err().matches(|err| {
            matches!(err, Error::Skier(skier::Error::SkierDoesNotExist(3)))
        });
    }
}
