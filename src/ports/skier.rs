use crate::domain::{Skier, SkierId, TypeSubscription};

#[mockall::automock]
#[async_trait::async_trait]
pub trait SkierPort {
    /// Every skier in the store, in store order
    async fn find_all(&self) -> Result<Vec<Skier>, Error>;
    async fn find_by_id(&self, skier_id: SkierId) -> Result<Skier, Error>;
    async fn find_by_subscription_type(
        &self,
        type_sub: TypeSubscription,
    ) -> Result<Vec<Skier>, Error>;
    /// Insert or update a skier
    ///
    /// A skier without identifier is inserted and receives one from the store. A skier with an
    /// identifier replaces the stored record with that identifier.
    async fn save(&self, skier: Skier) -> Result<Skier, Error>;
    async fn delete_by_id(&self, skier_id: SkierId) -> Result<(), Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Domain-level error when a skier does not exist
    #[error("skier {0} does not exist")]
    SkierDoesNotExist(SkierId),

    /// Concrete adapter errors
    ///
    /// This could represent any errors from a concrete adapter that is not part of the domain
    /// model, such as connectivity, timeout, or permission errors. The store is considered
    /// unavailable for this operation.
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}
