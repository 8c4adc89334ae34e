use crate::domain::{Piste, PisteId};

#[mockall::automock]
#[async_trait::async_trait]
pub trait PistePort {
    async fn find_by_id(&self, piste_id: PisteId) -> Result<Piste, Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Domain-level error when a piste does not exist
    #[error("piste {0} does not exist")]
    PisteDoesNotExist(PisteId),

    /// Concrete adapter errors
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}
