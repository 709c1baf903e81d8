use async_trait::async_trait;

use crate::error::RepoError;

/// Uniform CRUD contract every entity repository implements.
///
/// `create` returns the id assigned by the store. `update` and `delete`
/// resolve to `RepoError::NotFound` when no row matched, so callers
/// distinguish an absent id from a store failure without inspecting a
/// boolean.
#[async_trait]
pub trait Repository: Send + Sync {
    type Entity: Send + Sync;
    type Id: Send + Sync;

    async fn find_all(&self) -> Result<Vec<Self::Entity>, RepoError>;

    async fn find_by_id(&self, id: Self::Id) -> Result<Option<Self::Entity>, RepoError>;

    /// Pure existence probe, no side effects.
    async fn exists(&self, id: Self::Id) -> Result<bool, RepoError>;

    async fn create(&self, entity: &Self::Entity) -> Result<Self::Id, RepoError>;

    /// Whole-entity replace keyed by `entity.id`, not a partial patch.
    async fn update(&self, entity: &Self::Entity) -> Result<(), RepoError>;

    async fn delete(&self, id: Self::Id) -> Result<(), RepoError>;
}
