use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{Movement, MovementInput};
use crate::storage::MovementStore;

/// Owner of the canonical ordered movement collection.
///
/// The collection is ordered newest-created first; updates and deletes
/// preserve the positions of untouched records. All mutations persist the
/// full collection through the injected store before returning, then emit
/// a lifecycle event.
#[derive(Clone)]
pub struct MovementService {
    movements: Arc<RwLock<Vec<Movement>>>,
    store: Arc<dyn MovementStore>,
    events: EventSender,
}

impl MovementService {
    /// Builds the service over an empty collection. Call [`Self::load`]
    /// to seed it from the persistence collaborator.
    pub fn new(store: Arc<dyn MovementStore>, events: EventSender) -> Self {
        Self {
            movements: Arc::new(RwLock::new(Vec::new())),
            store,
            events,
        }
    }

    /// Replaces the in-memory collection with the persisted one.
    pub async fn load(&self) -> Result<(), ServiceError> {
        let loaded = self.store.load().await?;
        let mut movements = self.movements.write().await;
        *movements = loaded;
        info!(count = movements.len(), "movement collection ready");
        Ok(())
    }

    /// Creates a movement: validates and normalizes the input, assigns a
    /// fresh id, and prepends it so the newest record comes first.
    pub async fn create(&self, input: MovementInput) -> Result<Movement, ServiceError> {
        input.validate()?;
        let movement = Movement::from_input(Uuid::new_v4(), input);

        {
            let mut movements = self.movements.write().await;
            movements.insert(0, movement.clone());
            self.store.save(&movements).await?;
        }

        self.events
            .send(Event::MovementCreated {
                movement_id: movement.id,
                status: movement.status,
                timestamp: chrono::Utc::now(),
            })
            .await;
        Ok(movement)
    }

    /// Replaces the record matching `id` wholesale, preserving its
    /// position in the collection. There is no partial-field merge.
    pub async fn update(&self, id: Uuid, input: MovementInput) -> Result<Movement, ServiceError> {
        input.validate()?;
        let movement = Movement::from_input(id, input);

        {
            let mut movements = self.movements.write().await;
            let slot = movements
                .iter_mut()
                .find(|m| m.id == id)
                .ok_or_else(|| ServiceError::movement_not_found(id))?;
            *slot = movement.clone();
            self.store.save(&movements).await?;
        }

        self.events
            .send(Event::MovementUpdated {
                movement_id: movement.id,
                status: movement.status,
                timestamp: chrono::Utc::now(),
            })
            .await;
        Ok(movement)
    }

    /// Removes the record matching `id`. Confirmation prompts are the
    /// caller's concern; the store deletes unconditionally.
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        {
            let mut movements = self.movements.write().await;
            let position = movements
                .iter()
                .position(|m| m.id == id)
                .ok_or_else(|| ServiceError::movement_not_found(id))?;
            movements.remove(position);
            self.store.save(&movements).await?;
        }

        self.events
            .send(Event::MovementDeleted {
                movement_id: id,
                timestamp: chrono::Utc::now(),
            })
            .await;
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Movement, ServiceError> {
        self.movements
            .read()
            .await
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::movement_not_found(id))
    }

    /// Snapshot of the full collection in store order.
    pub async fn list(&self) -> Vec<Movement> {
        self.movements.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.movements.read().await.len()
    }
}
