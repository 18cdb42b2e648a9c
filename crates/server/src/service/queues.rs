// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue CRUD and info.

use flotilla_core::{GlobalPermission, JobSetInfo, Queue, Verb};
use tracing::info;

use super::{registry_err, SubmitServer};
use crate::error::ApiError;
use crate::scope::RequestScope;

impl SubmitServer {
    /// Create a queue, defaulting ownership to the caller when omitted.
    pub async fn create_queue(
        &self,
        scope: &RequestScope,
        mut queue: Queue,
    ) -> Result<(), ApiError> {
        const OP: &str = "CreateQueue";
        self.ensure_deadline(OP, scope)?;
        self.authorizer
            .authorize_global(scope.principal(), GlobalPermission::CreateQueue)
            .map_err(|e| ApiError::permission_denied(OP, e.to_string()))?;

        if queue.user_owners.is_empty() {
            queue.user_owners = vec![scope.principal_name().to_string()];
        }
        queue
            .validate()
            .map_err(|e| ApiError::invalid_argument(OP, e.to_string()))?;

        let name = queue.name.clone();
        self.registry
            .create(queue)
            .await
            .map_err(|e| registry_err(OP, e))?;
        info!(queue = %name, principal = %scope.principal_name(), "created queue");
        Ok(())
    }

    /// Replace a queue's definition.
    pub async fn update_queue(&self, scope: &RequestScope, queue: Queue) -> Result<(), ApiError> {
        const OP: &str = "UpdateQueue";
        self.ensure_deadline(OP, scope)?;
        self.authorizer
            .authorize_global(scope.principal(), GlobalPermission::CreateQueue)
            .map_err(|e| ApiError::permission_denied(OP, e.to_string()))?;

        queue
            .validate()
            .map_err(|e| ApiError::invalid_argument(OP, e.to_string()))?;

        let name = queue.name.clone();
        self.registry
            .update(queue)
            .await
            .map_err(|e| registry_err(OP, e))?;
        info!(queue = %name, principal = %scope.principal_name(), "updated queue");
        Ok(())
    }

    /// Delete a queue; refused while it still holds active job sets.
    pub async fn delete_queue(&self, scope: &RequestScope, name: &str) -> Result<(), ApiError> {
        const OP: &str = "DeleteQueue";
        self.ensure_deadline(OP, scope)?;
        self.authorizer
            .authorize_global(scope.principal(), GlobalPermission::DeleteQueue)
            .map_err(|e| ApiError::permission_denied(OP, e.to_string()))?;

        let active = self
            .registry
            .get_active_job_sets(name)
            .await
            .map_err(|e| registry_err(OP, e))?;
        if !active.is_empty() {
            return Err(ApiError::failed_precondition(
                OP,
                format!("queue {name:?} still has {} active job sets", active.len()),
            ));
        }

        self.registry
            .delete(name)
            .await
            .map_err(|e| registry_err(OP, e))?;
        info!(queue = %name, principal = %scope.principal_name(), "deleted queue");
        Ok(())
    }

    /// Fetch a queue definition.
    pub async fn get_queue(&self, scope: &RequestScope, name: &str) -> Result<Queue, ApiError> {
        const OP: &str = "GetQueue";
        self.ensure_deadline(OP, scope)?;
        self.registry.get(name).await.map_err(|e| registry_err(OP, e))
    }

    /// Fetch the queue's active job sets. Requires `watch_all_events`
    /// globally or the queue-local `watch` verb.
    pub async fn get_queue_info(
        &self,
        scope: &RequestScope,
        name: &str,
    ) -> Result<Vec<JobSetInfo>, ApiError> {
        const OP: &str = "GetQueueInfo";
        self.ensure_deadline(OP, scope)?;
        let queue = self.registry.get(name).await.map_err(|e| registry_err(OP, e))?;
        self.authorizer
            .authorize_queue_verb(scope.principal(), &queue, Verb::Watch)
            .map_err(|e| ApiError::permission_denied(OP, e.to_string()))?;

        self.registry
            .get_active_job_sets(name)
            .await
            .map_err(|e| registry_err(OP, e))
    }
}

#[cfg(test)]
#[path = "queues_tests.rs"]
mod tests;
