//! # Client Service
//!
//! Client registration and contact management. The aggregate
//! `total_credit_cents` balance is never written here; only the sale and
//! payment workflows adjust it.

use chrono::Utc;
use tracing::info;

use crate::pool::Database;
use crate::repository::generate_id;
use crate::service::{ServiceError, ServiceResult};
use boucherie_core::{
    validation, Client, CoreError, CreateClientRequest, UpdateClientRequest,
};

/// Service for client management.
#[derive(Debug, Clone)]
pub struct ClientService {
    db: Database,
}

impl ClientService {
    /// Creates a new ClientService.
    pub fn new(db: Database) -> Self {
        ClientService { db }
    }

    /// Lists every client, newest first.
    pub async fn list(&self) -> ServiceResult<Vec<Client>> {
        Ok(self.db.clients().find_all().await?)
    }

    /// Gets a client by ID.
    pub async fn get(&self, id: &str) -> ServiceResult<Client> {
        self.db
            .clients()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::Core(CoreError::ClientNotFound(id.to_string())))
    }

    /// Registers a new client with a zero credit balance.
    pub async fn create(&self, req: CreateClientRequest) -> ServiceResult<Client> {
        validation::validate_name(&req.name)?;

        let client = Client {
            id: generate_id(),
            name: req.name.trim().to_string(),
            phone: req.phone.trim().to_string(),
            email: req.email.unwrap_or_default().trim().to_string(),
            avatar: String::new(),
            total_credit_cents: 0,
            created_at: Utc::now(),
        };

        self.db.clients().insert(&client).await?;
        info!(id = %client.id, name = %client.name, "client registered");

        Ok(client)
    }

    /// Updates a client's contact fields. Absent fields keep their current
    /// value; the credit balance is untouched.
    pub async fn update(&self, id: &str, req: UpdateClientRequest) -> ServiceResult<Client> {
        let mut client = self.get(id).await?;

        if let Some(name) = req.name {
            validation::validate_name(&name)?;
            client.name = name.trim().to_string();
        }
        if let Some(phone) = req.phone {
            client.phone = phone.trim().to_string();
        }
        if let Some(email) = req.email {
            client.email = email.trim().to_string();
        }

        self.db.clients().update(&client).await?;

        Ok(client)
    }

    /// Ensures the walk-in sentinel client exists. Race-safe: a concurrent
    /// first walk-in sale and the seed may both call this.
    pub async fn provision_walk_in(&self) -> ServiceResult<()> {
        let walk_in = Client::walk_in(Utc::now());
        let created = self.db.clients().insert_if_absent(&walk_in).await?;
        if created {
            info!("walk-in client provisioned");
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use boucherie_core::WALKIN_CLIENT_ID;

    async fn service() -> ClientService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        ClientService::new(db)
    }

    fn create_req(name: &str) -> CreateClientRequest {
        CreateClientRequest {
            name: name.to_string(),
            phone: "06 12 34 56 78".to_string(),
            email: Some("dupont@example.fr".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let svc = service().await;

        let created = svc.create(create_req("Mme Dupont")).await.unwrap();
        assert_eq!(created.total_credit_cents, 0);

        let fetched = svc.get(&created.id).await.unwrap();
        assert_eq!(fetched.name, "Mme Dupont");
        assert_eq!(fetched.phone, "06 12 34 56 78");
    }

    #[tokio::test]
    async fn test_create_rejects_short_name() {
        let svc = service().await;
        let err = svc.create(create_req("A")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_unknown_client() {
        let svc = service().await;
        let err = svc.get("nope").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_partial() {
        let svc = service().await;
        let created = svc.create(create_req("Mme Dupont")).await.unwrap();

        let updated = svc
            .update(
                &created.id,
                UpdateClientRequest {
                    phone: Some("07 00 00 00 00".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Mme Dupont"); // unchanged
        assert_eq!(updated.phone, "07 00 00 00 00");
    }

    #[tokio::test]
    async fn test_provision_walk_in_idempotent() {
        let svc = service().await;

        svc.provision_walk_in().await.unwrap();
        svc.provision_walk_in().await.unwrap();

        let walk_in = svc.get(WALKIN_CLIENT_ID).await.unwrap();
        assert_eq!(walk_in.name, boucherie_core::WALKIN_CLIENT_NAME);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let svc = service().await;
        svc.create(create_req("Mme Dupont")).await.unwrap();
        svc.create(create_req("M. Martin")).await.unwrap();

        let clients = svc.list().await.unwrap();
        assert_eq!(clients.len(), 2);
    }
}
