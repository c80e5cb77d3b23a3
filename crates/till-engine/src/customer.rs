//! # Customer Directory
//!
//! CRUD over the customer store. Customers are informational only: sale
//! records do not reference them, so directory edits and deletes never
//! interact with sales or stock.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{OpsError, OpsResult};
use till_core::validation::{validate_email, validate_required_text, validate_text};
use till_core::{Customer, ValidationError};
use till_db::repository::customer::generate_customer_id;
use till_db::Database;

/// Fields for creating or editing a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Directory operations over the customer store.
#[derive(Debug, Clone)]
pub struct CustomerDirectory {
    db: Database,
}

impl CustomerDirectory {
    pub fn new(db: Database) -> Self {
        CustomerDirectory { db }
    }

    /// Lists all customers, sorted by name.
    pub async fn list(&self) -> OpsResult<Vec<Customer>> {
        Ok(self.db.customers().list().await?)
    }

    /// Gets one customer by ID.
    pub async fn get(&self, id: &str) -> OpsResult<Customer> {
        self.db
            .customers()
            .get_by_id(id)
            .await?
            .ok_or_else(|| OpsError::CustomerNotFound { id: id.to_string() })
    }

    /// Creates a customer and returns it with its generated ID.
    pub async fn create(&self, draft: CustomerDraft) -> OpsResult<Customer> {
        debug!(name = %draft.name, "Creating customer");

        let (name, email, phone, address) = validate_draft(&draft)?;

        let now = Utc::now();
        let customer = Customer {
            id: generate_customer_id(),
            name,
            email,
            phone,
            address,
            created_at: now,
            updated_at: now,
        };

        self.db.customers().insert(&customer).await?;

        info!(customer_id = %customer.id, name = %customer.name, "Customer created");

        Ok(customer)
    }

    /// Updates a customer's fields and returns the updated customer.
    pub async fn update(&self, id: &str, draft: CustomerDraft) -> OpsResult<Customer> {
        debug!(customer_id = %id, "Updating customer");

        let (name, email, phone, address) = validate_draft(&draft)?;

        let mut customer = self.get(id).await?;
        customer.name = name;
        customer.email = email;
        customer.phone = phone;
        customer.address = address;
        customer.updated_at = Utc::now();

        self.db.customers().update(&customer).await?;

        info!(customer_id = %id, "Customer updated");

        Ok(customer)
    }

    /// Deletes a customer. Requires `confirmed = true`; an unconfirmed call
    /// is rejected with no state change.
    pub async fn delete(&self, id: &str, confirmed: bool) -> OpsResult<()> {
        if !confirmed {
            return Err(ValidationError::ConfirmationRequired {
                entity: "customer".to_string(),
            }
            .into());
        }

        self.get(id).await?;
        self.db.customers().delete(id).await?;

        info!(customer_id = %id, "Customer deleted");

        Ok(())
    }
}

fn validate_draft(draft: &CustomerDraft) -> OpsResult<(String, String, String, String)> {
    let name = validate_required_text("name", &draft.name)?;
    let email = validate_email(&draft.email)?;
    let phone = validate_text("phone", &draft.phone)?;
    let address = validate_text("address", &draft.address)?;
    Ok((name, email, phone, address))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use till_db::DbConfig;

    fn draft(name: &str, email: &str) -> CustomerDraft {
        CustomerDraft {
            name: name.to_string(),
            email: email.to_string(),
            phone: "+266 5885 1234".to_string(),
            address: "12 Kingsway, Maseru".to_string(),
        }
    }

    async fn directory() -> CustomerDirectory {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        CustomerDirectory::new(db)
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let directory = directory().await;

        let created = directory
            .create(draft("Thabo Mokoena", "thabo@example.com"))
            .await
            .unwrap();
        assert_eq!(created.name, "Thabo Mokoena");

        let updated = directory
            .update(&created.id, draft("Thabo M. Mokoena", "thabo@example.com"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Thabo M. Mokoena");
        assert_eq!(updated.id, created.id);

        directory.delete(&created.id, true).await.unwrap();
        assert!(matches!(
            directory.get(&created.id).await.unwrap_err(),
            OpsError::CustomerNotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_email() {
        let directory = directory().await;

        let err = directory
            .create(draft("Thabo Mokoena", "not-an-email"))
            .await
            .unwrap_err();
        assert!(matches!(err, OpsError::InvalidInput(_)));
        assert!(directory.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let directory = directory().await;
        let created = directory
            .create(draft("Thabo Mokoena", "thabo@example.com"))
            .await
            .unwrap();

        let err = directory.delete(&created.id, false).await.unwrap_err();
        assert!(matches!(err, OpsError::InvalidInput(_)));
        assert!(directory.get(&created.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_unknown_customer() {
        let directory = directory().await;

        let err = directory.delete("ghost", true).await.unwrap_err();
        assert!(matches!(err, OpsError::CustomerNotFound { .. }));
    }
}
