use std::sync::Arc;

use crate::models::document::{
    is_valid_document_id, Collection, DeleteResult, Document, Filter, InsertOneResult,
    UpdateResult,
};
use crate::models::service::{ServiceUpdateRequest, SERVICE_OWNER_EMAIL, SERVICE_SELECTED_ID};
use crate::repositories::document_repository::DocumentRepository;
use crate::services::errors::record_service_errors::RecordServiceError;

/// Operations on the services collection.
pub struct CatalogService {
    repository: Arc<dyn DocumentRepository + Send + Sync>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn DocumentRepository + Send + Sync>) -> Self {
        CatalogService { repository }
    }

    pub async fn list_services(&self) -> Result<Vec<Document>, RecordServiceError> {
        Ok(self
            .repository
            .find(Collection::Services, &Filter::all())
            .await?)
    }

    pub async fn get_service(&self, id: &str) -> Result<Option<Document>, RecordServiceError> {
        ensure_document_id(id)?;
        Ok(self
            .repository
            .find_one(Collection::Services, &Filter::by_id(id))
            .await?)
    }

    pub async fn services_for_owner(&self, email: &str) -> Result<Vec<Document>, RecordServiceError> {
        Ok(self
            .repository
            .find(Collection::Services, &Filter::eq(SERVICE_OWNER_EMAIL, email))
            .await?)
    }

    pub async fn create_service(
        &self,
        service: Document,
    ) -> Result<InsertOneResult, RecordServiceError> {
        Ok(self
            .repository
            .insert_one(Collection::Services, service)
            .await?)
    }

    pub async fn update_service(
        &self,
        id: &str,
        update: ServiceUpdateRequest,
    ) -> Result<UpdateResult, RecordServiceError> {
        ensure_document_id(id)?;
        Ok(self
            .repository
            .update_one(
                Collection::Services,
                &Filter::by_id(id),
                update.into_fields(),
                true,
            )
            .await?)
    }

    /// Deletes the service whose `selectedId` field equals `id`. Records
    /// created through this backend never carry that field.
    pub async fn delete_service(&self, id: &str) -> Result<DeleteResult, RecordServiceError> {
        Ok(self
            .repository
            .delete_one(Collection::Services, &Filter::eq(SERVICE_SELECTED_ID, id))
            .await?)
    }
}

pub(crate) fn ensure_document_id(id: &str) -> Result<(), RecordServiceError> {
    if is_valid_document_id(id) {
        Ok(())
    } else {
        Err(RecordServiceError::InvalidIdentifier(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{new_document_id, ID_FIELD};
    use crate::repositories::document_repository::MockDocumentRepository;
    use crate::repositories::errors::document_repository_errors::DocumentRepositoryError;
    use serde_json::json;

    fn service(id: &str) -> Document {
        serde_json::from_value(json!({
            "_id": id,
            "nameOfService": "Poster printing",
            "email": "owner@example.com"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_services_uses_empty_filter() {
        let mut mock_repo = MockDocumentRepository::new();
        mock_repo
            .expect_find()
            .withf(|collection, filter| *collection == Collection::Services && filter.is_empty())
            .times(1)
            .returning(|_, _| Ok(vec![service("1"), service("2")]));

        let catalog = CatalogService::new(Arc::new(mock_repo));
        let services = catalog.list_services().await.unwrap();
        assert_eq!(services.len(), 2);
    }

    #[tokio::test]
    async fn test_get_service_rejects_malformed_id_without_store_access() {
        let mut mock_repo = MockDocumentRepository::new();
        mock_repo.expect_find_one().never();

        let catalog = CatalogService::new(Arc::new(mock_repo));
        let result = catalog.get_service("not-an-id").await;
        assert!(matches!(
            result,
            Err(RecordServiceError::InvalidIdentifier(id)) if id == "not-an-id"
        ));
    }

    #[tokio::test]
    async fn test_get_service_looks_up_by_id() {
        let id = new_document_id();
        let expected_filter = Filter::by_id(&id);
        let stored = service(&id);
        let returned = stored.clone();

        let mut mock_repo = MockDocumentRepository::new();
        mock_repo
            .expect_find_one()
            .withf(move |collection, filter| {
                *collection == Collection::Services && *filter == expected_filter
            })
            .times(1)
            .returning(move |_, _| Ok(Some(returned.clone())));

        let catalog = CatalogService::new(Arc::new(mock_repo));
        let found = catalog.get_service(&id).await.unwrap();
        assert_eq!(found, Some(stored));
    }

    #[tokio::test]
    async fn test_update_service_upserts_mapped_fields() {
        let id = new_document_id();
        let expected_filter = Filter::by_id(&id);

        let mut mock_repo = MockDocumentRepository::new();
        mock_repo
            .expect_update_one()
            .withf(move |collection, filter, fields, upsert| {
                *collection == Collection::Services
                    && *filter == expected_filter
                    && fields["nameOfService"] == json!("Lamination")
                    && fields["price"] == serde_json::Value::Null
                    && !fields.contains_key(ID_FIELD)
                    && *upsert
            })
            .times(1)
            .returning(|_, _, _, _| Ok(UpdateResult::matched(1, 1)));

        let catalog = CatalogService::new(Arc::new(mock_repo));
        let update: ServiceUpdateRequest =
            serde_json::from_value(json!({"name": "Lamination"})).unwrap();
        let result = catalog.update_service(&id, update).await.unwrap();
        assert_eq!(result, UpdateResult::matched(1, 1));
    }

    #[tokio::test]
    async fn test_delete_service_filters_on_selected_id() {
        let id = new_document_id();
        let expected_filter = Filter::eq(SERVICE_SELECTED_ID, id.as_str());

        let mut mock_repo = MockDocumentRepository::new();
        mock_repo
            .expect_delete_one()
            .withf(move |collection, filter| {
                *collection == Collection::Services && *filter == expected_filter
            })
            .times(1)
            .returning(|_, _| Ok(DeleteResult::new(0)));

        let catalog = CatalogService::new(Arc::new(mock_repo));
        let result = catalog.delete_service(&id).await.unwrap();
        assert_eq!(result.deleted_count, 0);
    }

    #[tokio::test]
    async fn test_repository_failure_is_reported() {
        let mut mock_repo = MockDocumentRepository::new();
        mock_repo
            .expect_find()
            .returning(|_, _| Err(DocumentRepositoryError::DynamoDb("unreachable".to_string())));

        let catalog = CatalogService::new(Arc::new(mock_repo));
        let result = catalog.services_for_owner("owner@example.com").await;
        assert!(matches!(result, Err(RecordServiceError::RepositoryError(_))));
    }
}
