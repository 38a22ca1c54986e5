use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{debug, error};

use crate::routes::EmailQuery;
use crate::{error::ApiError, middleware::auth::AuthenticatedUser, state::AppState};
use shared::models::document::{DeleteResult, Document, InsertOneResult, UpdateResult};
use shared::models::service::ServiceUpdateRequest;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services).post(create_service))
        .route(
            "/services/{id}",
            get(get_service).put(update_service).delete(delete_service),
        )
        .route("/my-services", get(my_services))
        .route(
            "/my-services/update/{id}",
            get(get_service).put(update_own_service),
        )
}

async fn list_services(State(state): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    state
        .catalog_service
        .list_services()
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to list services: {}", e);
            ApiError::from(e)
        })
}

async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Document>>, ApiError> {
    state
        .catalog_service
        .get_service(&id)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to retrieve service {}: {}", id, e);
            ApiError::from(e)
        })
}

async fn create_service(
    State(state): State<AppState>,
    Json(service): Json<Document>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let result = state
        .catalog_service
        .create_service(service)
        .await
        .map_err(|e| {
            error!("Failed to add service: {}", e);
            ApiError::from(e)
        })?;
    debug!("Service added with _id {}", result.inserted_id);
    Ok(Json(result))
}

async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<ServiceUpdateRequest>,
) -> Result<Json<UpdateResult>, ApiError> {
    upsert_service(&state, &id, update).await
}

/// Requires a valid token but, unlike the listing endpoints, no email match.
async fn update_own_service(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(update): Json<ServiceUpdateRequest>,
) -> Result<Json<UpdateResult>, ApiError> {
    debug!(
        "Service {} updated by {:?}",
        id,
        authenticated_user.claims.email()
    );
    upsert_service(&state, &id, update).await
}

async fn upsert_service(
    state: &AppState,
    id: &str,
    update: ServiceUpdateRequest,
) -> Result<Json<UpdateResult>, ApiError> {
    let result = state
        .catalog_service
        .update_service(id, update)
        .await
        .map_err(|e| {
            error!("Failed to update service {}: {}", id, e);
            ApiError::from(e)
        })?;
    debug!(
        "{} document(s) matched the filter, updated {} document(s)",
        result.matched_count, result.modified_count
    );
    Ok(Json(result))
}

async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    let result = state
        .catalog_service
        .delete_service(&id)
        .await
        .map_err(|e| {
            error!("Failed to delete service {}: {}", id, e);
            ApiError::from(e)
        })?;
    debug!("Deleted {} service(s) for {}", result.deleted_count, id);
    Ok(Json(result))
}

async fn my_services(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let email = authenticated_user.authorize_email(query.email.as_deref())?;
    state
        .catalog_service
        .services_for_owner(email)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to list services owned by {}: {}", email, e);
            ApiError::from(e)
        })
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{test_server, token_cookie, token_for};
    use axum::http::StatusCode;
    use serde_json::json;
    use shared::models::document::{
        new_document_id, Collection, DeleteResult, Filter, InsertOneResult, UpdateResult,
    };
    use shared::repositories::document_repository::MockDocumentRepository;
    use shared::repositories::errors::document_repository_errors::DocumentRepositoryError;

    #[tokio::test]
    async fn test_list_services_is_public() {
        let mut mock_repo = MockDocumentRepository::new();
        mock_repo
            .expect_find()
            .withf(|collection, filter| *collection == Collection::Services && filter.is_empty())
            .times(1)
            .returning(|_, _| {
                Ok(vec![json!({"_id": "1", "nameOfService": "Photocopy"})
                    .as_object()
                    .cloned()
                    .unwrap()])
            });
        let server = test_server(mock_repo);

        let response = server.get("/services").await;

        response.assert_status_ok();
        response.assert_json(&json!([{"_id": "1", "nameOfService": "Photocopy"}]));
    }

    #[tokio::test]
    async fn test_missing_service_is_null() {
        let id = new_document_id();
        let mut mock_repo = MockDocumentRepository::new();
        mock_repo
            .expect_find_one()
            .times(1)
            .returning(|_, _| Ok(None));
        let server = test_server(mock_repo);

        let response = server.get(&format!("/services/{}", id)).await;

        response.assert_status_ok();
        response.assert_json(&json!(null));
    }

    #[tokio::test]
    async fn test_malformed_service_id_is_bad_request() {
        let mut mock_repo = MockDocumentRepository::new();
        mock_repo.expect_find_one().never();
        let server = test_server(mock_repo);

        let response = server.get("/my-services/update/not-an-id").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({"message": "invalid identifier"}));
    }

    #[tokio::test]
    async fn test_create_service_returns_insert_result() {
        let mut mock_repo = MockDocumentRepository::new();
        mock_repo
            .expect_insert_one()
            .withf(|collection, document| {
                *collection == Collection::Services && document["price"] == json!(15)
            })
            .times(1)
            .returning(|_, _| Ok(InsertOneResult::new("s-1".to_string())));
        let server = test_server(mock_repo);

        let response = server
            .post("/services")
            .json(&json!({"nameOfService": "Binding", "price": 15}))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({"acknowledged": true, "insertedId": "s-1"}));
    }

    #[tokio::test]
    async fn test_delete_with_unknown_selected_id_deletes_nothing() {
        let id = new_document_id();
        let expected_filter = Filter::eq("selectedId", id.as_str());
        let mut mock_repo = MockDocumentRepository::new();
        mock_repo
            .expect_delete_one()
            .withf(move |collection, filter| {
                *collection == Collection::Services && *filter == expected_filter
            })
            .times(1)
            .returning(|_, _| Ok(DeleteResult::new(0)));
        let server = test_server(mock_repo);

        let response = server.delete(&format!("/services/{}", id)).await;

        response.assert_status_ok();
        response.assert_json(&json!({"acknowledged": true, "deletedCount": 0}));
    }

    #[tokio::test]
    async fn test_update_own_service_requires_token() {
        let mut mock_repo = MockDocumentRepository::new();
        mock_repo.expect_update_one().never();
        let server = test_server(mock_repo);

        let response = server
            .put(&format!("/my-services/update/{}", new_document_id()))
            .json(&json!({"name": "Scanning"}))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_update_own_service_skips_email_check() {
        let id = new_document_id();
        let expected_filter = Filter::by_id(&id);
        let mut mock_repo = MockDocumentRepository::new();
        mock_repo
            .expect_update_one()
            .withf(move |collection, filter, fields, upsert| {
                *collection == Collection::Services
                    && *filter == expected_filter
                    && fields["email"] == json!("owner@example.com")
                    && *upsert
            })
            .times(1)
            .returning(|_, _, _, _| Ok(UpdateResult::matched(1, 1)));
        let server = test_server(mock_repo);
        let (name, value) = token_cookie(&token_for("someone-else@example.com"));

        let response = server
            .put(&format!("/my-services/update/{}", id))
            .add_header(name, value)
            .json(&json!({"name": "Scanning", "email": "owner@example.com"}))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "acknowledged": true,
            "matchedCount": 1,
            "modifiedCount": 1,
            "upsertedCount": 0,
            "upsertedId": null
        }));
    }

    #[tokio::test]
    async fn test_my_services_filters_on_owner_email() {
        let mut mock_repo = MockDocumentRepository::new();
        mock_repo
            .expect_find()
            .withf(|collection, filter| {
                *collection == Collection::Services
                    && *filter == Filter::eq("email", "owner@example.com")
            })
            .times(1)
            .returning(|_, _| Ok(vec![]));
        let server = test_server(mock_repo);
        let (name, value) = token_cookie(&token_for("owner@example.com"));

        let response = server
            .get("/my-services")
            .add_query_param("email", "owner@example.com")
            .add_header(name, value)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!([]));
    }

    #[tokio::test]
    async fn test_my_services_mismatch_is_forbidden() {
        let mut mock_repo = MockDocumentRepository::new();
        mock_repo.expect_find().never();
        let server = test_server(mock_repo);
        let (name, value) = token_cookie(&token_for("owner@example.com"));

        let response = server
            .get("/my-services")
            .add_query_param("email", "Owner@example.com")
            .add_header(name, value)
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_error() {
        let mut mock_repo = MockDocumentRepository::new();
        mock_repo
            .expect_find()
            .returning(|_, _| Err(DocumentRepositoryError::DynamoDb("timeout".to_string())));
        let server = test_server(mock_repo);

        let response = server.get("/services").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({"message": "internal server error"}));
    }
}
