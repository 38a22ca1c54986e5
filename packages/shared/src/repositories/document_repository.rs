use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, to_attribute_value, to_item};
use serde_json::Value;

use crate::models::document::{
    new_document_id, Collection, DeleteResult, Document, Filter, InsertOneResult, UpdateResult,
    ID_FIELD,
};
use crate::repositories::errors::document_repository_errors::DocumentRepositoryError;

#[cfg(any(test, feature = "mocks"))]
use mockall::automock;

type Item = HashMap<String, AttributeValue>;

/// Collection-oriented CRUD over flat documents.
#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, DocumentRepositoryError>;
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, DocumentRepositoryError>;
    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertOneResult, DocumentRepositoryError>;
    /// Sets `fields` on the first document matching `filter`. With `upsert`,
    /// a missing document is created from the filter equalities and `fields`.
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        fields: Document,
        upsert: bool,
    ) -> Result<UpdateResult, DocumentRepositoryError>;
    async fn delete_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<DeleteResult, DocumentRepositoryError>;
}

#[derive(Debug, Clone)]
pub struct TableNames {
    pub services: String,
    pub bookings: String,
}

impl Default for TableNames {
    fn default() -> Self {
        TableNames {
            services: Collection::Services.name().to_string(),
            bookings: Collection::Bookings.name().to_string(),
        }
    }
}

/// One DynamoDB table per collection, partitioned on `_id`.
pub struct DynamoDbDocumentRepository {
    pub client: Client,
    pub tables: TableNames,
}

impl DynamoDbDocumentRepository {
    pub fn new(client: Client, tables: TableNames) -> Self {
        Self { client, tables }
    }

    fn table(&self, collection: Collection) -> &str {
        match collection {
            Collection::Services => &self.tables.services,
            Collection::Bookings => &self.tables.bookings,
        }
    }

    /// Checks that every collection table is reachable.
    pub async fn ping(&self) -> Result<(), DocumentRepositoryError> {
        for collection in [Collection::Services, Collection::Bookings] {
            self.client
                .describe_table()
                .table_name(self.table(collection))
                .send()
                .await
                .map_err(dynamo_error)?;
        }
        Ok(())
    }

    async fn scan(
        &self,
        collection: Collection,
        filter: &Filter,
        first_only: bool,
    ) -> Result<Vec<Document>, DocumentRepositoryError> {
        let expression = FilterExpression::from_filter(filter)?;
        let mut documents = Vec::new();
        let mut exclusive_start_key: Option<Item> = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(self.table(collection))
                .set_filter_expression(expression.expression.clone())
                .set_expression_attribute_names(expression.names.clone())
                .set_expression_attribute_values(expression.values.clone())
                .set_exclusive_start_key(exclusive_start_key.take())
                .send()
                .await
                .map_err(dynamo_error)?;

            for item in output.items.unwrap_or_default() {
                documents.push(document_from_item(item)?);
                if first_only {
                    return Ok(documents);
                }
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key),
                _ => break,
            }
        }

        Ok(documents)
    }

    /// Resolves the `_id` of the first document matching `filter`.
    async fn resolve_id(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<String>, DocumentRepositoryError> {
        if let Some(id) = filter.id_lookup() {
            return Ok(Some(id.to_string()));
        }
        let found = self.scan(collection, filter, true).await?;
        Ok(found
            .into_iter()
            .next()
            .and_then(|document| document_id(&document)))
    }
}

#[async_trait]
impl DocumentRepository for DynamoDbDocumentRepository {
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, DocumentRepositoryError> {
        self.scan(collection, filter, false).await
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        let Some(id) = filter.id_lookup() else {
            let found = self.scan(collection, filter, true).await?;
            return Ok(found.into_iter().next());
        };

        let output = self
            .client
            .get_item()
            .table_name(self.table(collection))
            .key(ID_FIELD, AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(dynamo_error)?;

        output.item.map(document_from_item).transpose()
    }

    async fn insert_one(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> Result<InsertOneResult, DocumentRepositoryError> {
        let id = match document_id(&document) {
            Some(id) => id,
            None => {
                let id = new_document_id();
                document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
                id
            }
        };

        let item: Item = to_item(&document)
            .map_err(|e| DocumentRepositoryError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(self.table(collection))
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(#id)")
            .expression_attribute_names("#id", ID_FIELD)
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                if err.is_conditional_check_failed_exception() {
                    DocumentRepositoryError::AlreadyExists
                } else {
                    dynamo_error(err)
                }
            })?;

        Ok(InsertOneResult::new(id))
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        mut fields: Document,
        upsert: bool,
    ) -> Result<UpdateResult, DocumentRepositoryError> {
        fields.remove(ID_FIELD);
        if fields.is_empty() {
            return Err(DocumentRepositoryError::InvalidUpdate(
                "update document is empty".to_string(),
            ));
        }

        let id = match self.resolve_id(collection, filter).await? {
            Some(id) => id,
            None if upsert => {
                for (field, value) in filter.conditions() {
                    if field != ID_FIELD && !fields.contains_key(field) {
                        fields.insert(field.clone(), value.clone());
                    }
                }
                new_document_id()
            }
            None => return Ok(UpdateResult::matched(0, 0)),
        };

        let mut names = HashMap::new();
        let mut values = HashMap::new();
        let mut assignments = Vec::with_capacity(fields.len());
        for (index, (field, value)) in fields.iter().enumerate() {
            names.insert(format!("#s{}", index), field.clone());
            values.insert(
                format!(":s{}", index),
                to_attribute_value(value)
                    .map_err(|e| DocumentRepositoryError::Serialization(e.to_string()))?,
            );
            assignments.push(format!("#s{} = :s{}", index, index));
        }

        let mut request = self
            .client
            .update_item()
            .table_name(self.table(collection))
            .key(ID_FIELD, AttributeValue::S(id.clone()))
            .update_expression(format!("SET {}", assignments.join(", ")))
            .set_expression_attribute_values(Some(values))
            .return_values(ReturnValue::AllOld);

        if !upsert {
            names.insert("#id".to_string(), ID_FIELD.to_string());
            request = request.condition_expression("attribute_exists(#id)");
        }

        let result = request
            .set_expression_attribute_names(Some(names))
            .send()
            .await;

        match result {
            Ok(output) => update_result(output.attributes, &fields, id),
            Err(e) => {
                let err = e.into_service_error();
                if err.is_conditional_check_failed_exception() {
                    Ok(UpdateResult::matched(0, 0))
                } else {
                    Err(dynamo_error(err))
                }
            }
        }
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<DeleteResult, DocumentRepositoryError> {
        let Some(id) = self.resolve_id(collection, filter).await? else {
            return Ok(DeleteResult::new(0));
        };

        let output = self
            .client
            .delete_item()
            .table_name(self.table(collection))
            .key(ID_FIELD, AttributeValue::S(id))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(dynamo_error)?;

        Ok(delete_result(output.attributes))
    }
}

/// Placeholder-based scan filter; DynamoDB rejects empty placeholder maps,
/// so an empty filter leaves every part unset.
#[derive(Debug, Default, PartialEq)]
struct FilterExpression {
    expression: Option<String>,
    names: Option<HashMap<String, String>>,
    values: Option<Item>,
}

impl FilterExpression {
    fn from_filter(filter: &Filter) -> Result<Self, DocumentRepositoryError> {
        if filter.is_empty() {
            return Ok(FilterExpression::default());
        }

        let mut clauses = Vec::with_capacity(filter.conditions().len());
        let mut names = HashMap::new();
        let mut values = HashMap::new();
        for (index, (field, value)) in filter.conditions().iter().enumerate() {
            names.insert(format!("#f{}", index), field.clone());
            values.insert(
                format!(":f{}", index),
                to_attribute_value(value)
                    .map_err(|e| DocumentRepositoryError::Serialization(e.to_string()))?,
            );
            clauses.push(format!("#f{} = :f{}", index, index));
        }

        Ok(FilterExpression {
            expression: Some(clauses.join(" AND ")),
            names: Some(names),
            values: Some(values),
        })
    }
}

/// Derives the update descriptor from the item as it was before the write.
/// No previous item means the write created the document under `id`.
fn update_result(
    previous: Option<Item>,
    fields: &Document,
    id: String,
) -> Result<UpdateResult, DocumentRepositoryError> {
    match previous {
        Some(previous) if !previous.is_empty() => {
            let previous = document_from_item(previous)?;
            let modified = fields
                .iter()
                .any(|(field, value)| previous.get(field) != Some(value));
            Ok(UpdateResult::matched(1, u64::from(modified)))
        }
        _ => Ok(UpdateResult::upserted(id)),
    }
}

fn delete_result(previous: Option<Item>) -> DeleteResult {
    DeleteResult::new(previous.map_or(0, |previous| u64::from(!previous.is_empty())))
}

fn document_id(document: &Document) -> Option<String> {
    document
        .get(ID_FIELD)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn document_from_item(item: Item) -> Result<Document, DocumentRepositoryError> {
    from_item(item).map_err(|e| DocumentRepositoryError::Serialization(e.to_string()))
}

fn dynamo_error<E: std::error::Error>(err: E) -> DocumentRepositoryError {
    DocumentRepositoryError::DynamoDb(DisplayErrorContext(&err).to_string())
}
