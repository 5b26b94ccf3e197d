use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use jiff::Timestamp;
use std::collections::HashMap;
use tinylink_core::error::{Result, StorageError};
use tinylink_core::{ReadRepository, Repository, ShortCode, ShortLink};
use tracing::trace;

/// Partition key attribute.
pub const ATTR_ID: &str = "shortUrlId";
pub const ATTR_TARGET: &str = "originalUrl";
pub const ATTR_CREATED_AT: &str = "createdAt";

const THROTTLING_CODES: &[&str] = &[
    "ProvisionedThroughputExceededException",
    "RequestLimitExceeded",
    "ThrottlingException",
];

const UNAVAILABLE_CODES: &[&str] = &["InternalServerError", "ServiceUnavailable"];

/// DynamoDB repository configuration.
#[derive(Debug, Clone)]
pub struct DynamoDbConfig {
    /// Table name or table ARN.
    pub table_name: String,
    /// AWS region (optional, uses SDK default if not specified)
    pub region: Option<String>,
    /// Optional endpoint override (e.g. DynamoDB Local)
    pub endpoint: Option<String>,
}

/// DynamoDB implementation of the repository contract.
///
/// Inserts are a `PutItem` guarded by `attribute_not_exists` on the partition
/// key, so DynamoDB itself performs the atomic check-and-set. Reads are
/// strongly consistent `GetItem` calls.
#[derive(Clone)]
pub struct DynamoDbRepository {
    client: Client,
    table_name: String,
}

impl std::fmt::Debug for DynamoDbRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoDbRepository")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl DynamoDbRepository {
    /// Loads the default AWS configuration chain and builds a client from it.
    pub async fn connect(config: DynamoDbConfig) -> Self {
        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::from_sdk_config(&sdk_config, config)
    }

    /// Builds a client inheriting `sdk_config`, with the region and endpoint
    /// overrides from `config` applied.
    pub fn from_sdk_config(sdk_config: &SdkConfig, config: DynamoDbConfig) -> Self {
        let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);

        if let Some(region) = config.region {
            builder = builder.region(Region::new(region));
        }

        if let Some(endpoint) = config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        Self::from_client(Client::from_conf(builder.build()), config.table_name)
    }

    /// Create from a pre-built client (for testing)
    pub fn from_client(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Returns a reference to the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

fn link_to_item(link: ShortLink) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (ATTR_ID.to_string(), AttributeValue::S(link.id.to_string())),
        (ATTR_TARGET.to_string(), AttributeValue::S(link.target)),
        (
            ATTR_CREATED_AT.to_string(),
            AttributeValue::S(link.created_at.to_string()),
        ),
    ])
}

fn string_attr<'a>(item: &'a HashMap<String, AttributeValue>, name: &str) -> Result<&'a String> {
    item.get(name)
        .and_then(|value| value.as_s().ok())
        .ok_or_else(|| StorageError::InvalidData(format!("item has no string attribute '{name}'")))
}

fn item_to_link(item: &HashMap<String, AttributeValue>) -> Result<ShortLink> {
    let id = string_attr(item, ATTR_ID)?;
    let target = string_attr(item, ATTR_TARGET)?;
    let created_at_raw = string_attr(item, ATTR_CREATED_AT)?;
    let created_at = created_at_raw.parse::<Timestamp>().map_err(|e| {
        StorageError::InvalidData(format!(
            "invalid {ATTR_CREATED_AT} timestamp '{}': {e}",
            created_at_raw
        ))
    })?;

    Ok(ShortLink {
        id: ShortCode::new_unchecked(id.clone()),
        target: target.clone(),
        created_at,
    })
}

/// Check if a PutItem error is a conditional check failure
fn is_conditional_check_failed<R>(err: &SdkError<PutItemError, R>) -> bool {
    match err {
        SdkError::ServiceError(service_err) => {
            matches!(
                service_err.err(),
                PutItemError::ConditionalCheckFailedException(_)
            )
        }
        _ => false,
    }
}

fn map_sdk_error<E, R>(err: SdkError<E, R>) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();

    if let Some(code) = err.code() {
        if THROTTLING_CODES.contains(&code) {
            return StorageError::Throttled(message);
        }
        if UNAVAILABLE_CODES.contains(&code) {
            return StorageError::Unavailable(message);
        }
    }

    match err {
        SdkError::TimeoutError(_) => StorageError::Timeout(message),
        SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            StorageError::Unavailable(message)
        }
        SdkError::ConstructionFailure(_) => StorageError::Operation(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for DynamoDbRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortLink>> {
        trace!(code = %code, table = %self.table_name, "dynamodb get_item");

        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ATTR_ID, AttributeValue::S(code.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(map_sdk_error)?;

        output.item().map(item_to_link).transpose()
    }
}

#[async_trait]
impl Repository for DynamoDbRepository {
    async fn insert(&self, link: ShortLink) -> Result<()> {
        let code = link.id.clone();
        trace!(code = %code, table = %self.table_name, "dynamodb conditional put_item");

        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(link_to_item(link)))
            .condition_expression("attribute_not_exists(#id)")
            .expression_attribute_names("#id", ATTR_ID)
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_conditional_check_failed(&err) => {
                Err(StorageError::Conflict(code.to_string()))
            }
            Err(err) => Err(map_sdk_error(err)),
        }
    }
}
