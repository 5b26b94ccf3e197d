use crate::Result;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::ImageExt;
use testcontainers::{ContainerAsync, GenericImage};

const DYNAMODB_LOCAL_PORT: u16 = 8000;

/// Test fixture for a disposable DynamoDB Local instance.
///
/// The instance runs in-memory; tables vanish with the container.
pub struct DynamoDbLocal {
    container: ContainerAsync<GenericImage>,
}

impl DynamoDbLocal {
    /// Starts a DynamoDB Local container.
    pub async fn new() -> Result<Self> {
        let container = GenericImage::new("amazon/dynamodb-local", "2.5.2")
            .with_exposed_port(DYNAMODB_LOCAL_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout(
                "Initializing DynamoDB Local with the following configuration",
            ))
            .with_cmd(["-jar", "DynamoDBLocal.jar", "-inMemory", "-sharedDb"])
            .start()
            .await?;

        Ok(Self { container })
    }

    pub async fn host(&self) -> Result<String> {
        Ok(self.container.get_host().await?.to_string())
    }

    pub async fn port(&self) -> Result<u16> {
        Ok(self
            .container
            .get_host_port_ipv4(DYNAMODB_LOCAL_PORT)
            .await?)
    }

    /// Endpoint URL to hand to an SDK client as an endpoint override.
    pub async fn endpoint_url(&self) -> Result<String> {
        let host = self.host().await?;
        let port = self.port().await?;
        Ok(format!("http://{}:{}", host, port))
    }

    /// Returns the underlying container reference.
    pub fn container(&self) -> &ContainerAsync<GenericImage> {
        &self.container
    }
}
