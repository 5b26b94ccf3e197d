use crate::settings::ServiceSettings;
use crate::validate::normalize_url;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tinylink_core::{
    Clock, Repository, ShortCode, ShortLink, Shortener, ShortenerError, StorageError,
    SystemClock,
};
use tinylink_generator::{GenerateInput, Generator};
use tracing::{debug, error, info, instrument, trace, warn};

type Result<T> = std::result::Result<T, ShortenerError>;

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Generator` to handle:
/// - URL validation before any store access
/// - Candidate generation and create-if-absent persistence
/// - Bounded collision retry
/// - Code validation and point lookups on resolve
///
/// The service keeps no state between calls; the repository's atomic
/// insert is the only thing that keeps two concurrent creates from claiming
/// the same code.
#[derive(Debug, Clone)]
pub struct ShortenerService<R, G, C = SystemClock> {
    repository: Arc<R>,
    generator: Arc<G>,
    clock: C,
    settings: ServiceSettings,
}

impl<R: Repository, G: Generator> ShortenerService<R, G, SystemClock> {
    /// Creates a new `ShortenerService` stamping links with the system clock.
    pub fn new(repository: R, generator: G, settings: ServiceSettings) -> Self {
        Self::with_clock(repository, generator, SystemClock, settings)
    }
}

impl<R: Repository, G: Generator, C: Clock> ShortenerService<R, G, C> {
    /// Creates a new `ShortenerService` with a custom clock.
    pub fn with_clock(repository: R, generator: G, clock: C, settings: ServiceSettings) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    fn max_attempts(&self) -> u32 {
        self.settings.max_attempts.max(1)
    }

    /// Bounds a store call by the configured timeout.
    ///
    /// An elapsed timeout says nothing about whether the call took effect.
    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = std::result::Result<T, StorageError>>,
    ) -> std::result::Result<T, StorageError> {
        match tokio::time::timeout(self.settings.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StorageError::Timeout(format!(
                "{} did not complete within {:?}",
                operation, self.settings.store_timeout
            ))),
        }
    }
}

#[async_trait]
impl<R: Repository, G: Generator, C: Clock> Shortener for ShortenerService<R, G, C> {
    #[instrument(level = "debug", skip_all, fields(url_len = url.len()))]
    async fn create(&self, url: &str) -> Result<ShortCode> {
        let target = normalize_url(url, self.settings.max_url_length)?;

        let created_at = self.clock.now();
        let input = GenerateInput::new(&target, created_at);
        let max_attempts = self.max_attempts();

        for attempt in 0..max_attempts {
            let code = self.generator.generate(&input, attempt);
            let link = ShortLink {
                id: code.clone(),
                target: target.clone(),
                created_at,
            };

            match self.bounded("insert", self.repository.insert(link)).await {
                Ok(()) => {
                    info!(code = %code, attempt, "short link created");
                    return Ok(code);
                }
                Err(StorageError::Conflict(_)) => {
                    debug!(code = %code, attempt, "short code collision, retrying");
                }
                Err(err) => {
                    error!(code = %code, attempt, error = %err, "failed to store short link");
                    return Err(err.into());
                }
            }
        }

        warn!(
            attempts = max_attempts,
            "every candidate short code was taken; the code space or attempt budget is too small"
        );
        Err(ShortenerError::Exhausted {
            attempts: max_attempts,
        })
    }

    #[instrument(level = "debug", skip(self))]
    async fn resolve(&self, code: &str) -> Result<String> {
        let code = self.settings.code_format.parse(code)?;

        match self.bounded("get", self.repository.get(&code)).await {
            Ok(Some(link)) => {
                debug!(code = %code, target = %link.target, "resolved short code");
                Ok(link.target)
            }
            Ok(None) => {
                trace!(code = %code, "short code not found");
                Err(ShortenerError::NotFound(code.to_string()))
            }
            Err(err) => {
                error!(code = %code, error = %err, "failed to look up short code");
                Err(err.into())
            }
        }
    }
}
