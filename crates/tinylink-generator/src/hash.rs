use crate::encode::encode;
use crate::{GenerateInput, Generator};
use tinylink_core::{CodeFormat, ShortCode};
use typed_builder::TypedBuilder;

/// A generator that derives candidates from a blake3 digest.
///
/// The digest covers the namespace, the URL, the creation instant and the
/// attempt number, each length- or width-delimited. The first 128 bits of the
/// digest are then encoded into the configured [`CodeFormat`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct HashGenerator {
    #[builder(default)]
    format: CodeFormat,
    /// Per-deployment salt. Two deployments with different namespaces issue
    /// unrelated code sequences for identical inputs.
    #[builder(default, setter(into))]
    namespace: String,
}

impl HashGenerator {
    pub fn new(format: CodeFormat) -> Self {
        Self::builder().format(format).build()
    }

    pub fn format(&self) -> &CodeFormat {
        &self.format
    }

    fn digest(&self, input: &GenerateInput<'_>, attempt: u32) -> u128 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.namespace.len() as u64).to_be_bytes());
        hasher.update(self.namespace.as_bytes());
        hasher.update(&(input.url.len() as u64).to_be_bytes());
        hasher.update(input.url.as_bytes());
        hasher.update(&input.created_at.as_nanosecond().to_be_bytes());
        hasher.update(&attempt.to_be_bytes());

        let digest = hasher.finalize();
        let mut head = [0u8; 16];
        head.copy_from_slice(&digest.as_bytes()[..16]);
        u128::from_be_bytes(head)
    }
}

impl Default for HashGenerator {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Generator for HashGenerator {
    fn generate(&self, input: &GenerateInput<'_>, attempt: u32) -> ShortCode {
        ShortCode::new_unchecked(encode(self.digest(input, attempt), &self.format))
    }
}
