//! Generation request types and the generator seam
//!
//! Handlers depend on [`MeshGenerator`] rather than a concrete client, so the
//! HTTP layer can be exercised without a network (the production wiring uses
//! [`crate::FalClient`]).

use crate::error::GeneratorResult;
use async_trait::async_trait;
use serde_json::Value;

/// One generation submission: the image embedded as a base64 data URL plus
/// the caller's background-removal choice. Everything else about the model
/// invocation is fixed.
#[derive(Debug, Clone)]
pub struct GenerateParams {
    pub image_data_url: String,
    pub remove_background: bool,
}

/// Turns an image into a 3D mesh via some external inference service.
///
/// The returned JSON is relayed to the HTTP caller verbatim; callers expect
/// at least a `data.model_mesh.url` path to be present on success.
#[async_trait]
pub trait MeshGenerator: Send + Sync {
    async fn generate(&self, params: &GenerateParams) -> GeneratorResult<Value>;
}
