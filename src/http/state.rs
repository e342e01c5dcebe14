use std::collections::HashMap;

use crate::error::SqlGatewayError;
use crate::executor::Gateway;
use crate::results::ProjectedRecord;
use crate::statement::{Fields, Operation};

use super::error::ApiError;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub gateway: Gateway,
    /// Include driver error text in error bodies.
    pub verbose_errors: bool,
}

impl AppState {
    #[must_use]
    pub fn new(gateway: Gateway, verbose_errors: bool) -> Self {
        Self {
            gateway,
            verbose_errors,
        }
    }

    /// Build, run and project a read.
    pub async fn read(
        &self,
        operation: Operation,
        query: HashMap<String, String>,
    ) -> Result<Vec<ProjectedRecord>, ApiError> {
        self.read_fields(operation, &Fields::from(query)).await
    }

    pub async fn read_fields(
        &self,
        operation: Operation,
        fields: &Fields,
    ) -> Result<Vec<ProjectedRecord>, ApiError> {
        let result: Result<_, SqlGatewayError> = async {
            let stmt = operation.build(fields)?;
            self.gateway.fetch(&stmt).await?.into_records()
        }
        .await;
        result.map_err(|e| self.reject(e))
    }

    /// Build and run a write; returns rows affected.
    pub async fn write(
        &self,
        operation: Operation,
        query: HashMap<String, String>,
    ) -> Result<usize, ApiError> {
        let result: Result<_, SqlGatewayError> = async {
            let stmt = operation.build(&Fields::from(query))?;
            self.gateway.apply(&stmt).await
        }
        .await;
        result.map_err(|e| self.reject(e))
    }

    pub(crate) fn reject(&self, err: SqlGatewayError) -> ApiError {
        ApiError::from_gateway(err, self.verbose_errors)
    }
}
