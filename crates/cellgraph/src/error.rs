//! Service error types

use cellgraph_formula::GraphError;
use thiserror::Error;

/// Result type for service operations
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Errors reported to callers of [`DependencyService`](crate::DependencyService)
///
/// None of these are fatal: each is reported for the request that caused it.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Build requested without a workbook
    #[error("No workbook provided")]
    NoWorkbookProvided,

    /// Query issued before any graph was built
    #[error("No graph generated yet")]
    NoGraphAvailable,

    /// Queried identifier is not a node of the live graph
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// File extension not handled by any reader
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// XLSX reader failure
    #[cfg(feature = "xlsx")]
    #[error("Failed to read workbook: {0}")]
    Xlsx(#[from] cellgraph_xlsx::XlsxError),

    /// CSV reader failure
    #[cfg(feature = "csv")]
    #[error("Failed to read workbook: {0}")]
    Csv(#[from] cellgraph_csv::CsvError),
}

impl ServiceError {
    /// Stable condition code for transport layers
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NoWorkbookProvided => "no_workbook",
            ServiceError::NoGraphAvailable => "no_graph",
            ServiceError::NodeNotFound(_) => "node_not_found",
            ServiceError::UnsupportedFormat(_) => "unsupported_format",
            #[cfg(feature = "xlsx")]
            ServiceError::Xlsx(_) => "read_failed",
            #[cfg(feature = "csv")]
            ServiceError::Csv(_) => "read_failed",
        }
    }

    /// Whether the caller's input caused the error
    ///
    /// Only I/O failures while reading a workbook are not the caller's fault.
    pub fn is_client_error(&self) -> bool {
        match self {
            #[cfg(feature = "xlsx")]
            ServiceError::Xlsx(cellgraph_xlsx::XlsxError::Io(_)) => false,
            #[cfg(feature = "csv")]
            ServiceError::Csv(cellgraph_csv::CsvError::Io(_)) => false,
            _ => true,
        }
    }
}

impl From<GraphError> for ServiceError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::NodeNotFound(id) => ServiceError::NodeNotFound(id),
        }
    }
}
