pub mod extract_request;
pub mod extract_response;

pub use extract_request::{ExtractRequest, ReconcileRequest};
pub use extract_response::{ExtractResponse, ReconcileResponse};
