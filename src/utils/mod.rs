// Utility modules for the phishing scanner

pub mod domain_parts;
pub mod scan_errors;
pub mod url_validator;

pub use domain_parts::{DomainDecomposer, DomainParts};
pub use scan_errors::{DomainListError, ScanError, WatcherError};
pub use url_validator::{CandidateUrl, UrlValidator, ValidationError};
