// Form handling: flat key/value decoding into `Resume`, plus the request
// extractor that accepts multipart and url-encoded bodies.

pub mod decoder;
pub mod extract;

pub use decoder::{decode_resume, FormFields};
pub use extract::{SubmittedForm, UploadedFile};
