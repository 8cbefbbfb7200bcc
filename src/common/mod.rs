pub mod response;

pub use response::{ErrorCode, ErrorItem, ErrorReply, ErrorResponse, FieldErrorItem};
