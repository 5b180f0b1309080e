//! HTTP protocol layer module
//!
//! Response builders and form body decoding, decoupled from the squirrel
//! resource itself.

pub mod form;
pub mod response;

pub use form::SquirrelForm;
pub use response::{
    build_404_response, build_413_response, build_empty_response, build_error_response,
    build_json_response,
};
