//! Client-side helpers
//!
//! The work a front end does before and after calling the API: converting
//! form input, running the fee pre-check so a bad request is never sent,
//! filtering the listed students and labelling their balance.

mod form;
mod view;

pub use form::{prepare_student, ClientError, FEES_PRECHECK_MESSAGE};
pub use view::{balance_label, filter_students};
