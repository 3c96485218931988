/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

mod alert;
mod format;

pub use alert::{Alert, AlertStatus};
pub use format::{escape_html, format_message, format_timestamp, TIME_FORMAT};
