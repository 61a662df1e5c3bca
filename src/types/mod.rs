pub mod api_error;
pub mod outcome;
pub mod partition;
pub mod record;
