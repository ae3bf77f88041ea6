pub mod credential_filter;
pub mod db_utils;
pub mod debounce;
