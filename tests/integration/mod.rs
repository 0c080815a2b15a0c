//! Integration tests for the file manager store and its command-line front end

mod cli_contracts;
mod store_flows;
mod support;
