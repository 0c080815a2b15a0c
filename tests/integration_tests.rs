//! Integration tests for the canopy store and CLI

mod integration;
