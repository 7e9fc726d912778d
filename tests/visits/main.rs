//! Integration tests for visit recording and reporting.

mod reporting;
mod concurrency;
