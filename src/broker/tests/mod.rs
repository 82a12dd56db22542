//! Service orchestration tests for the broker.

mod support;
