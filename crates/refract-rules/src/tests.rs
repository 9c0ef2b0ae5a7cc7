//! Tests for refract-rules.

mod behaviour;
