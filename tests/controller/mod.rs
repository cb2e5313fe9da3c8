//! Tests for HTTP controller endpoints.
//!
//! Handlers are called directly with extracted arguments, the way axum would call them, and
//! their responses checked for status and body.

mod admin;
mod checkin;

use kidcheck_test_utils::prelude::*;

use crate::util::{body_json, TestContextExt};
