//! Tests for administrative endpoints.


use super::*;
