//! Tests for the session controller

mod reducer_tests;
