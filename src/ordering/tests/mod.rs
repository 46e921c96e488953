//! Unit tests for order keys and WBS codes.
