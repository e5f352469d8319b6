//! Referential check tests.
