//! Shared test helpers.

#![allow(dead_code)]

pub mod glossary_assertions;
pub mod glossary_fixtures;
