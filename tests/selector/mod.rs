//! Embedded selector expansion during construction.
