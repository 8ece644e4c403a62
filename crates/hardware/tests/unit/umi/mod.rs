//! UMI protocol tests.
