//! Property-based tests for arbitration invariants
