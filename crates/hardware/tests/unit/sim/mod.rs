//! # Simulation Driver Tests
//!
//! Drives whole traces through `Simulator`, on one thread and through the
//! reader/walker pipeline.
