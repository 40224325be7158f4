//! Background Tasks Module
//!
//! Contains tasks that run alongside the gateway.
//!
//! # Tasks
//! - Cache warmup: one best-effort pass that pre-populates the cache at startup

mod warmup;

pub use warmup::{
    run_batched, run_warmup, spawn_warmup_task, WarmupOptions, WarmupReport,
};
