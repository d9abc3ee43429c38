pub mod config;
pub mod ctx;
pub mod emit;
pub mod ops;

use std::marker::PhantomData;
use std::time::Instant;

use ctx::LogCtx;

pub fn extract() -> LogCtx<ops::extract::Extract> { LogCtx { json: config::logs_are_json(), started: Instant::now(), _marker: PhantomData } }
pub fn sites() -> LogCtx<ops::sites::Sites> { LogCtx { json: config::logs_are_json(), started: Instant::now(), _marker: PhantomData } }
