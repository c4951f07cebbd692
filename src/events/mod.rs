// ABOUTME: Live state streaming: per-connection sampling loop feeding the SSE endpoint

pub mod broadcaster;

pub use broadcaster::{
    LiveStateBroadcaster, LiveStateSampler, StateSource, DEFAULT_EVENT_INTERVAL,
    MIN_EVENT_INTERVAL,
};
