//! Property tests over randomly configured bindings.
