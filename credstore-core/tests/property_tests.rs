//! Property tests for `credstore` core library

#![allow(clippy::redundant_clone)]
#![allow(clippy::similar_names)]

mod properties;
