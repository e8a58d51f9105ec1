// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod alerts;
pub mod buckets;
pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod errors;
pub mod feed;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod rollup;
pub mod sources;
pub mod utils;
