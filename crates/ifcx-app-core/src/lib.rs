// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for IFCX tools (config, prefs, status lines).
//! Keeps CLI and UI adapters thin and framework-agnostic.

pub mod config;
pub mod prefs;
pub mod status;
