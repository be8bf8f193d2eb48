// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Logger set-up.

use env_logger::{Builder, Env};

/// Installs `env_logger` as the `log` backend.
///
/// `RUST_LOG` wins over `default_filter`. Calling this more than once is
/// harmless; later calls leave the first logger in place.
pub fn init(default_filter: &str) {
    let result = Builder::from_env(Env::default().default_filter_or(default_filter)).try_init();
    if result.is_err() {
        log::debug!("logging: a logger is already installed");
    }
}
