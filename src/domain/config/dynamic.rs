// Copyright 2025 JiangLong.
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

use crate::domain::config::kubernetes::ResourceConfig;
use crate::shared::error::KubeError;
use std::collections::HashMap;

pub const KEY_CLUSTER_DOMAIN: &str = "rabbitmq.cluster.domain";
pub const KEY_IMAGE: &str = "rabbitmq.image";
pub const KEY_STORAGE_SIZE: &str = "rabbitmq.persistence.storage";

/// Apply string-keyed overrides, then validate the result.
///
/// Unknown keys are ignored. On error `config` may hold some of the
/// overrides already.
pub fn apply_to_resource_config(
    configs: &HashMap<String, String>,
    config: &mut ResourceConfig,
) -> Result<(), KubeError> {
    if let Some(domain) = configs.get(KEY_CLUSTER_DOMAIN) {
        config.cluster_domain = domain.trim().to_string();
    }

    if let Some(image) = configs.get(KEY_IMAGE) {
        config.default_image = image.trim().to_string();
    }

    if let Some(size) = configs.get(KEY_STORAGE_SIZE) {
        config.default_storage_size = size.trim().to_string();
    }

    for key in configs.keys() {
        if ![KEY_CLUSTER_DOMAIN, KEY_IMAGE, KEY_STORAGE_SIZE].contains(&key.as_str()) {
            tracing::debug!(key = %key, "Ignoring unknown configuration override");
        }
    }

    config.validate()
}
