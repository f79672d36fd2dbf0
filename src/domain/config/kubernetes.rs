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

use crate::domain::cluster::quantity::parse_quantity;
use crate::infrastructure::constants::{DEFAULT_IMAGE, DEFAULT_STORAGE_SIZE, POD_CLUSTER_DOMAIN};
use crate::shared::error::KubeError;

/// Operator-level settings that are not part of the RabbitmqCluster resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceConfig {
    /// DNS domain appended to pod FQDNs, e.g. `cluster.local`.
    pub cluster_domain: String,
    /// Image used when the cluster spec leaves `image` empty.
    pub default_image: String,
    /// Claim size used when the cluster spec has no `persistence.storage`.
    pub default_storage_size: String,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            cluster_domain: POD_CLUSTER_DOMAIN.to_string(),
            default_image: DEFAULT_IMAGE.to_string(),
            default_storage_size: DEFAULT_STORAGE_SIZE.to_string(),
        }
    }
}

impl ResourceConfig {
    pub fn validate(&self) -> Result<(), KubeError> {
        if !is_valid_dns_domain(&self.cluster_domain) {
            return Err(KubeError::config_error(format!(
                "Invalid cluster_domain: {}",
                self.cluster_domain
            )));
        }

        if self.default_image.trim().is_empty() {
            return Err(KubeError::config_error("default_image must not be empty"));
        }

        parse_quantity(&self.default_storage_size).map_err(|e| {
            KubeError::config_error(format!(
                "Invalid default_storage_size '{}': {}",
                self.default_storage_size, e
            ))
        })?;

        Ok(())
    }
}

pub(crate) fn is_valid_dns_domain(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > 253 {
        return false;
    }

    domain.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && label.chars().next().unwrap_or(' ').is_ascii_alphanumeric()
            && label.chars().last().unwrap_or(' ').is_ascii_alphanumeric()
            && label
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    })
}
