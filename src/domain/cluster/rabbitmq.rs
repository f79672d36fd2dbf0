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

//! RabbitmqCluster custom resource
//!
//! The declarative description of a RabbitMQ cluster. Instances are read
//! by the operator and turned into a server StatefulSet.

use crate::infrastructure::constants::DEFAULT_REPLICAS;
use crate::shared::error::{KubeError, Result};
use k8s_openapi::api::core::v1::{Affinity, ResourceRequirements, Toleration};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(CustomResource, Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "rabbitmq.pivotal.io",
    version = "v1beta1",
    kind = "RabbitmqCluster",
    plural = "rabbitmqclusters",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct RabbitmqClusterSpec {
    /// Number of RabbitMQ nodes.
    #[serde(default = "default_replicas")]
    pub replicas: i32,

    /// Server image. Empty means the operator default.
    #[serde(default)]
    pub image: String,

    /// Name of a secret used to pull `image`. Empty means none.
    #[serde(default)]
    pub image_pull_secret: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,

    #[serde(default)]
    pub persistence: RabbitmqClusterPersistenceSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<Affinity>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tolerations: Vec<Toleration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RabbitmqClusterPersistenceSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<Quantity>,
}

fn default_replicas() -> i32 {
    DEFAULT_REPLICAS
}

impl Default for RabbitmqClusterSpec {
    fn default() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            image: String::new(),
            image_pull_secret: String::new(),
            resources: None,
            persistence: RabbitmqClusterPersistenceSpec::default(),
            affinity: None,
            tolerations: Vec::new(),
        }
    }
}

impl RabbitmqCluster {
    /// Instance name, required for every derived resource name.
    pub fn instance_name(&self) -> Result<&str> {
        self.metadata
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                KubeError::InvalidResource("RabbitmqCluster is missing metadata.name".to_string())
            })
    }

    pub fn instance_namespace(&self) -> Option<&str> {
        self.metadata.namespace.as_deref()
    }

    pub fn user_labels(&self) -> Option<&BTreeMap<String, String>> {
        self.metadata.labels.as_ref()
    }

    pub fn user_annotations(&self) -> Option<&BTreeMap<String, String>> {
        self.metadata.annotations.as_ref()
    }
}

/// Deserialize a RabbitmqCluster manifest.
pub fn load_cluster_from_yaml(content: &str) -> Result<RabbitmqCluster> {
    let cluster: RabbitmqCluster = serde_yaml::from_str(content)?;
    cluster.instance_name()?;
    Ok(cluster)
}
