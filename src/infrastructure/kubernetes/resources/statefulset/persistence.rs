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
use crate::domain::cluster::RabbitmqCluster;
use crate::domain::config::ResourceConfig;
use crate::infrastructure::constants::{DEFAULT_ACCESS_MODE, VOLUME_NAME_PERSISTENCE};
use crate::infrastructure::kubernetes::resources::metadata::owner_reference;
use crate::infrastructure::kubernetes::resources::pod::builders::LabeledResourceBuilder;
use crate::shared::error::{KubeError, Result};
use k8s_openapi::api::core::v1::{
    PersistentVolumeClaim, PersistentVolumeClaimSpec, VolumeResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// Builds the single `persistence` claim template of the server StatefulSet.
pub struct PersistenceClaimBuilder<'a> {
    cluster: &'a RabbitmqCluster,
    config: &'a ResourceConfig,
    instance_name: &'a str,
}

impl LabeledResourceBuilder for PersistenceClaimBuilder<'_> {
    fn instance_name(&self) -> &str {
        self.instance_name
    }
}

impl<'a> PersistenceClaimBuilder<'a> {
    pub fn new(
        cluster: &'a RabbitmqCluster,
        config: &'a ResourceConfig,
        instance_name: &'a str,
    ) -> Self {
        Self {
            cluster,
            config,
            instance_name,
        }
    }

    pub fn build(&self) -> Result<PersistentVolumeClaim> {
        let persistence = &self.cluster.spec.persistence;

        let storage_size = persistence
            .storage
            .as_ref()
            .map(|q| q.0.as_str())
            .unwrap_or(self.config.default_storage_size.as_str());

        let storage = parse_quantity(storage_size).map_err(|e| {
            KubeError::validation_error(format!(
                "Invalid persistence.storage for RabbitmqCluster '{}': {}",
                self.instance_name, e
            ))
        })?;

        let mut requests = BTreeMap::new();
        requests.insert("storage".to_string(), storage);

        Ok(PersistentVolumeClaim {
            metadata: ObjectMeta {
                name: Some(VOLUME_NAME_PERSISTENCE.to_string()),
                namespace: self.cluster.instance_namespace().map(str::to_string),
                labels: Some(self.get_labels()),
                annotations: Some(BTreeMap::new()),
                owner_references: Some(vec![owner_reference(self.cluster, self.instance_name)]),
                ..Default::default()
            },
            spec: Some(PersistentVolumeClaimSpec {
                access_modes: Some(vec![DEFAULT_ACCESS_MODE.to_string()]),
                storage_class_name: persistence.storage_class_name.clone(),
                resources: Some(VolumeResourceRequirements {
                    requests: Some(requests),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            status: None,
        })
    }
}
