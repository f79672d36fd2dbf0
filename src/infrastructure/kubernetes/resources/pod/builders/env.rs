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

//! Environment variable builder for the RabbitMQ server container
//!
//! The variables form a chain: file locations first, then the pod's own
//! name and namespace from the downward API, then names composed from
//! those through `$(VAR)` expansion. Later entries may only reference
//! earlier ones, so the order is fixed.

use crate::infrastructure::constants::{
    DEFAULT_PASS_FILE, DEFAULT_USER_FILE, ENABLED_PLUGINS_FILE, MNESIA_BASE,
};
use crate::infrastructure::kubernetes::resources::naming::ChildResource;
use k8s_openapi::api::core::v1::{EnvVar, EnvVarSource, ObjectFieldSelector};

pub const ENV_POD_NAME: &str = "MY_POD_NAME";
pub const ENV_POD_NAMESPACE: &str = "MY_POD_NAMESPACE";
pub const ENV_SERVICE_NAME: &str = "K8S_SERVICE_NAME";

pub struct EnvironmentBuilder {
    instance_name: String,
    cluster_domain: String,
}

impl EnvironmentBuilder {
    pub fn new(instance_name: impl Into<String>, cluster_domain: impl Into<String>) -> Self {
        Self {
            instance_name: instance_name.into(),
            cluster_domain: cluster_domain.into(),
        }
    }

    pub fn build(self) -> Vec<EnvVar> {
        let mut env_vars = Vec::new();
        env_vars.extend(self.build_file_env_vars());
        env_vars.extend(self.build_k8s_env_vars());
        env_vars.extend(self.build_node_name_env_vars());
        env_vars
    }

    fn build_file_env_vars(&self) -> Vec<EnvVar> {
        vec![
            value_env("RABBITMQ_ENABLED_PLUGINS_FILE", ENABLED_PLUGINS_FILE),
            value_env("RABBITMQ_DEFAULT_PASS_FILE", DEFAULT_PASS_FILE),
            value_env("RABBITMQ_DEFAULT_USER_FILE", DEFAULT_USER_FILE),
            value_env("RABBITMQ_MNESIA_BASE", MNESIA_BASE),
        ]
    }

    fn build_k8s_env_vars(&self) -> Vec<EnvVar> {
        vec![
            field_ref_env(ENV_POD_NAME, "metadata.name"),
            field_ref_env(ENV_POD_NAMESPACE, "metadata.namespace"),
        ]
    }

    fn build_node_name_env_vars(&self) -> Vec<EnvVar> {
        // Format: .{service}.{namespace}.svc.{cluster-domain}
        let hostname_suffix = format!(
            ".$({}).$({}).svc.{}",
            ENV_SERVICE_NAME, ENV_POD_NAMESPACE, self.cluster_domain
        );

        vec![
            value_env(
                ENV_SERVICE_NAME,
                &ChildResource::Headless.name_for(&self.instance_name),
            ),
            value_env("RABBITMQ_USE_LONGNAME", "true"),
            value_env(
                "RABBITMQ_NODENAME",
                &format!("rabbit@$({}){}", ENV_POD_NAME, hostname_suffix),
            ),
            value_env("K8S_HOSTNAME_SUFFIX", &hostname_suffix),
        ]
    }
}

fn value_env(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value.to_string()),
        ..Default::default()
    }
}

fn field_ref_env(name: &str, field_path: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value_from: Some(EnvVarSource {
            field_ref: Some(ObjectFieldSelector {
                api_version: Some("v1".to_string()),
                field_path: field_path.to_string(),
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}
