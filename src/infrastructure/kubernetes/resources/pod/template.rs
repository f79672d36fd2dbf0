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

use crate::domain::cluster::RabbitmqCluster;
use crate::domain::config::ResourceConfig;
use crate::infrastructure::constants::*;
use crate::infrastructure::kubernetes::resources::metadata::{
    reconcile_annotations, reconcile_labels,
};
use crate::infrastructure::kubernetes::resources::naming::ChildResource;
use crate::infrastructure::kubernetes::resources::pod::builders::{
    EnvironmentBuilder, LabeledResourceBuilder, PodBuilder, ProbeBuilder,
};
use k8s_openapi::api::core::v1::{
    ConfigMapVolumeSource, Container, ContainerPort, EmptyDirVolumeSource, KeyToPath,
    LocalObjectReference, PodSecurityContext, PodSpec, PodTemplateSpec, ResourceRequirements,
    SecretVolumeSource, Toleration, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

const SERVER_PORTS: &[(&str, i32)] = &[
    (PORT_NAME_EPMD, EPMD_PORT),
    (PORT_NAME_AMQP, AMQP_PORT),
    (PORT_NAME_MANAGEMENT, MANAGEMENT_PORT),
    (PORT_NAME_PROMETHEUS, PROMETHEUS_PORT),
];

/// Stages rabbitmq.conf and the erlang cookie into writable locations.
const COPY_CONFIG_COMMAND: &str = "cp /tmp/rabbitmq/rabbitmq.conf /etc/rabbitmq/rabbitmq.conf \
&& echo '' >> /etc/rabbitmq/rabbitmq.conf ; \
cp /tmp/erlang-cookie-secret/.erlang.cookie /var/lib/rabbitmq/.erlang.cookie \
&& chown 999:999 /var/lib/rabbitmq/.erlang.cookie \
&& chmod 600 /var/lib/rabbitmq/.erlang.cookie";

/// Composes the pod template of the server StatefulSet.
pub struct PodTemplateBuilder<'a> {
    cluster: &'a RabbitmqCluster,
    config: &'a ResourceConfig,
    instance_name: &'a str,
}

impl LabeledResourceBuilder for PodTemplateBuilder<'_> {
    fn instance_name(&self) -> &str {
        self.instance_name
    }
}

impl PodBuilder for PodTemplateBuilder<'_> {
    fn main_container_name(&self) -> &'static str {
        CONTAINER_NAME_SERVER
    }

    fn init_container_name(&self) -> &'static str {
        CONTAINER_NAME_INIT
    }

    fn build_main_container(&self) -> Container {
        let ports = SERVER_PORTS
            .iter()
            .map(|(name, port)| ContainerPort {
                container_port: *port,
                name: Some(name.to_string()),
                ..Default::default()
            })
            .collect();

        Container {
            name: CONTAINER_NAME_SERVER.to_string(),
            image: Some(self.image()),
            env: Some(
                EnvironmentBuilder::new(self.instance_name, &self.config.cluster_domain).build(),
            ),
            ports: Some(ports),
            volume_mounts: Some(self.build_volume_mounts()),
            readiness_probe: Some(ProbeBuilder::build_default_readiness()),
            resources: self.server_resources(),
            ..Default::default()
        }
    }

    fn build_init_container(&self) -> Container {
        let init_resources: BTreeMap<String, Quantity> = [
            ("cpu".to_string(), Quantity(INIT_CONTAINER_CPU.to_string())),
            ("memory".to_string(), Quantity(INIT_CONTAINER_MEMORY.to_string())),
        ]
        .into_iter()
        .collect();

        Container {
            name: CONTAINER_NAME_INIT.to_string(),
            image: Some(self.image()),
            command: Some(vec![
                "sh".to_string(),
                "-c".to_string(),
                COPY_CONFIG_COMMAND.to_string(),
            ]),
            resources: Some(ResourceRequirements {
                requests: Some(init_resources.clone()),
                limits: Some(init_resources),
                ..Default::default()
            }),
            volume_mounts: Some(self.build_init_volume_mounts()),
            ..Default::default()
        }
    }

    fn build_volumes(&self) -> Vec<Volume> {
        vec![
            Volume {
                name: VOLUME_NAME_ADMIN.to_string(),
                secret: Some(SecretVolumeSource {
                    secret_name: Some(ChildResource::Admin.name_for(self.instance_name)),
                    items: Some(vec![
                        KeyToPath {
                            key: ADMIN_SECRET_USERNAME_KEY.to_string(),
                            path: ADMIN_SECRET_USERNAME_KEY.to_string(),
                            mode: None,
                        },
                        KeyToPath {
                            key: ADMIN_SECRET_PASSWORD_KEY.to_string(),
                            path: ADMIN_SECRET_PASSWORD_KEY.to_string(),
                            mode: None,
                        },
                    ]),
                    ..Default::default()
                }),
                ..Default::default()
            },
            Volume {
                name: VOLUME_NAME_SERVER_CONF.to_string(),
                config_map: Some(ConfigMapVolumeSource {
                    name: ChildResource::ServerConf.name_for(self.instance_name),
                    ..Default::default()
                }),
                ..Default::default()
            },
            Volume {
                name: VOLUME_NAME_ETC.to_string(),
                empty_dir: Some(EmptyDirVolumeSource::default()),
                ..Default::default()
            },
            Volume {
                name: VOLUME_NAME_ERLANG_COOKIE.to_string(),
                empty_dir: Some(EmptyDirVolumeSource::default()),
                ..Default::default()
            },
            Volume {
                name: VOLUME_NAME_ERLANG_COOKIE_SECRET.to_string(),
                secret: Some(SecretVolumeSource {
                    secret_name: Some(ChildResource::ErlangCookie.name_for(self.instance_name)),
                    ..Default::default()
                }),
                ..Default::default()
            },
        ]
    }

    fn build_volume_mounts(&self) -> Vec<VolumeMount> {
        vec![
            mount(VOLUME_NAME_SERVER_CONF, MOUNT_PATH_SERVER_CONF),
            mount(VOLUME_NAME_ADMIN, MOUNT_PATH_ADMIN),
            mount(VOLUME_NAME_PERSISTENCE, MOUNT_PATH_PERSISTENCE),
            mount(VOLUME_NAME_ETC, MOUNT_PATH_ETC),
            mount(VOLUME_NAME_ERLANG_COOKIE, MOUNT_PATH_ERLANG_COOKIE),
        ]
    }

    fn build_init_volume_mounts(&self) -> Vec<VolumeMount> {
        vec![
            mount(VOLUME_NAME_SERVER_CONF, MOUNT_PATH_CONF_STAGING),
            mount(VOLUME_NAME_ETC, MOUNT_PATH_ETC),
            mount(VOLUME_NAME_ERLANG_COOKIE, MOUNT_PATH_ERLANG_COOKIE),
            mount(VOLUME_NAME_ERLANG_COOKIE_SECRET, MOUNT_PATH_ERLANG_COOKIE_SECRET),
        ]
    }

    fn build_pod_spec(&self) -> PodSpec {
        PodSpec {
            containers: vec![self.build_main_container()],
            init_containers: Some(vec![self.build_init_container()]),
            volumes: Some(self.build_volumes()),
            security_context: Some(PodSecurityContext {
                fs_group: Some(RABBITMQ_GID),
                run_as_group: Some(RABBITMQ_GID),
                run_as_user: Some(RABBITMQ_UID),
                ..Default::default()
            }),
            service_account_name: Some(ChildResource::Server.name_for(self.instance_name)),
            automount_service_account_token: Some(true),
            affinity: self.cluster.spec.affinity.clone(),
            tolerations: self.tolerations(),
            termination_grace_period_seconds: Some(TERMINATION_GRACE_PERIOD_SECONDS),
            image_pull_secrets: Some(self.image_pull_secrets()),
            ..Default::default()
        }
    }
}

impl<'a> PodTemplateBuilder<'a> {
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

    /// A fresh pod template; annotations start from an empty base.
    pub fn build(&self) -> PodTemplateSpec {
        PodTemplateSpec {
            metadata: Some(ObjectMeta {
                labels: Some(self.build_labels()),
                annotations: Some(self.build_annotations(None)),
                ..Default::default()
            }),
            spec: Some(self.build_pod_spec()),
        }
    }

    pub fn build_labels(&self) -> BTreeMap<String, String> {
        reconcile_labels(self.instance_name, self.cluster.user_labels())
    }

    pub fn build_annotations(
        &self,
        existing: Option<&BTreeMap<String, String>>,
    ) -> BTreeMap<String, String> {
        reconcile_annotations(existing, self.cluster.user_annotations())
    }

    pub fn image(&self) -> String {
        if self.cluster.spec.image.is_empty() {
            self.config.default_image.clone()
        } else {
            self.cluster.spec.image.clone()
        }
    }

    /// Requests and limits exactly as given; no defaults are filled in.
    fn server_resources(&self) -> Option<ResourceRequirements> {
        self.cluster.spec.resources.clone()
    }

    fn tolerations(&self) -> Option<Vec<Toleration>> {
        if self.cluster.spec.tolerations.is_empty() {
            None
        } else {
            Some(self.cluster.spec.tolerations.clone())
        }
    }

    fn image_pull_secrets(&self) -> Vec<LocalObjectReference> {
        if self.cluster.spec.image_pull_secret.is_empty() {
            Vec::new()
        } else {
            vec![LocalObjectReference {
                name: self.cluster.spec.image_pull_secret.clone(),
            }]
        }
    }
}

fn mount(name: &str, path: &str) -> VolumeMount {
    VolumeMount {
        name: name.to_string(),
        mount_path: path.to_string(),
        ..Default::default()
    }
}
