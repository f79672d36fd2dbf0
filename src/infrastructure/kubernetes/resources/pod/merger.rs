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

use crate::infrastructure::kubernetes::resources::pod::builders::PodBuilder;
use crate::infrastructure::kubernetes::resources::pod::template::PodTemplateBuilder;
use crate::shared::error::{KubeError, Result};
use k8s_openapi::api::core::v1::{Container, PodSpec, PodTemplateSpec};

/// Apply the desired pod template onto a live one.
///
/// The server and init containers are located by name and replaced in
/// place; any other container is left alone. Labels are replaced,
/// annotations are overlaid. Both containers are looked up before anything
/// is written, so a structural error leaves `existing` untouched.
pub fn merge_pod_template(
    existing: &mut PodTemplateSpec,
    builder: &PodTemplateBuilder<'_>,
    statefulset_name: &str,
) -> Result<()> {
    let spec = existing
        .spec
        .as_mut()
        .ok_or_else(|| KubeError::structural_error(format!(
            "pod template of StatefulSet '{}' has no spec",
            statefulset_name
        )))?;

    let main_index = find_container(&spec.containers, builder.main_container_name())
        .ok_or_else(|| {
            KubeError::missing_container("server", builder.main_container_name(), statefulset_name)
        })?;

    let init_index = spec
        .init_containers
        .as_deref()
        .and_then(|containers| find_container(containers, builder.init_container_name()))
        .ok_or_else(|| {
            KubeError::missing_container("init", builder.init_container_name(), statefulset_name)
        })?;

    spec.containers[main_index] = builder.build_main_container();
    if let Some(init_containers) = spec.init_containers.as_mut() {
        init_containers[init_index] = builder.build_init_container();
    }

    overwrite_pod_spec_fields(spec, builder.build_pod_spec());

    let metadata = existing.metadata.get_or_insert_with(Default::default);
    metadata.labels = Some(builder.build_labels());
    metadata.annotations = Some(builder.build_annotations(metadata.annotations.as_ref()));

    Ok(())
}

fn find_container(containers: &[Container], name: &str) -> Option<usize> {
    containers.iter().position(|c| c.name == name)
}

/// Everything but the container lists is fully owned and recomputed.
fn overwrite_pod_spec_fields(spec: &mut PodSpec, desired: PodSpec) {
    spec.volumes = desired.volumes;
    spec.security_context = desired.security_context;
    spec.service_account_name = desired.service_account_name;
    spec.automount_service_account_token = desired.automount_service_account_token;
    spec.affinity = desired.affinity;
    spec.tolerations = desired.tolerations;
    spec.termination_grace_period_seconds = desired.termination_grace_period_seconds;
    spec.image_pull_secrets = desired.image_pull_secrets;
}
