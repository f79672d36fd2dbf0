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

use crate::infrastructure::kubernetes::resources::metadata::{managed_labels, selector_labels};
use k8s_openapi::api::core::v1::{Container, PodSpec, Volume, VolumeMount};
use std::collections::BTreeMap;

pub trait LabeledResourceBuilder {
    fn instance_name(&self) -> &str;

    fn get_labels(&self) -> BTreeMap<String, String> {
        managed_labels(self.instance_name())
    }

    fn get_selector_labels(&self) -> BTreeMap<String, String> {
        selector_labels(self.instance_name())
    }
}

pub trait PodBuilder: LabeledResourceBuilder {
    fn main_container_name(&self) -> &'static str;

    fn init_container_name(&self) -> &'static str;

    fn build_main_container(&self) -> Container;

    fn build_init_container(&self) -> Container;

    fn build_volumes(&self) -> Vec<Volume>;

    fn build_volume_mounts(&self) -> Vec<VolumeMount>;

    fn build_init_volume_mounts(&self) -> Vec<VolumeMount>;

    fn build_pod_spec(&self) -> PodSpec;
}
