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
use crate::infrastructure::kubernetes::resources::metadata::{
    owner_reference, reconcile_annotations, reconcile_labels, upsert_owner_reference,
};
use crate::infrastructure::kubernetes::resources::naming::ChildResource;
use crate::infrastructure::kubernetes::resources::pod::builders::LabeledResourceBuilder;
use crate::infrastructure::kubernetes::resources::pod::{merge_pod_template, PodTemplateBuilder};
use crate::infrastructure::kubernetes::resources::statefulset::PersistenceClaimBuilder;
use crate::shared::error::Result;
use k8s_openapi::api::apps::v1::{StatefulSet, StatefulSetSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};

/// Builds and reconciles the server StatefulSet of a RabbitmqCluster.
pub struct StatefulSetBuilder<'a> {
    cluster: &'a RabbitmqCluster,
    config: &'a ResourceConfig,
    instance_name: &'a str,
}

impl LabeledResourceBuilder for StatefulSetBuilder<'_> {
    fn instance_name(&self) -> &str {
        self.instance_name
    }
}

impl<'a> StatefulSetBuilder<'a> {
    /// Fails with `InvalidResource` when the cluster has no name.
    pub fn new(cluster: &'a RabbitmqCluster, config: &'a ResourceConfig) -> Result<Self> {
        Ok(Self {
            cluster,
            config,
            instance_name: cluster.instance_name()?,
        })
    }

    pub fn statefulset_name(&self) -> String {
        ChildResource::Server.name_for(self.instance_name)
    }

    pub fn service_name(&self) -> String {
        ChildResource::Headless.name_for(self.instance_name)
    }

    pub fn build(&self) -> Result<StatefulSet> {
        let name = self.statefulset_name();
        tracing::debug!(
            name = %name,
            namespace = ?self.cluster.instance_namespace(),
            "Building StatefulSet"
        );

        let claim_template =
            PersistenceClaimBuilder::new(self.cluster, self.config, self.instance_name).build()?;
        let pod_template =
            PodTemplateBuilder::new(self.cluster, self.config, self.instance_name).build();

        let metadata = ObjectMeta {
            name: Some(name),
            namespace: self.cluster.instance_namespace().map(str::to_string),
            labels: Some(reconcile_labels(
                self.instance_name,
                self.cluster.user_labels(),
            )),
            annotations: Some(reconcile_annotations(None, self.cluster.user_annotations())),
            owner_references: Some(vec![owner_reference(self.cluster, self.instance_name)]),
            ..Default::default()
        };

        Ok(StatefulSet {
            metadata,
            spec: Some(StatefulSetSpec {
                replicas: Some(self.cluster.spec.replicas),
                service_name: self.service_name(),
                selector: self.selector(),
                template: pod_template,
                volume_claim_templates: Some(vec![claim_template]),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    /// Reconcile a live StatefulSet in place.
    ///
    /// Labels are replaced, annotations are overlaid, everything else this
    /// crate owns is recomputed. Volume claim templates are left as they
    /// are. If the server or init container is missing a `StructuralError`
    /// is returned after the object metadata and replica count have
    /// already been written; refetch before retrying.
    pub fn update(&self, statefulset: &mut StatefulSet) -> Result<()> {
        let name = statefulset
            .metadata
            .name
            .clone()
            .unwrap_or_else(|| self.statefulset_name());
        tracing::debug!(name = %name, "Updating StatefulSet");

        let metadata = &mut statefulset.metadata;
        metadata.labels = Some(reconcile_labels(
            self.instance_name,
            self.cluster.user_labels(),
        ));
        metadata.annotations = Some(reconcile_annotations(
            metadata.annotations.as_ref(),
            self.cluster.user_annotations(),
        ));
        upsert_owner_reference(
            &mut metadata.owner_references,
            owner_reference(self.cluster, self.instance_name),
        );

        let spec = statefulset.spec.get_or_insert_with(Default::default);
        spec.replicas = Some(self.cluster.spec.replicas);

        let pod_builder = PodTemplateBuilder::new(self.cluster, self.config, self.instance_name);
        if let Err(e) = merge_pod_template(&mut spec.template, &pod_builder, &name) {
            tracing::warn!(name = %name, error = %e, "Cannot reconcile StatefulSet pod template");
            return Err(e);
        }

        spec.service_name = self.service_name();
        spec.selector = self.selector();

        Ok(())
    }

    fn selector(&self) -> LabelSelector {
        LabelSelector {
            match_labels: Some(self.get_selector_labels()),
            ..Default::default()
        }
    }
}
