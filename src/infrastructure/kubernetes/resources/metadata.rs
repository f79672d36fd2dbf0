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

//! Label and annotation reconciliation
//!
//! Labels belong to the operator: they are recomputed from the cluster
//! spec and replace whatever is on the live object. Annotations are shared
//! with other tooling: cluster annotations are layered on top of the live
//! ones and nothing is ever removed. Keep these two paths separate.
//!
//! Keys in a platform-owned domain (see `RESERVED_DOMAINS`) are never
//! copied from the cluster resource.

use crate::domain::cluster::RabbitmqCluster;
use crate::infrastructure::constants::{
    LABEL_COMPONENT, LABEL_COMPONENT_VALUE, LABEL_NAME, LABEL_PART_OF, LABEL_PART_OF_VALUE,
    RESERVED_DOMAINS,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::Resource;
use std::collections::BTreeMap;

/// Controller reference back to the owning RabbitmqCluster.
pub fn owner_reference(cluster: &RabbitmqCluster, instance_name: &str) -> OwnerReference {
    OwnerReference {
        api_version: RabbitmqCluster::api_version(&()).to_string(),
        kind: RabbitmqCluster::kind(&()).to_string(),
        name: instance_name.to_string(),
        uid: cluster.metadata.uid.clone().unwrap_or_default(),
        controller: Some(true),
        block_owner_deletion: Some(true),
    }
}

/// Replace the reference with the same kind and name, or append it.
pub fn upsert_owner_reference(
    references: &mut Option<Vec<OwnerReference>>,
    owner: OwnerReference,
) {
    let references = references.get_or_insert_with(Vec::new);
    match references
        .iter_mut()
        .find(|r| r.kind == owner.kind && r.name == owner.name)
    {
        Some(existing) => *existing = owner,
        None => references.push(owner),
    }
}

/// Domain segment of a label or annotation key: everything before the first `/`.
pub fn key_domain(key: &str) -> Option<&str> {
    key.split_once('/').map(|(domain, _)| domain)
}

/// True when the key's domain is exactly one of the reserved domains.
///
/// `app.k8s.io/x` and `foo/app.kubernetes.io` are not reserved.
pub fn is_reserved_key(key: &str) -> bool {
    key_domain(key).is_some_and(|domain| RESERVED_DOMAINS.contains(&domain))
}

fn filter_reserved<'a>(
    entries: Option<&'a BTreeMap<String, String>>,
) -> impl Iterator<Item = (&'a String, &'a String)> {
    entries.into_iter().flatten().filter(|(key, _)| {
        let reserved = is_reserved_key(key);
        if reserved {
            tracing::debug!(key = %key, "Dropping key in reserved domain");
        }
        !reserved
    })
}

/// The identity triple every managed object carries.
pub fn managed_labels(instance_name: &str) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert(LABEL_NAME.to_string(), instance_name.to_string());
    labels.insert(LABEL_COMPONENT.to_string(), LABEL_COMPONENT_VALUE.to_string());
    labels.insert(LABEL_PART_OF.to_string(), LABEL_PART_OF_VALUE.to_string());
    labels
}

pub fn selector_labels(instance_name: &str) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert(LABEL_NAME.to_string(), instance_name.to_string());
    labels
}

/// Full replacement label set: filtered user labels, then the managed triple on top.
pub fn reconcile_labels(
    instance_name: &str,
    user_labels: Option<&BTreeMap<String, String>>,
) -> BTreeMap<String, String> {
    let mut labels: BTreeMap<String, String> = filter_reserved(user_labels)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    labels.extend(managed_labels(instance_name));
    labels
}

/// Existing annotations with filtered user annotations overlaid. Never drops a key.
pub fn reconcile_annotations(
    existing: Option<&BTreeMap<String, String>>,
    user_annotations: Option<&BTreeMap<String, String>>,
) -> BTreeMap<String, String> {
    let mut annotations = existing.cloned().unwrap_or_default();
    for (k, v) in filter_reserved(user_annotations) {
        annotations.insert(k.clone(), v.clone());
    }
    annotations
}
