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

//! Reconciling a live StatefulSet against a RabbitmqCluster.

use k8s_openapi::api::apps::v1::{StatefulSet, StatefulSetSpec};
use k8s_openapi::api::core::v1::{
    Affinity, Container, LocalObjectReference, NodeAffinity, NodeSelector,
    NodeSelectorRequirement, NodeSelectorTerm, PersistentVolumeClaim, PodSpec, PodTemplateSpec,
    Toleration,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use rabbitmq_kube::*;
use std::collections::BTreeMap;

mod test_utils {
    use super::*;

    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    pub fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    pub fn create_test_cluster() -> RabbitmqCluster {
        let mut cluster = RabbitmqCluster::new(
            "foo",
            RabbitmqClusterSpec {
                image: "rabbitmq-image-from-cr".to_string(),
                ..Default::default()
            },
        );
        cluster.metadata.namespace = Some("foo".to_string());
        cluster
    }

    pub fn named_container(name: &str) -> Container {
        Container {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// A live StatefulSet as another controller might have left it.
    pub fn existing_statefulset() -> StatefulSet {
        StatefulSet {
            metadata: ObjectMeta {
                name: Some("foo-rabbitmq-server".to_string()),
                namespace: Some("foo".to_string()),
                labels: Some(map(&[
                    ("app.kubernetes.io/name", "foo"),
                    ("app.kubernetes.io/part-of", "pivotal-rabbitmq"),
                    ("this-was-the-previous-label", "should-be-deleted"),
                ])),
                annotations: Some(map(&[
                    ("this-was-the-previous-annotation", "should-be-preserved"),
                    ("app.kubernetes.io/part-of", "pivotal-rabbitmq"),
                    ("app.k8s.io/something", "something-amazing"),
                ])),
                ..Default::default()
            },
            spec: Some(StatefulSetSpec {
                replicas: Some(1),
                template: PodTemplateSpec {
                    metadata: Some(ObjectMeta {
                        labels: Some(map(&[
                            ("app.kubernetes.io/name", "foo"),
                            ("this-was-the-previous-pod-label", "should-be-deleted"),
                        ])),
                        annotations: Some(map(&[
                            ("this-was-the-previous-pod-anno", "should-be-preserved"),
                            ("app.kubernetes.io/part-of", "pivotal-rabbitmq-pod"),
                            ("app.k8s.io/something", "something-amazing-on-pod"),
                        ])),
                        ..Default::default()
                    }),
                    spec: Some(PodSpec {
                        containers: vec![named_container("rabbitmq")],
                        init_containers: Some(vec![named_container("copy-config")]),
                        ..Default::default()
                    }),
                },
                volume_claim_templates: Some(vec![PersistentVolumeClaim {
                    metadata: ObjectMeta {
                        name: Some("persistence".to_string()),
                        ..Default::default()
                    },
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn update(cluster: &RabbitmqCluster, sts: &mut StatefulSet) -> Result<()> {
        init_tracing();
        let config = ResourceConfig::default();
        StatefulSetBuilder::new(cluster, &config)?.update(sts)
    }

    pub fn pod_spec(sts: &StatefulSet) -> &PodSpec {
        sts.spec.as_ref().unwrap().template.spec.as_ref().unwrap()
    }

    pub fn pod_metadata(sts: &StatefulSet) -> &ObjectMeta {
        sts.spec.as_ref().unwrap().template.metadata.as_ref().unwrap()
    }

    pub fn affinity(key: &str, values: &[&str]) -> Affinity {
        Affinity {
            node_affinity: Some(NodeAffinity {
                required_during_scheduling_ignored_during_execution: Some(NodeSelector {
                    node_selector_terms: vec![NodeSelectorTerm {
                        match_expressions: Some(vec![NodeSelectorRequirement {
                            key: key.to_string(),
                            operator: "In".to_string(),
                            values: Some(values.iter().map(|v| v.to_string()).collect()),
                        }]),
                        match_fields: None,
                    }],
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

use test_utils::*;

#[test]
fn test_update_sets_affinity() {
    let mut cluster = create_test_cluster();
    let desired = affinity("somekey", &["this-value", "this-other-value"]);
    cluster.spec.affinity = Some(desired.clone());

    let mut sts = existing_statefulset();
    update(&cluster, &mut sts).unwrap();

    assert_eq!(pod_spec(&sts).affinity, Some(desired));
}

#[test]
fn test_update_replaces_labels() {
    let mut cluster = create_test_cluster();
    cluster.metadata.labels = Some(map(&[
        ("app.kubernetes.io/foo", "bar"),
        ("foo", "bar"),
        ("rabbitmq", "is-great"),
        ("foo/app.kubernetes.io", "edgecase"),
    ]));

    let mut sts = existing_statefulset();
    update(&cluster, &mut sts).unwrap();

    let expected = map(&[
        ("app.kubernetes.io/name", "foo"),
        ("app.kubernetes.io/component", "rabbitmq"),
        ("app.kubernetes.io/part-of", "pivotal-rabbitmq"),
        ("foo", "bar"),
        ("rabbitmq", "is-great"),
        ("foo/app.kubernetes.io", "edgecase"),
    ]);
    assert_eq!(sts.metadata.labels.as_ref(), Some(&expected));
    assert_eq!(pod_metadata(&sts).labels.as_ref(), Some(&expected));
}

#[test]
fn test_update_overlays_annotations() {
    let mut cluster = create_test_cluster();
    cluster.metadata.annotations = Some(map(&[
        ("my-annotation", "i-like-this"),
        ("kubernetes.io/name", "i-do-not-like-this"),
        ("kubectl.kubernetes.io/name", "i-do-not-like-this"),
        ("k8s.io/name", "i-do-not-like-this"),
    ]));

    let mut sts = existing_statefulset();
    update(&cluster, &mut sts).unwrap();

    assert_eq!(
        sts.metadata.annotations.as_ref(),
        Some(&map(&[
            ("my-annotation", "i-like-this"),
            ("this-was-the-previous-annotation", "should-be-preserved"),
            ("app.kubernetes.io/part-of", "pivotal-rabbitmq"),
            ("app.k8s.io/something", "something-amazing"),
        ]))
    );
    assert_eq!(
        pod_metadata(&sts).annotations.as_ref(),
        Some(&map(&[
            ("my-annotation", "i-like-this"),
            ("this-was-the-previous-pod-anno", "should-be-preserved"),
            ("app.kubernetes.io/part-of", "pivotal-rabbitmq-pod"),
            ("app.k8s.io/something", "something-amazing-on-pod"),
        ]))
    );
}

#[test]
fn test_update_sets_tolerations() {
    let mut cluster = create_test_cluster();
    let tolerations = vec![Toleration {
        key: Some("mykey".to_string()),
        operator: Some("NotEqual".to_string()),
        value: Some("myvalue".to_string()),
        effect: Some("NoSchedule".to_string()),
        ..Default::default()
    }];
    cluster.spec.tolerations = tolerations.clone();

    let mut sts = existing_statefulset();
    update(&cluster, &mut sts).unwrap();
    assert_eq!(pod_spec(&sts).tolerations, Some(tolerations));

    cluster.spec.tolerations = Vec::new();
    update(&cluster, &mut sts).unwrap();
    assert!(pod_spec(&sts).tolerations.is_none());
}

#[test]
fn test_update_image_pull_secret_set_then_cleared() {
    let mut cluster = create_test_cluster();
    cluster.spec.image = "my-private-repo/rabbitmq:latest".to_string();
    cluster.spec.image_pull_secret = "my-secret".to_string();

    let mut sts = existing_statefulset();
    update(&cluster, &mut sts).unwrap();

    assert_eq!(
        pod_spec(&sts).image_pull_secrets,
        Some(vec![LocalObjectReference {
            name: "my-secret".to_string()
        }])
    );
    let server = pod_spec(&sts)
        .containers
        .iter()
        .find(|c| c.name == "rabbitmq")
        .unwrap();
    assert_eq!(server.image.as_deref(), Some("my-private-repo/rabbitmq:latest"));

    cluster.spec.image_pull_secret = String::new();
    update(&cluster, &mut sts).unwrap();
    assert_eq!(pod_spec(&sts).image_pull_secrets, Some(Vec::new()));
}

#[test]
fn test_update_replicas_and_owner_reference() {
    let mut cluster = create_test_cluster();
    cluster.spec.replicas = 3;
    cluster.metadata.uid = Some("uid-1".to_string());

    let mut sts = existing_statefulset();
    update(&cluster, &mut sts).unwrap();
    update(&cluster, &mut sts).unwrap();

    let spec = sts.spec.as_ref().unwrap();
    assert_eq!(spec.replicas, Some(3));
    assert_eq!(spec.service_name, "foo-rabbitmq-headless");
    assert_eq!(
        spec.selector.match_labels,
        Some(map(&[("app.kubernetes.io/name", "foo")]))
    );

    let refs = sts.metadata.owner_references.as_ref().unwrap();
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].uid, "uid-1");
}

#[test]
fn test_update_keeps_foreign_containers_and_claims() {
    let cluster = create_test_cluster();
    let mut sts = existing_statefulset();
    sts.spec
        .as_mut()
        .unwrap()
        .template
        .spec
        .as_mut()
        .unwrap()
        .containers
        .push(named_container("sidecar"));
    let claims_before = sts.spec.as_ref().unwrap().volume_claim_templates.clone();

    update(&cluster, &mut sts).unwrap();

    let containers = &pod_spec(&sts).containers;
    assert_eq!(containers.len(), 2);
    assert_eq!(containers[0].name, "rabbitmq");
    assert!(containers[0].readiness_probe.is_some());
    assert_eq!(containers[1], named_container("sidecar"));

    let init = &pod_spec(&sts).init_containers.as_ref().unwrap()[0];
    assert_eq!(init.image.as_deref(), Some("rabbitmq-image-from-cr"));

    assert_eq!(sts.spec.as_ref().unwrap().volume_claim_templates, claims_before);
}

#[test]
fn test_update_matches_build_for_owned_fields() {
    let mut cluster = create_test_cluster();
    cluster.spec.affinity = Some(affinity("zone", &["a"]));
    cluster.metadata.labels = Some(map(&[("team", "messaging")]));

    let config = ResourceConfig::default();
    let builder = StatefulSetBuilder::new(&cluster, &config).unwrap();
    let built = builder.build().unwrap();

    let mut sts = existing_statefulset();
    builder.update(&mut sts).unwrap();

    assert_eq!(sts.metadata.labels, built.metadata.labels);
    assert_eq!(pod_spec(&sts).containers, pod_spec(&built).containers);
    assert_eq!(pod_spec(&sts).init_containers, pod_spec(&built).init_containers);
    assert_eq!(pod_spec(&sts).volumes, pod_spec(&built).volumes);
    assert_eq!(pod_spec(&sts).security_context, pod_spec(&built).security_context);
    assert_eq!(pod_spec(&sts).affinity, pod_spec(&built).affinity);
}

#[test]
fn test_update_is_idempotent() {
    let mut cluster = create_test_cluster();
    cluster.metadata.labels = Some(map(&[("foo", "bar")]));
    cluster.metadata.annotations = Some(map(&[("my-annotation", "i-like-this")]));

    let mut once = existing_statefulset();
    update(&cluster, &mut once).unwrap();
    let mut twice = once.clone();
    update(&cluster, &mut twice).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn test_update_without_server_container_fails() {
    let cluster = create_test_cluster();
    let mut sts = existing_statefulset();
    sts.spec.as_mut().unwrap().template.spec.as_mut().unwrap().containers =
        vec![named_container("not-rabbitmq")];
    let template_before = sts.spec.as_ref().unwrap().template.clone();

    let result = update(&cluster, &mut sts);

    assert!(matches!(result, Err(KubeError::StructuralError(_))));
    assert_eq!(sts.spec.as_ref().unwrap().template, template_before);
}

#[test]
fn test_update_without_init_container_fails() {
    let cluster = create_test_cluster();
    let mut sts = existing_statefulset();
    sts.spec
        .as_mut()
        .unwrap()
        .template
        .spec
        .as_mut()
        .unwrap()
        .init_containers = None;

    let result = update(&cluster, &mut sts);
    assert!(matches!(result, Err(KubeError::StructuralError(_))));
}
