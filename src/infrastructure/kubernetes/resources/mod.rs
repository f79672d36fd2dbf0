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

//! Builders for the Kubernetes objects owned by a RabbitmqCluster

pub mod metadata;
pub mod naming;
pub mod pod;
pub mod statefulset;

pub use self::metadata::{is_reserved_key, reconcile_annotations, reconcile_labels};
pub use self::naming::{child_resource_name, ChildResource};
pub use self::pod::PodTemplateBuilder;
pub use self::statefulset::{PersistenceClaimBuilder, StatefulSetBuilder};
