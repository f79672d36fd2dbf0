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

use crate::infrastructure::constants::CHILD_RESOURCE_INFIX;

/// Resources owned by a RabbitmqCluster instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildResource {
    Server,
    Headless,
    Admin,
    ErlangCookie,
    ServerConf,
}

impl ChildResource {
    pub fn suffix(&self) -> &'static str {
        match self {
            ChildResource::Server => "server",
            ChildResource::Headless => "headless",
            ChildResource::Admin => "admin",
            ChildResource::ErlangCookie => "erlang-cookie",
            ChildResource::ServerConf => "server-conf",
        }
    }

    pub fn name_for(&self, instance: &str) -> String {
        child_resource_name(instance, self.suffix())
    }
}

/// `{instance}-rabbitmq-{suffix}`; an empty suffix leaves no trailing dash.
pub fn child_resource_name(instance: &str, suffix: &str) -> String {
    format!("{}-{}-{}", instance, CHILD_RESOURCE_INFIX, suffix)
        .trim_end_matches('-')
        .to_string()
}
