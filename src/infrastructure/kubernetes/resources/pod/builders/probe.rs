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

use crate::infrastructure::constants::{
    READINESS_INITIAL_DELAY, READINESS_PERIOD, READINESS_PROBE_COMMAND, READINESS_TIMEOUT,
};
use k8s_openapi::api::core::v1::{ExecAction, Probe};

pub struct ProbeBuilder;

impl ProbeBuilder {
    pub fn build_exec_probe(
        command: &str,
        initial_delay: i32,
        timeout: i32,
        period: i32,
    ) -> Probe {
        Probe {
            exec: Some(ExecAction {
                command: Some(vec![
                    "/bin/sh".to_string(),
                    "-c".to_string(),
                    command.to_string(),
                ]),
            }),
            initial_delay_seconds: Some(initial_delay),
            timeout_seconds: Some(timeout),
            period_seconds: Some(period),
            ..Default::default()
        }
    }

    pub fn build_default_readiness() -> Probe {
        Self::build_exec_probe(
            READINESS_PROBE_COMMAND,
            READINESS_INITIAL_DELAY,
            READINESS_TIMEOUT,
            READINESS_PERIOD,
        )
    }
}
