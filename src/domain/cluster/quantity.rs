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

use crate::shared::error::{KubeError, Result};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use regex::Regex;

/// Kubernetes quantity grammar: signed decimal number followed by an
/// optional binary SI, decimal SI or decimal exponent suffix.
const QUANTITY_PATTERN: &str =
    r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[KMGTPE]i|[numkMGTPE]|[eE][+-]?[0-9]+)?$";

pub fn parse_quantity(s: &str) -> Result<Quantity> {
    let s = s.trim();

    let re = Regex::new(QUANTITY_PATTERN)
        .map_err(|e| KubeError::validation_error(format!("Invalid quantity pattern: {}", e)))?;

    if !re.is_match(s) {
        return Err(KubeError::validation_error(format!(
            "Invalid quantity '{}': expected a number with an optional unit (e.g. 10Gi, 500Mi, 100m)",
            s
        )));
    }

    Ok(Quantity(s.to_string()))
}
