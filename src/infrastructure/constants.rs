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

/// Naming
pub const CHILD_RESOURCE_INFIX: &str = "rabbitmq";

/// Network configuration
pub const POD_CLUSTER_DOMAIN: &str = "cluster.local";

/// Server ports
pub const EPMD_PORT: i32 = 4369;
pub const AMQP_PORT: i32 = 5672;
pub const MANAGEMENT_PORT: i32 = 15672;
pub const PROMETHEUS_PORT: i32 = 15692;

/// Port names
pub const PORT_NAME_EPMD: &str = "epmd";
pub const PORT_NAME_AMQP: &str = "amqp";
pub const PORT_NAME_MANAGEMENT: &str = "management";
pub const PORT_NAME_PROMETHEUS: &str = "prometheus";

/// Readiness probe
pub const READINESS_PROBE_COMMAND: &str = "rabbitmq-diagnostics check_port_connectivity";
pub const READINESS_INITIAL_DELAY: i32 = 10;
pub const READINESS_TIMEOUT: i32 = 5;
pub const READINESS_PERIOD: i32 = 30;

/// Graceful shutdown
pub const TERMINATION_GRACE_PERIOD_SECONDS: i64 = 150;

/// Default resource settings
pub const DEFAULT_IMAGE: &str = "rabbitmq:3.8.1";
pub const DEFAULT_STORAGE_SIZE: &str = "10Gi";
pub const DEFAULT_ACCESS_MODE: &str = "ReadWriteOnce";
pub const DEFAULT_REPLICAS: i32 = 1;

/// Init container settings
pub const INIT_CONTAINER_CPU: &str = "100m";
pub const INIT_CONTAINER_MEMORY: &str = "500Mi";

/// Resource labels
pub const LABEL_NAME: &str = "app.kubernetes.io/name";
pub const LABEL_COMPONENT: &str = "app.kubernetes.io/component";
pub const LABEL_PART_OF: &str = "app.kubernetes.io/part-of";
pub const LABEL_COMPONENT_VALUE: &str = "rabbitmq";
pub const LABEL_PART_OF_VALUE: &str = "pivotal-rabbitmq";

/// Label and annotation domains owned by the platform
pub const RESERVED_DOMAINS: &[&str] = &[
    "kubernetes.io",
    "k8s.io",
    "kubectl.kubernetes.io",
    "app.kubernetes.io",
];

/// Container names
pub const CONTAINER_NAME_SERVER: &str = "rabbitmq";
pub const CONTAINER_NAME_INIT: &str = "copy-config";

/// Security context
pub const RABBITMQ_UID: i64 = 999;
pub const RABBITMQ_GID: i64 = 999;

/// Volume and VolumeMount names
pub const VOLUME_NAME_ADMIN: &str = "rabbitmq-admin";
pub const VOLUME_NAME_SERVER_CONF: &str = "server-conf";
pub const VOLUME_NAME_ETC: &str = "rabbitmq-etc";
pub const VOLUME_NAME_ERLANG_COOKIE: &str = "rabbitmq-erlang-cookie";
pub const VOLUME_NAME_ERLANG_COOKIE_SECRET: &str = "erlang-cookie-secret";
pub const VOLUME_NAME_PERSISTENCE: &str = "persistence";

/// Mount paths of the server container
pub const MOUNT_PATH_SERVER_CONF: &str = "/opt/server-conf/";
pub const MOUNT_PATH_ADMIN: &str = "/opt/rabbitmq-secret/";
pub const MOUNT_PATH_PERSISTENCE: &str = "/var/lib/rabbitmq/db/";
pub const MOUNT_PATH_ETC: &str = "/etc/rabbitmq/";
pub const MOUNT_PATH_ERLANG_COOKIE: &str = "/var/lib/rabbitmq/";

/// Mount paths only used by the init container
pub const MOUNT_PATH_CONF_STAGING: &str = "/tmp/rabbitmq/";
pub const MOUNT_PATH_ERLANG_COOKIE_SECRET: &str = "/tmp/erlang-cookie-secret/";

/// Admin secret keys
pub const ADMIN_SECRET_USERNAME_KEY: &str = "username";
pub const ADMIN_SECRET_PASSWORD_KEY: &str = "password";

/// Files consumed by the server
pub const ENABLED_PLUGINS_FILE: &str = "/opt/server-conf/enabled_plugins";
pub const DEFAULT_PASS_FILE: &str = "/opt/rabbitmq-secret/password";
pub const DEFAULT_USER_FILE: &str = "/opt/rabbitmq-secret/username";
pub const MNESIA_BASE: &str = "/var/lib/rabbitmq/db";
