//! Kubeconfigs whose user runs an exec credential plugin

use std::sync::Arc;

use kubemux_core::{ClusterCredentials, TargetId};
use kubemux_gateway::ClusterServices;
use kubemux_kube::{resolve, ConnectionFactory, KubeClientFactory};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Kubeconfig whose user token comes from a shell one-liner printing an
/// ExecCredential.
fn exec_kubeconfig(server: &str) -> String {
    format!(
        r#"apiVersion: v1
kind: Config
current-context: test
clusters:
  - name: test
    cluster:
      server: {server}
users:
  - name: test
    user:
      exec:
        apiVersion: client.authentication.k8s.io/v1beta1
        command: sh
        args:
          - -c
          - 'printf "%s" "{{\"apiVersion\":\"client.authentication.k8s.io/v1beta1\",\"kind\":\"ExecCredential\",\"status\":{{\"token\":\"exec-token\"}}}}"'
        interactiveMode: Never
contexts:
  - name: test
    context:
      cluster: test
      user: test
"#
    )
}

#[cfg(unix)]
#[tokio::test]
async fn test_exec_plugin_token_reaches_api_server() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/namespaces"))
        .and(header("authorization", "Bearer exec-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "apiVersion": "v1",
            "kind": "NamespaceList",
            "metadata": {"resourceVersion": "1"},
            "items": [{"metadata": {"name": "kube-system"}, "status": {"phase": "Active"}}]
        })))
        .expect(1)
        .mount(&api)
        .await;

    let credentials = ClusterCredentials {
        config_content: exec_kubeconfig(&api.uri()),
        ..Default::default()
    };
    let descriptor = resolve(&credentials).await.unwrap();
    assert_eq!(descriptor.auth_kind(), "exec");

    let handle = KubeClientFactory::default().build(descriptor).unwrap();
    let services = ClusterServices::new(TargetId::Default, Arc::new(handle));
    let namespaces = services.namespaces().list().await.unwrap();

    assert_eq!(namespaces.len(), 1);
    assert_eq!(namespaces[0].name, "kube-system");
}
