use clap::Parser;
use cli::args::{Cli, Commands, OutputArg};
use cli::registry::{self, Invocation};
use migrator_core::config::{self, MigratorConfig};
use migrator_core::manifest::OutputFormat;
use std::io::Cursor;

const FOUND_CRBS: &str = r#"
apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRoleBindingList
metadata: {}
items:
- metadata:
    annotations:
      kubectl.kubernetes.io/last-applied-configuration: '{"kind":"ClusterRoleBinding"}'
    name: admin-binding
    resourceVersion: "7"
    uid: 1d3c3b9e-0000-4000-8000-000000000001
  roleRef:
    apiGroup: rbac.authorization.k8s.io
    kind: ClusterRole
    name: cluster-admin
  subjects:
  - apiGroup: rbac.authorization.k8s.io
    kind: User
    name: alice@example.com
  - kind: ServiceAccount
    name: x
    namespace: default
"#;

fn rewrite_config() -> MigratorConfig {
    let mut cfg = MigratorConfig::default();
    cfg.rules.user_include_suffix = "@example.com".into();
    cfg.rules.groups_exclude_suffix = "@groups.example.com".into();
    cfg.rules.workforce_pool_name = "my-pool".into();
    cfg
}

#[test]
fn builtin_registry_covers_every_subcommand() {
    let registry = registry::builtin();
    let names: Vec<_> = registry.list().map(|(name, _)| name).collect();
    assert_eq!(
        names,
        vec![
            "find-clusterrolebindings",
            "find-rolebindings",
            "rewrite-clusterrolebindings",
            "rewrite-rolebindings",
        ]
    );
    for name in names {
        assert_eq!(registry.get(name).unwrap().name(), name);
    }
    assert!(registry.get("commands").is_err());
}

#[test]
fn flags_override_loaded_settings() {
    let cli = Cli::try_parse_from([
        "identity-migrator",
        "rewrite-rolebindings",
        "--user-include-suffix",
        "@corp.example",
        "--groups-include-prefix",
        "idp:",
        "--workforce-pool-name",
        "corp-pool",
        "--output",
        "json",
        "-f",
        "found.yaml",
    ])
    .unwrap();
    assert_eq!(cli.output, OutputArg::Json);
    assert_eq!(cli.command.name(), "rewrite-rolebindings");
    assert_eq!(cli.command.input_path(), Some("found.yaml"));

    let mut cfg = MigratorConfig::default();
    cfg.rules.user_include_prefix = "oidc:".into();
    cfg.rules.user_include_suffix = "@old.example".into();
    cli.command.apply_overrides(&mut cfg);

    assert_eq!(cfg.rules.user_include_prefix, "oidc:");
    assert_eq!(cfg.rules.user_include_suffix, "@corp.example");
    assert_eq!(cfg.rules.groups_include_prefix, "idp:");
    assert_eq!(cfg.rules.workforce_pool_name, "corp-pool");
    assert!(!cfg.require_groups_exclude_suffix);
}

#[test]
fn find_flags_set_kubeconfig_and_strict_groups() {
    let cli = Cli::try_parse_from([
        "identity-migrator",
        "find-clusterrolebindings",
        "--kubeconfig",
        "/tmp/kubeconfig",
        "--user-include-suffix",
        "@example.com",
        "--require-groups-exclude-suffix",
    ])
    .unwrap();
    assert!(matches!(cli.command, Commands::FindClusterRoleBindings(_)));
    assert_eq!(cli.command.input_path(), None);

    let mut cfg = MigratorConfig::default();
    cli.command.apply_overrides(&mut cfg);
    assert_eq!(cfg.kubeconfig.as_deref(), Some("/tmp/kubeconfig"));
    assert!(cfg.require_groups_exclude_suffix);
}

#[test]
fn settings_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("migrator.toml");
    std::fs::write(
        &path,
        r#"
page_size = 100

[rules]
user_include_suffix = "@example.com"
groups_exclude_suffix = "@groups.example.com"
workforce_pool_name = "my-pool"
"#,
    )
    .unwrap();

    let cfg = config::load(Some(path.to_str().unwrap())).unwrap();
    assert_eq!(cfg.page_size, 100);
    assert_eq!(cfg.kubeconfig, None);
    assert_eq!(cfg.rules.user_include_suffix, "@example.com");
    assert_eq!(cfg.rules.user_include_prefix, "");
    assert_eq!(cfg.rules.workforce_pool_name, "my-pool");
}

#[tokio::test]
async fn rewrite_command_migrates_input() {
    let cfg = rewrite_config();
    let handler = registry::builtin()
        .get("rewrite-clusterrolebindings")
        .unwrap();
    let mut out: Vec<u8> = Vec::new();

    handler
        .execute(Invocation {
            config: &cfg,
            format: OutputFormat::Yaml,
            input: Box::new(Cursor::new(FOUND_CRBS)),
            output: &mut out,
        })
        .await
        .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("kind: ClusterRoleBindingList"));
    assert!(text.contains("name: admin-binding-wfidf"));
    assert!(text.contains(
        "principal://iam.googleapis.com/locations/global/workforcePools/my-pool/subject/alice@example.com"
    ));
    assert!(text.contains("kind: ServiceAccount"));
    assert!(!text.contains("last-applied-configuration"));
    assert!(!text.contains("resourceVersion"));
    assert!(!text.contains("uid:"));
}

#[tokio::test]
async fn rewrite_command_requires_pool_name() {
    let mut cfg = rewrite_config();
    cfg.rules.workforce_pool_name.clear();
    let handler = registry::builtin().get("rewrite-rolebindings").unwrap();
    let mut out: Vec<u8> = Vec::new();

    let err = handler
        .execute(Invocation {
            config: &cfg,
            format: OutputFormat::Yaml,
            input: Box::new(Cursor::new(FOUND_CRBS)),
            output: &mut out,
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "--workforce-pool-name must be specified");
    assert!(out.is_empty());
}

#[tokio::test]
async fn rewrite_command_rejects_mismatched_list() {
    let cfg = rewrite_config();
    let handler = registry::builtin().get("rewrite-rolebindings").unwrap();
    let mut out: Vec<u8> = Vec::new();

    let err = handler
        .execute(Invocation {
            config: &cfg,
            format: OutputFormat::Yaml,
            input: Box::new(Cursor::new(FOUND_CRBS)),
            output: &mut out,
        })
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("expected kind RoleBindingList, found ClusterRoleBindingList"));
    assert!(out.is_empty());
}

#[tokio::test]
async fn find_command_checks_settings_before_connecting() {
    let cfg = MigratorConfig {
        kubeconfig: Some("/nonexistent/kubeconfig".into()),
        ..MigratorConfig::default()
    };
    let handler = registry::builtin().get("find-rolebindings").unwrap();
    let mut out: Vec<u8> = Vec::new();

    let err = handler
        .execute(Invocation {
            config: &cfg,
            format: OutputFormat::Yaml,
            input: Box::new(std::io::empty()),
            output: &mut out,
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "--user-include-suffix must be specified");
}

#[tokio::test]
async fn find_command_reports_unreadable_kubeconfig() {
    let mut cfg = rewrite_config();
    cfg.kubeconfig = Some("/nonexistent/kubeconfig".into());
    let handler = registry::builtin()
        .get("find-clusterrolebindings")
        .unwrap();
    let mut out: Vec<u8> = Vec::new();

    let err = handler
        .execute(Invocation {
            config: &cfg,
            format: OutputFormat::Yaml,
            input: Box::new(std::io::empty()),
            output: &mut out,
        })
        .await
        .unwrap_err();

    let message = format!("{err:#}");
    assert!(message.starts_with("connecting to cluster"));
    assert!(message.contains("/nonexistent/kubeconfig"));
    assert!(out.is_empty());
}
