use clap::{Args, Parser, Subcommand, ValueEnum};
use migrator_core::config::MigratorConfig;
use migrator_core::manifest::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "identity-migrator")]
#[command(
    about = "Migrates RBAC bindings from Identity Service for GKE to Workforce Identity Federation",
    long_about = None
)]
pub struct Cli {
    /// Path to a settings file (TOML, YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Output format of the emitted list
    #[arg(short, long, value_enum, default_value_t = OutputArg::Yaml, global = true)]
    pub output: OutputArg,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    Yaml,
    Json,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Yaml => OutputFormat::Yaml,
            OutputArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find ClusterRoleBindings that appear to refer to federated users or groups
    #[command(name = "find-clusterrolebindings")]
    FindClusterRoleBindings(FindArgs),
    /// Find RoleBindings (all namespaces) that appear to refer to federated users or groups
    #[command(name = "find-rolebindings")]
    FindRoleBindings(FindArgs),
    /// Read a ClusterRoleBindingList and print a migrated copy
    #[command(name = "rewrite-clusterrolebindings")]
    RewriteClusterRoleBindings(RewriteArgs),
    /// Read a RoleBindingList and print a migrated copy
    #[command(name = "rewrite-rolebindings")]
    RewriteRoleBindings(RewriteArgs),
    /// List the available commands
    #[command(name = "commands")]
    ListCommands,
}

#[derive(Args, Debug, Default, Clone)]
pub struct RuleArgs {
    /// Prefix recognizing federated users; stripped from the translated name
    #[arg(long)]
    pub user_include_prefix: Option<String>,

    /// Suffix recognizing federated users, typically your organization's domain (required)
    #[arg(long)]
    pub user_include_suffix: Option<String>,

    /// Prefix recognizing federated groups; stripped from the translated name
    #[arg(long)]
    pub groups_include_prefix: Option<String>,

    /// Suffix excluding groups, e.g. those introduced by Google Groups for RBAC
    #[arg(long)]
    pub groups_exclude_suffix: Option<String>,

    /// Fail instead of excluding every group when the exclude suffix is empty
    #[arg(long, default_value_t = false)]
    pub require_groups_exclude_suffix: bool,
}

#[derive(Args, Debug, Clone)]
pub struct FindArgs {
    /// Path to the kubeconfig file; inferred from KUBECONFIG or ~/.kube/config if omitted
    #[arg(long)]
    pub kubeconfig: Option<String>,

    #[command(flatten)]
    pub rules: RuleArgs,
}

#[derive(Args, Debug, Clone)]
pub struct RewriteArgs {
    /// Name of the Workforce Identity Pool federating principals and groups (required)
    #[arg(long)]
    pub workforce_pool_name: Option<String>,

    /// List produced by the matching find command; `-` reads stdin
    #[arg(short = 'f', long, default_value = "-")]
    pub filename: String,

    #[command(flatten)]
    pub rules: RuleArgs,
}

impl Commands {
    /// Registry key of the selected command.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::FindClusterRoleBindings(_) => "find-clusterrolebindings",
            Commands::FindRoleBindings(_) => "find-rolebindings",
            Commands::RewriteClusterRoleBindings(_) => "rewrite-clusterrolebindings",
            Commands::RewriteRoleBindings(_) => "rewrite-rolebindings",
            Commands::ListCommands => "commands",
        }
    }

    /// Input file of rewrite commands.
    pub fn input_path(&self) -> Option<&str> {
        match self {
            Commands::RewriteClusterRoleBindings(args) | Commands::RewriteRoleBindings(args) => {
                Some(args.filename.as_str())
            }
            _ => None,
        }
    }

    /// Layers command-line flags over loaded settings.
    pub fn apply_overrides(&self, cfg: &mut MigratorConfig) {
        match self {
            Commands::FindClusterRoleBindings(args) | Commands::FindRoleBindings(args) => {
                if let Some(path) = &args.kubeconfig {
                    cfg.kubeconfig = Some(path.clone());
                }
                args.rules.apply(cfg);
            }
            Commands::RewriteClusterRoleBindings(args) | Commands::RewriteRoleBindings(args) => {
                if let Some(pool) = &args.workforce_pool_name {
                    cfg.rules.workforce_pool_name = pool.clone();
                }
                args.rules.apply(cfg);
            }
            Commands::ListCommands => {}
        }
    }
}

impl RuleArgs {
    fn apply(&self, cfg: &mut MigratorConfig) {
        let rules = &mut cfg.rules;
        for (flag, field) in [
            (&self.user_include_prefix, &mut rules.user_include_prefix),
            (&self.user_include_suffix, &mut rules.user_include_suffix),
            (&self.groups_include_prefix, &mut rules.groups_include_prefix),
            (&self.groups_exclude_suffix, &mut rules.groups_exclude_suffix),
        ] {
            if let Some(value) = flag {
                *field = value.clone();
            }
        }
        if self.require_groups_exclude_suffix {
            cfg.require_groups_exclude_suffix = true;
        }
    }
}
