//! CLI flags layered over the file config

use crate::domain::Config;

/// Values given on the command line. `None` leaves the config value alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub include: Option<String>,
    pub exclude: Option<String>,
    pub tree_enabled: Option<bool>,
    pub tree_include: Option<String>,
    pub tree_exclude: Option<String>,
    pub tree_show_hidden: Option<bool>,
    pub source_enabled: Option<bool>,
    pub source_include: Option<String>,
    pub source_exclude: Option<String>,
    pub source_show_hidden: Option<bool>,
    pub source_threshold_mb: Option<f64>,
    pub core_ignores: Option<bool>,
    pub respect_gitignore: Option<bool>,
    pub raw: Option<bool>,
}

pub fn merge_cli_with_config(mut config: Config, cli: CliOverrides) -> Config {
    fn set<T>(target: &mut T, value: Option<T>) {
        if let Some(value) = value {
            *target = value;
        }
    }

    set(&mut config.include, cli.include);
    set(&mut config.exclude, cli.exclude);

    set(&mut config.tree.enabled, cli.tree_enabled);
    set(&mut config.tree.include, cli.tree_include);
    set(&mut config.tree.exclude, cli.tree_exclude);
    set(&mut config.tree.show_hidden, cli.tree_show_hidden);

    set(&mut config.source.enabled, cli.source_enabled);
    set(&mut config.source.include, cli.source_include);
    set(&mut config.source.exclude, cli.source_exclude);
    set(&mut config.source.show_hidden, cli.source_show_hidden);
    set(&mut config.source.threshold_mb, cli.source_threshold_mb);

    set(&mut config.core_ignores, cli.core_ignores);
    set(&mut config.respect_gitignore, cli.respect_gitignore);
    set(&mut config.raw, cli.raw);

    config
}
