//! Resolve command implementation.

use crate::cli::ResolveArgs;
use crate::config::LineageConfig;
use crate::error::Result;
use crate::output::Formatter;
use lineage_domain::RunId;
use lineage_resolver::{IdentityResolver, ResolverConfig};
use lineage_store::SqliteStore;

/// Execute the resolve command.
pub fn execute_resolve(
    args: ResolveArgs,
    store: &mut SqliteStore,
    config: &LineageConfig,
    formatter: &Formatter,
) -> Result<()> {
    let resolver = IdentityResolver::new(apply_overrides(config.resolver.clone(), &args))?
        .with_run_id(RunId::new());

    let summary = resolver.resolve_all(store)?;
    println!("{}", formatter.format_resolution(&summary)?);
    Ok(())
}

/// Command-line flags take precedence over the `[resolver]` section.
pub fn apply_overrides(mut config: ResolverConfig, args: &ResolveArgs) -> ResolverConfig {
    if let Some(threshold) = args.threshold {
        config.merge_threshold = threshold;
    }
    if let Some(max) = args.max_candidates {
        config.max_candidates = max;
    }
    if args.dry_run {
        config.dry_run = true;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win() {
        let args = ResolveArgs {
            threshold: Some(0.9),
            max_candidates: None,
            dry_run: true,
        };
        let config = apply_overrides(ResolverConfig::default(), &args);
        assert_eq!(config.merge_threshold, 0.9);
        assert_eq!(config.max_candidates, 100);
        assert!(config.dry_run);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = ResolveArgs {
            threshold: None,
            max_candidates: None,
            dry_run: false,
        };
        let base = ResolverConfig {
            dry_run: true,
            ..ResolverConfig::strict()
        };
        assert_eq!(apply_overrides(base.clone(), &args), base);
    }
}
