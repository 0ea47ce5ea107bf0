use crate::config::credentials::{credential_name, detect_source};
use crate::config::{Config, ServiceKind};
use anyhow::Result;

#[derive(Debug)]
enum CheckResult {
    Pass(String),
    Fail(String),
    Skip(String),
}

impl CheckResult {
    fn label(&self) -> &'static str {
        match self {
            Self::Pass(_) => "PASS",
            Self::Fail(_) => "FAIL",
            Self::Skip(_) => "SKIP",
        }
    }

    fn detail(&self) -> &str {
        match self {
            Self::Pass(s) | Self::Fail(s) | Self::Skip(s) => s,
        }
    }

    fn is_fail(&self) -> bool {
        matches!(self, Self::Fail(_))
    }
}

fn print_check(name: &str, result: &CheckResult) {
    let label = result.label();
    let detail = result.detail();
    println!("  {:<6} {:<30} {}", label, name, detail);
}

fn check_config_exists() -> CheckResult {
    match crate::config::get_config_path() {
        Ok(path) => {
            if path.exists() {
                CheckResult::Pass(format!("{}", path.display()))
            } else {
                CheckResult::Fail(format!("not found at {} (run: courtify init)", path.display()))
            }
        }
        Err(e) => CheckResult::Fail(format!("cannot determine path: {}", e)),
    }
}

fn check_config_loads(loaded: &Result<Config>) -> CheckResult {
    match loaded {
        Ok(_) => CheckResult::Pass("parsed and validated".to_string()),
        Err(e) => CheckResult::Fail(format!("{:#}", e)),
    }
}

fn check_credential(config: Option<&Config>, kind: ServiceKind) -> CheckResult {
    let Some(config) = config else {
        return CheckResult::Skip("config not available".to_string());
    };
    if config.services.get(kind).api_key.trim().is_empty() {
        return CheckResult::Fail(format!("no apiKey for {}", kind.name()));
    }
    CheckResult::Pass(format!(
        "from {}",
        detect_source(credential_name(kind), config)
    ))
}

fn check_endpoint(config: Option<&Config>, kind: ServiceKind) -> CheckResult {
    let Some(config) = config else {
        return CheckResult::Skip("config not available".to_string());
    };
    let svc = config.services.get(kind);
    let url = svc.resolved_url(kind);
    let origin = if url == kind.default_url() {
        "default"
    } else {
        "custom"
    };
    CheckResult::Pass(format!(
        "{} ({}, timeout {}ms)",
        url, origin, svc.timeout_ms
    ))
}

fn check_languages(config: Option<&Config>) -> CheckResult {
    let Some(config) = config else {
        return CheckResult::Skip("config not available".to_string());
    };
    CheckResult::Pass(format!(
        "pivot {}, fallback {}",
        config.pipeline.pivot_language,
        config.pipeline.effective_fallback()
    ))
}

fn check_services_ready(config: Option<&Config>) -> CheckResult {
    let Some(config) = config else {
        return CheckResult::Skip("config not available".to_string());
    };
    match config.validate_services() {
        Ok(()) => CheckResult::Pass("ready to serve".to_string()),
        Err(e) => CheckResult::Fail(e.to_string()),
    }
}

fn check_config_file_permissions() -> CheckResult {
    let Ok(path) = crate::config::get_config_path() else {
        return CheckResult::Skip("cannot determine path".to_string());
    };
    if !path.exists() {
        return CheckResult::Skip("config file not found".to_string());
    }
    check_mode(&path, 0o600)
}

fn check_config_dir_permissions() -> CheckResult {
    let Ok(path) = crate::config::get_config_path() else {
        return CheckResult::Skip("cannot determine path".to_string());
    };
    let Some(parent) = path.parent() else {
        return CheckResult::Skip("config has no parent dir".to_string());
    };
    if !parent.exists() {
        return CheckResult::Skip("config directory not found".to_string());
    }
    check_mode(parent, 0o700)
}

/// Fails when group or other bits are set; `suggested` goes in the hint.
#[cfg(unix)]
fn check_mode(path: &std::path::Path, suggested: u32) -> CheckResult {
    use std::os::unix::fs::PermissionsExt;
    match std::fs::metadata(path) {
        Ok(meta) => {
            let mode = meta.permissions().mode() & 0o777;
            if mode & 0o077 == 0 {
                CheckResult::Pass(format!("{:o}", mode))
            } else {
                CheckResult::Fail(format!(
                    "{:o} (group/other accessible, run: chmod {:o} {})",
                    mode,
                    suggested,
                    path.display()
                ))
            }
        }
        Err(_) => CheckResult::Skip("cannot read metadata".to_string()),
    }
}

#[cfg(not(unix))]
fn check_mode(_path: &std::path::Path, _suggested: u32) -> CheckResult {
    CheckResult::Skip("permission check not available on this platform".to_string())
}

pub fn doctor_command() -> Result<()> {
    println!("courtify doctor\n");
    println!("{}", "=".repeat(60));

    let mut pass_count = 0u32;
    let mut fail_count = 0u32;
    let mut skip_count = 0u32;

    let mut record = |name: &str, result: &CheckResult| {
        print_check(name, result);
        match result {
            CheckResult::Pass(_) => pass_count += 1,
            CheckResult::Fail(_) => fail_count += 1,
            CheckResult::Skip(_) => skip_count += 1,
        }
    };

    println!("\n  Core");
    println!("  {}", "-".repeat(56));

    let exists = check_config_exists();
    record("Config file", &exists);

    let loaded = crate::config::load_config(None);
    record("Config loads", &check_config_loads(&loaded));
    let config = loaded.as_ref().ok();

    record("Languages", &check_languages(config));

    println!("\n  Services");
    println!("  {}", "-".repeat(56));

    for kind in ServiceKind::ALL {
        record(
            &format!("{} endpoint", kind.name()),
            &check_endpoint(config, kind),
        );
        record(
            &format!("{} credential", kind.name()),
            &check_credential(config, kind),
        );
    }
    record("Pipelines", &check_services_ready(config));

    println!("\n  Security");
    println!("  {}", "-".repeat(56));

    record("Config file permissions", &check_config_file_permissions());
    record("Config dir permissions", &check_config_dir_permissions());

    println!("\n{}", "=".repeat(60));
    println!(
        "  {} passed, {} failed, {} skipped",
        pass_count, fail_count, skip_count
    );

    if fail_count > 0 {
        println!("\n  Some checks failed. Review the output above.");
    } else {
        println!("\n  All checks passed!");
    }

    if exists.is_fail() || loaded.is_err() {
        anyhow::bail!("critical checks failed");
    }

    Ok(())
}
