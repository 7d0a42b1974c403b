use std::path::Path;

use serde::Serialize;
use storefront_core::config::{LoadOptions, StorefrontConfig};

use super::{escape_json, CommandResult};

const TEMPLATE_DIR: &str = "templates/storefront";
const TEMPLATE_FILES: [&str; 4] = ["base.html", "catalog.html", "product.html", "error.html"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    if json_output {
        let output = serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
        return CommandResult { exit_code, output };
    }

    CommandResult { exit_code, output: render_human(&report) }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match StorefrontConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_catalog(&config));
            checks.push(check_static_dir(&config.server.static_dir));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "catalog_integrity",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "static_assets",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }
    checks.push(check_templates(Path::new(TEMPLATE_DIR)));

    let any_fail = checks.iter().any(|check| check.status == CheckStatus::Fail);
    let overall_status = if any_fail { CheckStatus::Fail } else { CheckStatus::Pass };
    let summary = if any_fail {
        "doctor: one or more readiness checks failed".to_string()
    } else {
        "doctor: all readiness checks passed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_catalog(config: &StorefrontConfig) -> DoctorCheck {
    let source = if config.catalog.products.is_some() { "configured" } else { "builtin" };
    match config.build_catalog() {
        Ok(catalog) if catalog.is_empty() => DoctorCheck {
            name: "catalog_integrity",
            status: CheckStatus::Fail,
            details: format!("{source} catalog has no products"),
        },
        Ok(catalog) => DoctorCheck {
            name: "catalog_integrity",
            status: CheckStatus::Pass,
            details: format!("{source} catalog has {} product(s) with unique ids", catalog.len()),
        },
        Err(error) => DoctorCheck {
            name: "catalog_integrity",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn check_static_dir(static_dir: &Path) -> DoctorCheck {
    if static_dir.is_dir() {
        DoctorCheck {
            name: "static_assets",
            status: CheckStatus::Pass,
            details: format!("serving static assets from `{}`", static_dir.display()),
        }
    } else {
        DoctorCheck {
            name: "static_assets",
            status: CheckStatus::Skipped,
            details: format!(
                "`{}` not found; pages render without the stylesheet",
                static_dir.display()
            ),
        }
    }
}

fn check_templates(dir: &Path) -> DoctorCheck {
    let missing: Vec<&str> =
        TEMPLATE_FILES.iter().copied().filter(|name| !dir.join(name).is_file()).collect();

    if missing.is_empty() {
        DoctorCheck {
            name: "templates",
            status: CheckStatus::Pass,
            details: format!("all templates present in `{}`", dir.display()),
        }
    } else {
        DoctorCheck {
            name: "templates",
            status: CheckStatus::Skipped,
            details: format!(
                "missing {} in `{}`; the server uses its embedded templates",
                missing.join(", "),
                dir.display()
            ),
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![report.summary.clone()];
    for check in &report.checks {
        let status = match check.status {
            CheckStatus::Pass => "PASS",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Skipped => "SKIP",
        };
        lines.push(format!("- [{status}] {}: {}", check.name, check.details));
    }
    lines.join("\n")
}
