/*!
 * rbac-check - Access Check Entry Point
 *
 * Usage: rbac-check <subject|guest> <route> [<route>...]
 *
 * Loads the policy named by RBAC_POLICY_PATH, opens a session for the
 * subject and prints ALLOW or DENY for every route. Exits with status 1
 * when any route is denied.
 */

use miette::Result;
use std::process::ExitCode;

use route_rbac::{init_tracing_with, run, CheckArgs, RbacConfig};

fn main() -> Result<ExitCode> {
    let config = RbacConfig::from_env()?;
    init_tracing_with(&config);

    let args = CheckArgs::parse(std::env::args().skip(1))?;
    let report = run(&args.subject, &args.routes, &config)?;
    for line in report.lines() {
        println!("{}", line);
    }

    Ok(if report.all_allowed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
