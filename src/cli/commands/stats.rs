//! Stats command - Dashboard figures for the session's role

use std::path::Path;

use crate::auth::Page;
use crate::cli::display;
use crate::errors::Result;

use super::{open, require_page};

/// Back-office dashboard, or the operator's own summary
pub async fn run(cwd: Option<&Path>, json: bool) -> Result<()> {
    let ctx = open(cwd).await?;
    require_page(&ctx.session, &[Page::Dashboard, Page::OperatorDashboard])?;

    if ctx.session.user.is_operator() {
        let summary = ctx.service.operator_summary(&ctx.session).await;
        return if json {
            display::print_json(&summary)
        } else {
            display::print_summary(&summary);
            Ok(())
        };
    }

    let stats = ctx.service.dashboard_stats(&ctx.session).await;
    if json {
        return display::print_json(&stats);
    }
    display::print_stats(&stats);
    Ok(())
}
