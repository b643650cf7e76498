//! Health check command.

use staysync_domain::Result;

use crate::AppContext;

/// Verify database connectivity.
pub async fn health_check(ctx: &AppContext) -> Result<()> {
    ctx.db.health_check()
}
