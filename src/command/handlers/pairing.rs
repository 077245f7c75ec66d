//! Pairing and connection commands; thin wrappers over the orchestrator

use super::HandlerContext;

/// Handle `connect <name>|<#n>`
pub async fn handle_connect(ctx: &mut HandlerContext<'_>, params: &str) -> i32 {
    let snapshot = ctx.directory.snapshot().await;
    ctx.pairing.connect(&snapshot, params, ctx.interrupt).await
}

/// Handle `connectpc <name>|<#n>`
pub async fn handle_connect_pc(ctx: &mut HandlerContext<'_>, params: &str) -> i32 {
    let snapshot = ctx.directory.snapshot().await;
    ctx.pairing.connect_pc(&snapshot, params, ctx.interrupt).await
}

/// Handle `disconnect <name>|<#n>`
pub async fn handle_disconnect(ctx: &mut HandlerContext<'_>, params: &str) -> i32 {
    let snapshot = ctx.directory.snapshot().await;
    ctx.pairing.disconnect(&snapshot, params).await
}
