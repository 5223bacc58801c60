//! Tool Router - binds the registry to rmcp.
//!
//! Every registered tool becomes one `ToolRoute`: its declared metadata is
//! listed as-is and calls are forwarded to [`ToolHandler::call`]. Arguments
//! that do not match the declared parameters are an `invalid_params`
//! protocol error; everything else comes back as an envelope.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
};
use tracing::{debug, info};

use super::handlers::ToolHandler;
use super::registry::ToolRegistry;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(registry: &ToolRegistry) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    let router = registry
        .list_all()
        .into_iter()
        .fold(ToolRouter::new(), |router, tool| router.with_route(route_for(tool)));

    info!("Bound {} tools to the MCP router", registry.count());
    router
}

/// Create the route forwarding calls to `tool`.
fn route_for<S>(tool: Arc<dyn ToolHandler>) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    ToolRoute::new_dyn(tool.to_tool(), move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        let tool = tool.clone();
        async move {
            debug!("Tool '{}' called with {:?}", tool.name(), args);
            let output = tool
                .call(args)
                .await
                .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
            Ok(output.into_call_result())
        }
        .boxed()
    })
}
