//! MCP JSON-RPC protocol bridge.
//!
//! Adapts the [`ToolRegistry`], the prompt templates and the `resume://`
//! resources to MCP so Cursor, Claude Desktop and other clients can connect
//! over Streamable HTTP at `/mcp`.
//!
//! * **Tools** via `list_tools` / `call_tool`.
//! * **Prompts** via `list_prompts` / `get_prompt`.
//! * **Resources** via `list_resources` / `read_resource`.

use std::borrow::Cow;
use std::sync::Arc;

use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler};

use crate::params::validate_params;
use crate::prompts::{find_prompt, prompts, PromptTemplate};
use crate::resources::{list_resources, read_resource};
use crate::traits::{ToolContext, ToolRegistry};

/// Every MCP session gets a clone; all of them share one document and one
/// query log.
#[derive(Clone)]
pub struct McpBridge {
    ctx: ToolContext,
    tools: Arc<ToolRegistry>,
}

impl McpBridge {
    pub fn new(ctx: ToolContext, tools: Arc<ToolRegistry>) -> Self {
        Self { ctx, tools }
    }

    fn to_mcp_tool(tool: &dyn crate::traits::Tool) -> Tool {
        let input_schema = match tool.parameters_schema() {
            serde_json::Value::Object(map) => Arc::new(map),
            _ => Arc::new(serde_json::Map::new()),
        };

        // log_query appends to the query log; everything else is a pure read.
        let read_only = tool.name() != "log_query";

        Tool {
            name: Cow::Owned(tool.name().to_string()),
            title: None,
            description: Some(Cow::Owned(tool.description().to_string())),
            input_schema,
            output_schema: None,
            annotations: Some(ToolAnnotations::new().read_only(read_only)),
            execution: None,
            icons: None,
            meta: None,
        }
    }

    fn to_mcp_prompt(template: &PromptTemplate) -> Prompt {
        let arguments = if template.arguments.is_empty() {
            None
        } else {
            Some(
                template
                    .arguments
                    .iter()
                    .map(|a| PromptArgument {
                        name: a.name.to_string(),
                        title: None,
                        description: Some(a.description.to_string()),
                        required: Some(a.required),
                    })
                    .collect(),
            )
        };

        Prompt {
            name: template.name.to_string(),
            title: None,
            description: Some(template.description.to_string()),
            arguments,
            icons: None,
            meta: None,
        }
    }
}

impl ServerHandler for McpBridge {
    fn get_info(&self) -> ServerInfo {
        let owner = self.ctx.doc().owner_name();
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "resume-harness".to_string(),
                title: Some(format!("{} resume", owner)),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(format!(
                "Answers questions about {}'s resume. Use answer_question for a cited, \
                 compact answer; search_experience, search_by_skill and get_company_details \
                 for raw evidence; resume:// resources for full sections.",
                owner
            )),
        }
    }

    // ── Tools ────────────────────────────────────────────────────────────

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools: Vec<Tool> = self
            .tools
            .tools()
            .iter()
            .map(|t| Self::to_mcp_tool(t.as_ref()))
            .collect();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    fn get_tool(&self, name: &str) -> Option<Tool> {
        self.tools.find(name).map(Self::to_mcp_tool)
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool = self.tools.find(&request.name).ok_or_else(|| {
            McpError::new(
                ErrorCode::METHOD_NOT_FOUND,
                format!("no tool registered with name: {}", request.name),
                None,
            )
        })?;

        let params = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        let params = match validate_params(&tool.parameters_schema(), &params) {
            Ok(p) => p,
            Err(e) => return Err(McpError::invalid_params(e.to_string(), None)),
        };

        match tool.execute(params, &self.ctx).await {
            Ok(result) => {
                let text = serde_json::to_string_pretty(&result).unwrap_or_default();
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(e) => {
                tracing::warn!(tool = %request.name, error = %e, "tool call failed");
                Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
            }
        }
    }

    // ── Prompts ──────────────────────────────────────────────────────────

    fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListPromptsResult, McpError>> + Send + '_ {
        let list: Vec<Prompt> = prompts().iter().map(Self::to_mcp_prompt).collect();
        std::future::ready(Ok(ListPromptsResult::with_all_items(list)))
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        let template = find_prompt(&request.name).ok_or_else(|| {
            McpError::new(
                ErrorCode::METHOD_NOT_FOUND,
                format!("no prompt registered with name: {}", request.name),
                None,
            )
        })?;

        let args = request.arguments.unwrap_or_default();
        let rendered = template
            .render(self.ctx.doc(), &args)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        Ok(GetPromptResult {
            description: Some(rendered.description),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, rendered.text)],
        })
    }

    // ── Resources ────────────────────────────────────────────────────────

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        let resources: Vec<Resource> = list_resources(self.ctx.doc())
            .into_iter()
            .map(|info| {
                let mut raw = RawResource::new(info.uri, info.name);
                raw.description = Some(info.description);
                raw.mime_type = Some("text/markdown".to_string());
                raw.no_annotation()
            })
            .collect();
        std::future::ready(Ok(ListResourcesResult::with_all_items(resources)))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let text = read_resource(self.ctx.doc(), &request.uri)
            .map_err(|e| McpError::resource_not_found(e.to_string(), None))?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_context;

    fn bridge() -> McpBridge {
        McpBridge::new(sample_context(), Arc::new(ToolRegistry::with_builtins()))
    }

    #[test]
    fn tools_map_to_mcp_descriptors() {
        let b = bridge();
        let tool = b.get_tool("search_experience").unwrap();
        assert_eq!(tool.name, "search_experience");
        assert!(tool.input_schema.contains_key("properties"));
        assert!(b.get_tool("nope").is_none());
    }

    #[test]
    fn prompts_carry_required_arguments() {
        let prompt = McpBridge::to_mcp_prompt(find_prompt("generate_cover_letter_points").unwrap());
        let args = prompt.arguments.unwrap();
        assert_eq!(args.len(), 2);
        assert!(args.iter().all(|a| a.required == Some(true)));

        let prompt = McpBridge::to_mcp_prompt(find_prompt("why_great_fit_for_ai_pm").unwrap());
        assert!(prompt.arguments.is_none());
    }

    #[test]
    fn server_info_names_owner() {
        let info = bridge().get_info();
        assert_eq!(info.server_info.name, "resume-harness");
        assert!(info.instructions.unwrap().contains("Jordan Avery"));
        assert!(info.capabilities.resources.is_some());
    }
}
