//! Tool handlers and descriptors.
//!
//! A [`ToolDescriptor`] pairs the metadata a client sees (name, description,
//! input schema, annotations) with the [`ToolHandler`] that executes calls.
//!
//! Most tools are written as a [`ToolDefinition`]: a unit struct declaring
//! its name, description, access level and parameter type, plus `extract`
//! (pulls parameters through the parameter contract) and `execute` (talks to
//! GitHub). [`ToolDescriptor::from_definition`] turns a definition into a
//! descriptor, so every tool reports failures the same way.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::{CallToolResult, Tool, ToolAnnotations};
use schemars::JsonSchema;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::error::ToolResult;
use super::params::{ParamResult, ToolRequest};
use super::result::{error_result, marshalled_text_result};

// ============================================================================
// Access level
// ============================================================================

/// Whether a tool only reads GitHub state or may change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolAccess {
    Read,
    Write,
}

// ============================================================================
// Handler trait
// ============================================================================

/// Executes one tool call.
///
/// Handlers never fail at the protocol level: every problem is reported in
/// the returned result.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, request: ToolRequest) -> CallToolResult;
}

// ============================================================================
// Descriptor
// ============================================================================

/// Immutable tool metadata plus its handler.
#[derive(Clone)]
pub struct ToolDescriptor {
    tool: Tool,
    access: ToolAccess,
    handler: Arc<dyn ToolHandler>,
}

impl ToolDescriptor {
    /// Create a descriptor. The `readOnlyHint` annotation is set from `access`.
    pub fn new(mut tool: Tool, access: ToolAccess, handler: Arc<dyn ToolHandler>) -> Self {
        let mut annotations = tool.annotations.take().unwrap_or(ToolAnnotations {
            title: None,
            read_only_hint: None,
            destructive_hint: None,
            idempotent_hint: None,
            open_world_hint: None,
        });
        annotations.read_only_hint = Some(access == ToolAccess::Read);
        tool.annotations = Some(annotations);

        Self {
            tool,
            access,
            handler,
        }
    }

    /// Create a descriptor for a [`ToolDefinition`] bound to `context`.
    pub fn from_definition<T: ToolDefinition>(context: T::Context) -> Self {
        Self::new(
            T::to_tool(),
            T::ACCESS,
            Arc::new(DefinitionHandler::<T>::new(context)),
        )
    }

    pub fn name(&self) -> &str {
        &self.tool.name
    }

    /// The tool model advertised in `tools/list`.
    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    pub fn access(&self) -> ToolAccess {
        self.access
    }

    pub fn is_read_only(&self) -> bool {
        self.access == ToolAccess::Read
    }

    /// Run the tool.
    pub async fn call(&self, request: ToolRequest) -> CallToolResult {
        self.handler.call(request).await
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.tool.name)
            .field("access", &self.access)
            .finish()
    }
}

// ============================================================================
// Definitions
// ============================================================================

/// A tool described by constants and two functions.
pub trait ToolDefinition: Send + Sync + 'static {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Short human readable title.
    const TITLE: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Read or write classification.
    const ACCESS: ToolAccess;

    /// Parameter struct; its JSON schema becomes the advertised input schema.
    type Params: JsonSchema + Serialize + Send + 'static;

    /// Shared state the tool needs (usually the GitHub client).
    type Context: Send + Sync + 'static;

    /// Payload returned on success.
    type Output: Serialize + Send;

    /// Pull the parameters out of the raw request.
    fn extract(request: &ToolRequest) -> ParamResult<Self::Params>;

    /// Execute the tool.
    fn execute(
        context: &Self::Context,
        params: Self::Params,
    ) -> impl Future<Output = ToolResult<Self::Output>> + Send;

    /// Create a Tool model for this tool (metadata).
    fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            title: Some(Self::TITLE.into()),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<Self::Params>(),
            output_schema: None,
            annotations: Some(ToolAnnotations {
                title: Some(Self::TITLE.into()),
                read_only_hint: Some(Self::ACCESS == ToolAccess::Read),
                destructive_hint: None,
                idempotent_hint: None,
                open_world_hint: None,
            }),
            icons: None,
            meta: None,
        }
    }
}

/// Adapts a [`ToolDefinition`] into a [`ToolHandler`].
pub struct DefinitionHandler<T: ToolDefinition> {
    context: T::Context,
    _definition: PhantomData<fn() -> T>,
}

impl<T: ToolDefinition> DefinitionHandler<T> {
    pub fn new(context: T::Context) -> Self {
        Self {
            context,
            _definition: PhantomData,
        }
    }
}

#[async_trait]
impl<T: ToolDefinition> ToolHandler for DefinitionHandler<T> {
    #[instrument(skip_all, fields(tool = T::NAME))]
    async fn call(&self, request: ToolRequest) -> CallToolResult {
        let params = match T::extract(&request) {
            Ok(params) => params,
            Err(e) => {
                debug!(parameter = e.parameter(), "Rejected tool arguments: {}", e);
                return error_result(e.to_string());
            }
        };

        match T::execute(&self.context, params).await {
            Ok(output) => marshalled_text_result(&output),
            Err(e) => {
                warn!("Tool execution failed: {}", e);
                error_result(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::github::ApiError;
    use crate::domains::tools::error::ToolError;
    use crate::domains::tools::params::{optional_int_param, required_param};
    use crate::domains::tools::result::result_text;
    use serde_json::{Value, json};

    #[derive(Debug, Serialize, JsonSchema)]
    struct EchoParams {
        /// Text to echo
        text: String,
        /// Optional count
        count: Option<i64>,
    }

    struct EchoTool;

    impl ToolDefinition for EchoTool {
        const NAME: &'static str = "echo";
        const TITLE: &'static str = "Echo";
        const DESCRIPTION: &'static str = "Echo the text back";
        const ACCESS: ToolAccess = ToolAccess::Read;

        type Params = EchoParams;
        type Context = bool;
        type Output = Value;

        fn extract(request: &ToolRequest) -> ParamResult<EchoParams> {
            Ok(EchoParams {
                text: required_param(request, "text")?,
                count: optional_int_param(request, "count")?,
            })
        }

        async fn execute(fail: &bool, params: EchoParams) -> ToolResult<Value> {
            if *fail {
                return Err(ToolError::api(
                    "failed to echo",
                    ApiError::status("GET", "/echo", 500, "boom"),
                ));
            }
            Ok(json!({ "text": params.text, "count": params.count }))
        }
    }

    fn call(fail: bool, arguments: Value) -> CallToolResult {
        let descriptor = ToolDescriptor::from_definition::<EchoTool>(fail);
        tokio_test::block_on(descriptor.call(ToolRequest::from_value("echo", arguments)))
    }

    #[test]
    fn test_descriptor_metadata() {
        let descriptor = ToolDescriptor::from_definition::<EchoTool>(false);
        assert_eq!(descriptor.name(), "echo");
        assert!(descriptor.is_read_only());
        let tool = descriptor.tool();
        assert_eq!(tool.description.as_deref(), Some("Echo the text back"));
        assert_eq!(
            tool.annotations.as_ref().and_then(|a| a.read_only_hint),
            Some(true)
        );
        assert!(tool.input_schema.get("properties").is_some());
    }

    #[test]
    fn test_new_sets_read_only_hint_from_access() {
        let descriptor = ToolDescriptor::new(
            EchoTool::to_tool(),
            ToolAccess::Write,
            Arc::new(DefinitionHandler::<EchoTool>::new(false)),
        );
        assert_eq!(descriptor.access(), ToolAccess::Write);
        assert_eq!(
            descriptor.tool().annotations.as_ref().and_then(|a| a.read_only_hint),
            Some(false)
        );
    }

    #[test]
    fn test_success_is_encoded() {
        let result = call(false, json!({ "text": "hi", "count": 2.9 }));
        assert_eq!(result.is_error, Some(false));
        let payload: Value = serde_json::from_str(result_text(&result).unwrap()).unwrap();
        assert_eq!(payload, json!({ "text": "hi", "count": 2 }));
    }

    #[test]
    fn test_missing_parameter_is_error_result() {
        let result = call(false, json!({}));
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result_text(&result),
            Some("missing required parameter: text")
        );
    }

    #[test]
    fn test_type_mismatch_is_error_result() {
        let result = call(false, json!({ "text": "hi", "count": "two" }));
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result_text(&result),
            Some("parameter count is not of type number, is string")
        );
    }

    #[test]
    fn test_api_failure_keeps_message() {
        let result = call(true, json!({ "text": "hi" }));
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result_text(&result),
            Some("failed to echo: GET /echo returned 500: boom")
        );
    }
}
