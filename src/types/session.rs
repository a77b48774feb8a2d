/// Identity of the conversation a delegation originates from.
///
/// Supplied by the orchestrating conversation loop alongside the delegation
/// input; the engine threads the workspace and user ids into tool scoping.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub workspace_id: String,
    pub user_id: String,
    pub conversation_id: String,
    /// Slug of the top-level agent invoking the delegation.
    pub head_agent_slug: String,
}
