//! Agent roles and prompt composition
//!
//! The built-in roles are a closed set of variants dispatched through one
//! execution path; custom roles registered at runtime carry their own
//! system prompt and use a generic composition.

const CODE_REVIEW_SYSTEM_PROMPT: &str = "\
You are an expert code reviewer. Your role is to:
1. Analyze code changes for bugs, security issues, and best practices
2. Provide constructive feedback with specific suggestions
3. Consider performance, maintainability, and readability
4. Be thorough but concise in your reviews
5. Highlight both positive aspects and areas for improvement";

const ISSUE_TRIAGE_SYSTEM_PROMPT: &str = "\
You are an expert at triaging GitHub issues. Your role is to:
1. Categorize issues by type (bug, feature, documentation, etc.)
2. Assess priority and severity
3. Suggest appropriate labels
4. Identify duplicates or related issues
5. Provide actionable next steps";

const DOCUMENTATION_SYSTEM_PROMPT: &str = "\
You are an expert technical writer. Your role is to:
1. Create clear, comprehensive documentation
2. Explain complex concepts in simple terms
3. Provide code examples where appropriate
4. Maintain consistent formatting and style
5. Ensure documentation is up-to-date with code changes";

/// The role an agent plays, fixing its system prompt and how request
/// context and user input compose into the final prompt.
#[derive(Debug, Clone)]
pub enum AgentRole {
    /// Reviews a diff or snippet for correctness, style and risk
    CodeReview,
    /// Assigns category, priority and labels to issues as free text
    IssueTriage,
    /// Produces or improves prose documentation
    Documentation,
    /// Runtime-registered role with a caller-supplied prompt
    Custom {
        name: String,
        description: String,
        system_prompt: String,
    },
}

impl AgentRole {
    /// Type name used as the registry key
    pub fn type_name(&self) -> &str {
        match self {
            AgentRole::CodeReview => "code_review",
            AgentRole::IssueTriage => "issue_triage",
            AgentRole::Documentation => "documentation",
            AgentRole::Custom { name, .. } => name,
        }
    }

    /// Human-readable display name
    pub fn display_name(&self) -> &str {
        match self {
            AgentRole::CodeReview => "Code Review Agent",
            AgentRole::IssueTriage => "Issue Triage Agent",
            AgentRole::Documentation => "Documentation Agent",
            AgentRole::Custom { name, .. } => name,
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &str {
        match self {
            AgentRole::CodeReview => "Analyzes code changes and provides detailed reviews",
            AgentRole::IssueTriage => "Triages and categorizes GitHub issues",
            AgentRole::Documentation => "Generates and improves documentation",
            AgentRole::Custom { description, .. } => description,
        }
    }

    /// The role's fixed system prompt template
    pub fn system_prompt(&self) -> &str {
        match self {
            AgentRole::CodeReview => CODE_REVIEW_SYSTEM_PROMPT,
            AgentRole::IssueTriage => ISSUE_TRIAGE_SYSTEM_PROMPT,
            AgentRole::Documentation => DOCUMENTATION_SYSTEM_PROMPT,
            AgentRole::Custom { system_prompt, .. } => system_prompt,
        }
    }

    /// Compose the final prompt from fetched repository context (when the
    /// call referenced a repository) and the user input. Composition is a
    /// per-role policy, not uniform.
    pub fn compose_prompt(&self, github_context: Option<&str>, user_input: &str) -> String {
        match self {
            AgentRole::CodeReview => match github_context {
                Some(context) => format!(
                    "Please review the following pull request or repository:\n\n\
                     {}\n\
                     Additional context: {}\n\n\
                     Provide a comprehensive code review.",
                    context, user_input
                ),
                None => format!("Review this code:\n\n{}", user_input),
            },
            AgentRole::IssueTriage => match github_context {
                Some(context) => format!(
                    "Please triage the following GitHub issue:\n\n\
                     {}\n\
                     Additional notes: {}\n\n\
                     Provide triage analysis including category, priority, \
                     suggested labels, and next steps.",
                    context, user_input
                ),
                None => format!("Triage this issue:\n\n{}", user_input),
            },
            AgentRole::Documentation => {
                let mut prompt = format!("Generate documentation for:\n\n{}", user_input);
                if let Some(context) = github_context {
                    prompt.push_str(&format!("\n\nRepository context:\n\n{}", context));
                }
                prompt
            }
            AgentRole::Custom { .. } => match github_context {
                Some(context) => format!("{}\n\n{}", context, user_input),
                None => user_input.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(AgentRole::CodeReview.type_name(), "code_review");
        assert_eq!(AgentRole::IssueTriage.type_name(), "issue_triage");
        assert_eq!(AgentRole::Documentation.type_name(), "documentation");
    }

    #[test]
    fn test_compose_without_context_contains_input() {
        let input = "def add(a,b): return a+b";
        for role in [AgentRole::CodeReview, AgentRole::IssueTriage, AgentRole::Documentation] {
            let prompt = role.compose_prompt(None, input);
            assert!(prompt.contains(input), "{} lost the input", role.type_name());
        }
    }

    #[test]
    fn test_code_review_interleaves_context() {
        let prompt = AgentRole::CodeReview.compose_prompt(Some("Pull request #7"), "focus on errors");
        assert!(prompt.starts_with("Please review"));
        assert!(prompt.contains("Pull request #7"));
        assert!(prompt.contains("Additional context: focus on errors"));
    }

    #[test]
    fn test_documentation_appends_context() {
        let prompt = AgentRole::Documentation.compose_prompt(Some("Repository: a/b"), "fn parse()");
        let input_pos = prompt.find("fn parse()").unwrap();
        let context_pos = prompt.find("Repository: a/b").unwrap();
        assert!(input_pos < context_pos);
    }

    #[test]
    fn test_custom_role_prompt() {
        let role = AgentRole::Custom {
            name: "release_notes".to_string(),
            description: "Writes release notes".to_string(),
            system_prompt: "You write release notes.".to_string(),
        };
        assert_eq!(role.type_name(), "release_notes");
        assert_eq!(role.system_prompt(), "You write release notes.");
        assert_eq!(role.compose_prompt(None, "v1.2"), "v1.2");
    }
}
