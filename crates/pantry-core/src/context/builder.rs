use crate::llm::Message;

/// Assembles the final recipe prompt from retrieved context, recent history
/// and the user's request.
///
/// `build` is pure: the same inputs always produce the same string. Section
/// tags are fixed and embedded text is passed through [`neutralize`], so
/// content can never open or close a section it was not given.
pub struct PromptBuilder {
    system_prompt: String,
    context: String,
    history: Vec<Message>,
    request: String,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            system_prompt: Self::default_system_prompt(),
            context: String::new(),
            history: Vec::new(),
            request: String::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn with_history(mut self, history: &[Message]) -> Self {
        self.history = history.to_vec();
        self
    }

    pub fn with_request(mut self, request: impl Into<String>) -> Self {
        self.request = request.into();
        self
    }

    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str("[INST]\n");
        prompt.push_str(&self.system_prompt);
        prompt.push_str("\n\n");

        push_section(&mut prompt, "history", &render_history(&self.history));
        push_section(&mut prompt, "context", &neutralize(&self.context));
        push_section(&mut prompt, "request", &neutralize(&self.request));

        prompt.push_str("[/INST]\nRecipe Suggestion:");
        prompt
    }

    fn default_system_prompt() -> String {
        "You are a creative AI Chef Assistant. Using the ingredient context between <context> tags \
        and any relevant chat history between <history> tags, create a delicious recipe that \
        addresses the user's request. Keep responses focused on cooking instructions and \
        ingredient combinations.\n\
        \n\
        If the request is not about cooking, or can't be fulfilled with the available context, \
        respond politely that you can't help with it.\n\
        Avoid referencing the context sources directly."
            .to_string()
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn push_section(prompt: &mut String, tag: &str, body: &str) {
    prompt.push('<');
    prompt.push_str(tag);
    prompt.push_str(">\n");
    if !body.is_empty() {
        prompt.push_str(body);
        prompt.push('\n');
    }
    prompt.push_str("</");
    prompt.push_str(tag);
    prompt.push_str(">\n");
}

/// One `role: content` entry per message, content neutralized.
///
/// Continuation lines are indented so only the first line of an entry starts
/// at column zero and a message can never begin a line with a role prefix.
pub fn render_history(history: &[Message]) -> String {
    history
        .iter()
        .map(|m| {
            let body = neutralize(m.content()).replace('\r', "").replace('\n', "\n  ");
            format!("{}: {}", m.role(), body)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace the characters and markers that form section delimiters.
pub fn neutralize(text: &str) -> String {
    text.replace('<', "‹")
        .replace('>', "›")
        .replace("[/INST]", "(/INST)")
        .replace("[INST]", "(INST)")
}
