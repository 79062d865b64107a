#[cfg(test)]
use std::sync::Mutex;

/// Terminal reporting seam; commands never print directly
pub trait Output: Send + Sync {
    fn success(&self, message: &str);

    /// Best-effort failures that do not stop the run
    fn warning(&self, message: &str);

    fn info(&self, message: &str);

    fn section(&self, title: &str);

    fn subsection(&self, title: &str);

    fn key_value(&self, key: &str, value: &str);

    fn dimmed(&self, message: &str);

    fn list_item(&self, text: &str);

    fn blank(&self);
}

/// Output backed by the styled `output` module
pub struct TerminalOutput;

impl Output for TerminalOutput {
    fn success(&self, message: &str) {
        crate::output::success(message);
    }

    fn warning(&self, message: &str) {
        crate::output::warning(message);
    }

    fn info(&self, message: &str) {
        crate::output::info(message);
    }

    fn section(&self, title: &str) {
        crate::output::section(title);
    }

    fn subsection(&self, title: &str) {
        crate::output::subsection(title);
    }

    fn key_value(&self, key: &str, value: &str) {
        crate::output::key_value(key, value);
    }

    fn dimmed(&self, message: &str) {
        crate::output::dimmed(message);
    }

    fn list_item(&self, text: &str) {
        crate::output::list_item(text);
    }

    fn blank(&self) {
        crate::output::blank();
    }
}

/// Message captured by MockOutput
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum OutputMessage {
    Success(String),
    Warning(String),
    Info(String),
    Section(String),
    Subsection(String),
    KeyValue(String, String),
    Dimmed(String),
    ListItem(String),
    Blank,
}

/// Records every message in order
#[cfg(test)]
#[derive(Default)]
pub struct MockOutput {
    messages: Mutex<Vec<OutputMessage>>,
}

#[cfg(test)]
impl MockOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_messages(&self) -> Vec<OutputMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn get_warnings(&self) -> Vec<String> {
        self.get_messages()
            .into_iter()
            .filter_map(|m| match m {
                OutputMessage::Warning(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }

    fn push(&self, message: OutputMessage) {
        self.messages.lock().unwrap().push(message);
    }
}

#[cfg(test)]
impl Output for MockOutput {
    fn success(&self, message: &str) {
        self.push(OutputMessage::Success(message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.push(OutputMessage::Warning(message.to_string()));
    }

    fn info(&self, message: &str) {
        self.push(OutputMessage::Info(message.to_string()));
    }

    fn section(&self, title: &str) {
        self.push(OutputMessage::Section(title.to_string()));
    }

    fn subsection(&self, title: &str) {
        self.push(OutputMessage::Subsection(title.to_string()));
    }

    fn key_value(&self, key: &str, value: &str) {
        self.push(OutputMessage::KeyValue(key.to_string(), value.to_string()));
    }

    fn dimmed(&self, message: &str) {
        self.push(OutputMessage::Dimmed(message.to_string()));
    }

    fn list_item(&self, text: &str) {
        self.push(OutputMessage::ListItem(text.to_string()));
    }

    fn blank(&self) {
        self.push(OutputMessage::Blank);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_output_keeps_order_and_filters_warnings() {
        let output = MockOutput::new();
        output.section("Export");
        output.warning("first");
        output.list_item("folders.tf");
        output.warning("second");

        assert_eq!(output.get_messages().len(), 4);
        assert_eq!(output.get_messages()[2], OutputMessage::ListItem("folders.tf".to_string()));
        assert_eq!(output.get_warnings(), vec!["first", "second"]);
    }
}
