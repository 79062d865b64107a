use crate::client::HttpClient;
#[cfg(test)]
use crate::client::MockHttpClient;
use crate::traits::{
    CommandExecutor, FileSystem, Output, RealCommandExecutor, RealFileSystem, TerminalOutput,
};
#[cfg(test)]
use crate::traits::{MockCommandExecutor, MockFileSystem, MockOutput};
use std::sync::Arc;

/// Application context that holds all dependencies for dependency injection
pub struct Context {
    pub fs: Arc<dyn FileSystem>,
    pub output: Arc<dyn Output>,
    pub command: Arc<dyn CommandExecutor>,
    pub http: Arc<dyn HttpClient>,
}

impl Context {
    /// Create a new context with real implementations around the given HTTP client
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            fs: Arc::new(RealFileSystem),
            output: Arc::new(TerminalOutput),
            command: Arc::new(RealCommandExecutor::new()),
            http,
        }
    }

    /// Create a new context with mock implementations (for testing)
    #[cfg(test)]
    #[allow(dead_code)]
    pub fn test() -> Self {
        Self {
            fs: Arc::new(MockFileSystem::new()),
            output: Arc::new(MockOutput::new()),
            command: Arc::new(MockCommandExecutor::new()),
            http: Arc::new(MockHttpClient::new()),
        }
    }

    /// Create a test context with specific mock implementations
    #[cfg(test)]
    pub fn test_with(
        fs: Arc<dyn FileSystem>,
        output: Arc<dyn Output>,
        command: Arc<dyn CommandExecutor>,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            fs,
            output,
            command,
            http,
        }
    }
}

impl Clone for Context {
    fn clone(&self) -> Self {
        Self {
            fs: Arc::clone(&self.fs),
            output: Arc::clone(&self.output),
            command: Arc::clone(&self.command),
            http: Arc::clone(&self.http),
        }
    }
}
