use {
    self::server::ResolverServer,
    async_trait::async_trait,
    test_context::AsyncTestContext,
};

mod server;

pub type TestResult<T> = Result<T, TestError>;

#[derive(Debug, thiserror::Error)]
pub enum TestError {
    #[error(transparent)]
    Elapsed(#[from] tokio::time::error::Elapsed),
}

pub struct ServerContext {
    pub server: ResolverServer,
}

#[async_trait]
impl AsyncTestContext for ServerContext {
    async fn setup() -> Self {
        let server = ResolverServer::start().await;
        Self { server }
    }

    async fn teardown(mut self) {
        self.server.shutdown().await;
    }
}
