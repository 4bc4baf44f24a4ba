use super::streaming::{ProviderChatRequest, ProviderResponse, ProviderStream, StreamCollector};
use async_trait::async_trait;
use futures_util::StreamExt;

#[async_trait]
pub trait Provider: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Start a streamed generation. The returned stream ends with a
    /// `StreamEvent::Done` on success; any other ending is an `Err` item.
    async fn chat_stream(&self, req: ProviderChatRequest) -> anyhow::Result<ProviderStream>;

    /// Non-streamed generation. Default: drain `chat_stream` into one response.
    async fn complete(&self, req: ProviderChatRequest) -> anyhow::Result<ProviderResponse> {
        let mut stream = self.chat_stream(req).await?;
        let mut collector = StreamCollector::new();
        while let Some(event) = stream.next().await {
            collector.feed(&event?);
        }
        if !collector.is_finished() {
            anyhow::bail!("{} stream ended without a completion event", self.name());
        }
        Ok(collector.finish())
    }
}
