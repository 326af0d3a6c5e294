use clap::Args;

use common::prelude::{filter_results, SearchKind, SearchResult, UserId};
use dataroom_daemon::http_server::api::client::ApiError;
use dataroom_daemon::http_server::api::v0::SearchRequest;

/// Find datarooms, folders and files by name or path.
#[derive(Args, Debug, Clone)]
pub struct Search {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,

    /// Case-insensitive text to match against names and paths
    #[arg(long)]
    pub query: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

fn describe(result: &SearchResult) -> String {
    let kind = match result.kind {
        SearchKind::Dataroom => "room",
        SearchKind::Folder => "folder",
        SearchKind::File => "file",
    };
    format!("[{}] {}  ({})", kind, result.path, result.id)
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Search {
    type Error = SearchError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client
            .call(SearchRequest {
                user_id: self.user_id,
            })
            .await?;

        let results = match &self.query {
            Some(query) => filter_results(response.results, query),
            None => response.results,
        };

        if results.is_empty() {
            return Ok("No matches".to_string());
        }
        Ok(results.iter().map(describe).collect::<Vec<_>>().join("\n"))
    }
}
