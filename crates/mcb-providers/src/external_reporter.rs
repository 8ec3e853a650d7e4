//! Page-block external reporter (C10's push sink), grounded on
//! `original_source/backend/tools/notion_tool.py`'s `push_to_notion`:
//! children are appended to a page via the blocks-children endpoint, in
//! batches of at most 100 (the host API's per-request block limit).

use async_trait::async_trait;
use serde_json::{json, Value};

use mcb_domain::error::{Error, Result};
use mcb_domain::ports::{ExternalBlock, ExternalReporter};

/// Maximum children accepted in a single blocks-append request.
const MAX_BLOCKS_PER_REQUEST: usize = 100;

/// [`ExternalReporter`] backed by a Notion-shaped page-blocks API.
pub struct PageExternalReporter {
    http: reqwest::Client,
    token: String,
    page_id: String,
    api_base: String,
}

impl PageExternalReporter {
    const DEFAULT_API_BASE: &'static str = "https://api.notion.com/v1";
    const API_VERSION: &'static str = "2022-06-28";

    /// Construct a reporter for `EXTERNAL_REPORTER_TOKEN`/`EXTERNAL_REPORTER_PAGE_ID`.
    #[must_use]
    pub fn new(token: String, page_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
            page_id,
            api_base: Self::DEFAULT_API_BASE.to_owned(),
        }
    }

    fn children_url(&self) -> String {
        format!("{}/blocks/{}/children", self.api_base, self.page_id)
    }

    fn block_to_json(block: &ExternalBlock) -> Value {
        fn rich_text(content: &str) -> Value {
            json!([{ "type": "text", "text": { "content": content } }])
        }

        match block {
            ExternalBlock::Heading1 { content } => json!({
                "object": "block",
                "type": "heading_1",
                "heading_1": { "rich_text": rich_text(content) },
            }),
            ExternalBlock::Heading2 { content } => json!({
                "object": "block",
                "type": "heading_2",
                "heading_2": { "rich_text": rich_text(content) },
            }),
            ExternalBlock::Heading3 { content } => json!({
                "object": "block",
                "type": "heading_3",
                "heading_3": { "rich_text": rich_text(content) },
            }),
            ExternalBlock::Paragraph { content } => json!({
                "object": "block",
                "type": "paragraph",
                "paragraph": { "rich_text": rich_text(content) },
            }),
            ExternalBlock::BulletedListItem { content } => json!({
                "object": "block",
                "type": "bulleted_list_item",
                "bulleted_list_item": { "rich_text": rich_text(content) },
            }),
            ExternalBlock::Code { content, language } => json!({
                "object": "block",
                "type": "code",
                "code": { "rich_text": rich_text(content), "language": language },
            }),
            ExternalBlock::Divider => json!({
                "object": "block",
                "type": "divider",
                "divider": {},
            }),
        }
    }
}

#[async_trait]
impl ExternalReporter for PageExternalReporter {
    async fn push_blocks(&self, blocks: &[ExternalBlock]) -> Result<()> {
        let url = self.children_url();

        for batch in blocks.chunks(MAX_BLOCKS_PER_REQUEST) {
            let children: Vec<Value> = batch.iter().map(Self::block_to_json).collect();
            let response = self
                .http
                .patch(&url)
                .bearer_auth(&self.token)
                .header("Notion-Version", Self::API_VERSION)
                .json(&json!({ "children": children }))
                .send()
                .await
                .map_err(|e| Error::external_reporter_failure(format!("push request failed: {e}")))?;

            if !response.status().is_success() {
                let status = response.status();
                let detail = response.text().await.unwrap_or_default();
                return Err(Error::external_reporter_failure(format!(
                    "page API rejected blocks ({status}): {detail}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_block_serializes_with_rich_text() {
        let json = PageExternalReporter::block_to_json(&ExternalBlock::Heading1 {
            content: "Code Review".to_owned(),
        });
        assert_eq!(json["type"], "heading_1");
        assert_eq!(json["heading_1"]["rich_text"][0]["text"]["content"], "Code Review");
    }

    #[test]
    fn divider_block_carries_an_empty_object() {
        let json = PageExternalReporter::block_to_json(&ExternalBlock::Divider);
        assert_eq!(json["type"], "divider");
        assert_eq!(json["divider"], json!({}));
    }

    #[test]
    fn code_block_carries_its_language() {
        let json = PageExternalReporter::block_to_json(&ExternalBlock::Code {
            content: "fn main() {}".to_owned(),
            language: "rust".to_owned(),
        });
        assert_eq!(json["code"]["language"], "rust");
    }
}
