//! Emptiness oracle backed by the host RPC.

use serde_json::{Value, json};

use subfolder_core::oracle::{
    OracleQuery, child_count_stmt, content_count_stmt, row_count, rune_count, unwrap_envelope,
    validate_id,
};
use subfolder_core::{DocStatus, EmptinessOracle, OracleError};

use crate::config::rpc;
use crate::rpc::post_json;

/// Asks the host whether a document has content and child documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct RpcOracle {
    query: OracleQuery,
}

impl RpcOracle {
    pub fn new(query: OracleQuery) -> Self {
        Self { query }
    }

    async fn is_empty(&self, id: &str) -> Result<bool, OracleError> {
        match self.query {
            OracleQuery::TreeStat => {
                let data = call(rpc::TREE_STAT, &json!({ "id": id })).await?;
                Ok(rune_count(&data)? == 0)
            }
            OracleQuery::ContentBlocks => {
                let stmt = content_count_stmt(id)?;
                let data = call(rpc::QUERY_SQL, &json!({ "stmt": stmt })).await?;
                Ok(row_count(&data)? == 0)
            }
        }
    }

    async fn has_children(&self, id: &str) -> Result<bool, OracleError> {
        let stmt = child_count_stmt(id)?;
        let data = call(rpc::QUERY_SQL, &json!({ "stmt": stmt })).await?;
        Ok(row_count(&data)? > 0)
    }
}

impl EmptinessOracle for RpcOracle {
    async fn inspect(&self, node_id: &str) -> Result<DocStatus, OracleError> {
        let id = validate_id(node_id)?;
        let is_empty = self.is_empty(id).await?;
        let has_children = self.has_children(id).await?;
        log::debug!("{id}: empty={is_empty} children={has_children}");
        Ok(DocStatus {
            is_empty,
            has_children,
        })
    }
}

async fn call(path: &str, body: &Value) -> Result<Value, OracleError> {
    let response = post_json(path, body).await?;
    unwrap_envelope(response)
}
